//! Report and earnings assembly
//!
//! Produces fully computed structures; rendering to HTML, PDF or CSV is left
//! to callers.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::TimeDelta;
use chrono_tz::Tz;
use tally_domain::constants::NO_PROJECT_LABEL;
use tally_domain::utils::round_cents;
use tally_domain::{
    DailyEarning, DateRange, EarningsReport, EntryQuery, PayrollConfig, Project, ProjectId,
    Report, ReportFilter, ReportLine, Result, SortOrder, TallyError, TimeEntry, UserId,
};
use tracing::debug;

use crate::analytics::split_by_day;
use crate::calendar::{local_date, utc_window};
use crate::duration::{format_clock, format_hms, hours, worked_duration};
use crate::entries::ports::EntryStore;
use crate::projects::ports::ProjectStore;

pub struct ReportAssembler {
    entries: Arc<dyn EntryStore>,
    projects: Arc<dyn ProjectStore>,
    tz: Tz,
    payroll: PayrollConfig,
}

impl ReportAssembler {
    pub fn new(
        entries: Arc<dyn EntryStore>,
        projects: Arc<dyn ProjectStore>,
        tz: Tz,
        payroll: PayrollConfig,
    ) -> Self {
        Self { entries, projects, tz, payroll }
    }

    /// Closed, non-archived entries that start and end within the range,
    /// newest first.
    pub async fn get_report(&self, user_id: &UserId, filter: &ReportFilter) -> Result<Report> {
        let range = filter.range;
        if range.start > range.end {
            debug!(user_id = %user_id, start = %range.start, end = %range.end, "Reversed report range");
            return Ok(empty_report(range));
        }

        let (from, to) = utc_window(range.start, range.end, self.tz);
        let query = EntryQuery::for_user(user_id.clone())
            .between(Some(from), to)
            .project(filter.project_id)
            .category(filter.category)
            .closed_only()
            .order(SortOrder::Descending);
        let entries = self.entries.query_entries(&query).await?;
        let projects = self.project_map(user_id).await?;

        let lines: Vec<ReportLine> = entries
            .iter()
            .filter(|entry| self.fully_within(entry, &range))
            .filter_map(|entry| report_line(entry, &projects))
            .collect();

        let total = lines.iter().fold(TimeDelta::zero(), |acc, line| acc + line.worked);
        let total_earnings = round_cents(lines.iter().map(|line| line.earnings).sum());
        Ok(Report {
            range,
            total_duration: total,
            total_formatted: format_hms(total),
            total_clock: format_clock(total),
            total_earnings,
            lines,
        })
    }

    /// Daily earnings of one project with payroll deductions.
    ///
    /// Every day of the range is present, zero-filled. Entries crossing
    /// midnight are split across days.
    ///
    /// # Errors
    ///
    /// [`TallyError::NotFound`] for a project the user does not own and
    /// [`TallyError::InvalidRange`] for a reversed range.
    pub async fn get_earnings(
        &self,
        user_id: &UserId,
        project_id: ProjectId,
        range: DateRange,
    ) -> Result<EarningsReport> {
        let project = self
            .projects
            .find_project(project_id, user_id)
            .await?
            .ok_or_else(|| TallyError::NotFound(format!("project {project_id}")))?;
        if range.start > range.end {
            return Err(TallyError::InvalidRange(format!("{} is after {}", range.start, range.end)));
        }

        let (from, to) = utc_window(range.start, range.end, self.tz);
        let query = EntryQuery::for_user(user_id.clone())
            .between(Some(from), to)
            .project(Some(project_id))
            .closed_only();
        let entries = self.entries.query_entries(&query).await?;

        let mut per_day: HashMap<chrono::NaiveDate, TimeDelta> = HashMap::new();
        for entry in &entries {
            for chunk in split_by_day(entry, self.tz) {
                if range.contains(chunk.date) {
                    *per_day.entry(chunk.date).or_insert_with(TimeDelta::zero) += chunk.worked;
                }
            }
        }

        let rate = if project.is_billable() { project.hourly_rate } else { 0.0 };
        let days: Vec<DailyEarning> = range
            .days()
            .map(|date| {
                let day_hours = hours(per_day.get(&date).copied().unwrap_or_else(TimeDelta::zero));
                DailyEarning { date, hours: day_hours, earnings: round_cents(day_hours * rate) }
            })
            .collect();

        let total_hours: f64 = days.iter().map(|day| day.hours).sum();
        let deductions = self.payroll.apply(total_hours * rate);
        debug!(
            user_id = %user_id,
            project_id = %project_id,
            entries = entries.len(),
            gross = deductions.gross,
            "Earnings computed"
        );

        Ok(EarningsReport {
            project_id,
            project_name: project.name,
            hourly_rate: project.hourly_rate,
            range,
            days,
            total_hours,
            gross_pay: deductions.gross,
            social_fees: deductions.social_fees,
            income_tax: deductions.income_tax,
            net_pay: deductions.net,
        })
    }

    fn fully_within(&self, entry: &TimeEntry, range: &DateRange) -> bool {
        let Some(end) = entry.end_time() else { return false };
        local_date(entry.start_time, self.tz) >= range.start && local_date(end, self.tz) <= range.end
    }

    async fn project_map(&self, user_id: &UserId) -> Result<HashMap<ProjectId, Project>> {
        Ok(self
            .projects
            .list_projects(user_id, true)
            .await?
            .into_iter()
            .map(|project| (project.id, project))
            .collect())
    }
}

/// Gross pay broken down into fixed-rate deductions, all in cents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deductions {
    pub gross: f64,
    pub social_fees: f64,
    pub income_tax: f64,
    pub net: f64,
}

/// Extension applying payroll rates to an amount
pub trait PayrollExt {
    fn apply(&self, gross: f64) -> Deductions;
}

impl PayrollExt for PayrollConfig {
    /// Social fees come off gross pay; income tax is levied on the rest.
    fn apply(&self, gross: f64) -> Deductions {
        let gross = round_cents(gross);
        let social_fees = round_cents(gross * self.social_fees_rate);
        let taxable = gross - social_fees;
        let income_tax = round_cents(taxable * self.income_tax_rate);
        Deductions { gross, social_fees, income_tax, net: round_cents(taxable - income_tax) }
    }
}

fn report_line(entry: &TimeEntry, projects: &HashMap<ProjectId, Project>) -> Option<ReportLine> {
    let end_time = entry.end_time()?;
    let worked = worked_duration(entry)?;
    let project = entry.project_id.and_then(|id| projects.get(&id));
    let earnings = project
        .filter(|p| p.is_billable())
        .map_or(0.0, |p| round_cents(hours(worked) * p.hourly_rate));

    Some(ReportLine {
        entry_id: entry.id,
        title: entry.title.clone(),
        project_name: project.map_or_else(|| NO_PROJECT_LABEL.to_string(), |p| p.name.clone()),
        category: entry.category,
        start_time: entry.start_time,
        end_time,
        worked,
        paused: entry.paused_duration,
        formatted_duration: format_hms(worked),
        clock_duration: format_clock(worked),
        description: entry.description.clone(),
        notes: entry.notes.clone(),
        earnings,
    })
}

fn empty_report(range: DateRange) -> Report {
    Report {
        range,
        lines: Vec::new(),
        total_duration: TimeDelta::zero(),
        total_formatted: format_hms(TimeDelta::zero()),
        total_clock: format_clock(TimeDelta::zero()),
        total_earnings: 0.0,
    }
}
