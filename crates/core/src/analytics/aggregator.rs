//! Day-bucketed activity series and summary figures

use std::collections::HashMap;
use std::sync::Arc;

use chrono::TimeDelta;
use chrono_tz::Tz;
use tally_domain::constants::UNASSIGNED_LABEL;
use tally_domain::utils::round_cents;
use tally_domain::{
    ActivityFilter, ActivitySeries, ActivitySummary, Category, CategoryTotal, DateRange,
    EntryQuery, Project, ProjectEarnings, ProjectId, ProjectSeries, Result, TimeEntry, UserId,
};
use tracing::debug;

use super::buckets::split_by_day;
use crate::calendar::{local_date, utc_window};
use crate::duration::{format_hms, hours};
use crate::entries::ports::EntryStore;
use crate::projects::ports::ProjectStore;

/// Read-only aggregation over a user's closed entries
///
/// Holds no locks; it may run concurrently with timer mutations. Running
/// entries are never bucketed.
pub struct ActivityAggregator {
    entries: Arc<dyn EntryStore>,
    projects: Arc<dyn ProjectStore>,
    tz: Tz,
}

/// Entries selected for one aggregation request
#[derive(Debug, Clone)]
pub struct Selection {
    pub range: DateRange,
    pub entries: Vec<TimeEntry>,
    pub projects: HashMap<ProjectId, Project>,
}

impl ActivityAggregator {
    pub fn new(entries: Arc<dyn EntryStore>, projects: Arc<dyn ProjectStore>, tz: Tz) -> Self {
        Self { entries, projects, tz }
    }

    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    /// Worked hours per project per day.
    ///
    /// A reversed range yields an empty series rather than an error.
    pub async fn get_activity_series(
        &self,
        user_id: &UserId,
        filter: &ActivityFilter,
    ) -> Result<ActivitySeries> {
        Ok(self
            .select(user_id, filter)
            .await?
            .map(|selection| bucket_series(&selection, self.tz))
            .unwrap_or_default())
    }

    /// Totals by category and earnings of billable projects.
    pub async fn get_summary(
        &self,
        user_id: &UserId,
        filter: &ActivityFilter,
    ) -> Result<ActivitySummary> {
        Ok(self
            .select(user_id, filter)
            .await?
            .map_or_else(empty_summary, |selection| summarize(&selection, self.tz)))
    }

    /// Fetch the filtered entry set and resolve the day range.
    ///
    /// Filters narrow the query itself, so an all-time range starts at the
    /// earliest entry that survives them.
    pub async fn select(
        &self,
        user_id: &UserId,
        filter: &ActivityFilter,
    ) -> Result<Option<Selection>> {
        if filter.start.is_some_and(|start| start > filter.end) {
            debug!(user_id = %user_id, start = ?filter.start, end = %filter.end, "Reversed range, returning empty aggregation");
            return Ok(None);
        }

        let (window_start, window_end) =
            utc_window(filter.start.unwrap_or(filter.end), filter.end, self.tz);
        let query = EntryQuery::for_user(user_id.clone())
            .between(filter.start.map(|_| window_start), window_end)
            .project(filter.project_id)
            .category(filter.category)
            .include_archived(filter.include_archived)
            .closed_only();
        let entries = self.entries.query_entries(&query).await?;

        let first_day = filter.start.unwrap_or_else(|| {
            entries
                .iter()
                .map(|entry| local_date(entry.start_time, self.tz))
                .min()
                .unwrap_or(filter.end)
        });
        let range = DateRange { start: first_day.min(filter.end), end: filter.end };

        let projects = self
            .projects
            .list_projects(user_id, true)
            .await?
            .into_iter()
            .map(|project| (project.id, project))
            .collect();

        debug!(
            user_id = %user_id,
            entries = entries.len(),
            days = range.len_days(),
            "Selected entries for aggregation"
        );
        Ok(Some(Selection { range, entries, projects }))
    }
}

/// Bucket a selection into per-project daily series.
///
/// Projects are ordered by name with the unassigned bucket last; series that
/// are zero on every day are omitted.
#[must_use]
pub fn bucket_series(selection: &Selection, tz: Tz) -> ActivitySeries {
    let range = selection.range;
    let day_labels: Vec<_> = range.days().collect();
    let mut buckets: HashMap<Option<ProjectId>, Vec<f64>> = HashMap::new();

    for entry in &selection.entries {
        let key = entry.project_id.filter(|id| selection.projects.contains_key(id));
        for chunk in split_by_day(entry, tz) {
            let Some(index) = day_index(&range, chunk.date) else { continue };
            let row = buckets.entry(key).or_insert_with(|| vec![0.0; day_labels.len()]);
            row[index] += hours(chunk.worked);
        }
    }

    let mut series: Vec<ProjectSeries> = buckets
        .into_iter()
        .filter(|(_, row)| row.iter().any(|h| *h > 0.0))
        .map(|(project_id, hours_per_day)| ProjectSeries {
            label: project_label(project_id, &selection.projects),
            project_id,
            hours_per_day,
        })
        .collect();
    series.sort_by(|a, b| {
        a.project_id.is_none().cmp(&b.project_id.is_none()).then_with(|| a.label.cmp(&b.label))
    });

    ActivitySeries { day_labels, series }
}

/// Summary figures of a selection. Only the portion of each entry that falls
/// inside the day range counts.
#[must_use]
pub fn summarize(selection: &Selection, tz: Tz) -> ActivitySummary {
    let mut total = TimeDelta::zero();
    let mut by_category: HashMap<Category, TimeDelta> = HashMap::new();
    let mut by_project: HashMap<ProjectId, TimeDelta> = HashMap::new();

    for entry in &selection.entries {
        let worked = split_by_day(entry, tz)
            .into_iter()
            .filter(|chunk| selection.range.contains(chunk.date))
            .fold(TimeDelta::zero(), |acc, chunk| acc + chunk.worked);

        total += worked;
        *by_category.entry(entry.category).or_insert_with(TimeDelta::zero) += worked;

        let billable = entry
            .project_id
            .and_then(|id| selection.projects.get(&id))
            .filter(|project| project.is_billable());
        if let Some(project) = billable {
            *by_project.entry(project.id).or_insert_with(TimeDelta::zero) += worked;
        }
    }

    let mut earnings_by_project: Vec<ProjectEarnings> = by_project
        .into_iter()
        .filter_map(|(id, worked)| selection.projects.get(&id).map(|p| (p, worked)))
        .map(|(project, worked)| {
            let worked_hours = hours(worked);
            ProjectEarnings {
                project_id: project.id,
                name: project.name.clone(),
                hourly_rate: project.hourly_rate,
                hours: worked_hours,
                earnings: worked_hours * project.hourly_rate,
            }
        })
        .collect();
    earnings_by_project
        .sort_by(|a, b| b.earnings.total_cmp(&a.earnings).then_with(|| a.name.cmp(&b.name)));

    let total_earnings = round_cents(earnings_by_project.iter().map(|p| p.earnings).sum());
    for project in &mut earnings_by_project {
        project.earnings = round_cents(project.earnings);
    }

    ActivitySummary {
        total_worked: total,
        total_worked_formatted: format_hms(total),
        worked_by_category: category_totals(&by_category),
        total_earnings,
        earnings_by_project,
    }
}

fn empty_summary() -> ActivitySummary {
    ActivitySummary {
        total_worked: TimeDelta::zero(),
        total_worked_formatted: format_hms(TimeDelta::zero()),
        worked_by_category: category_totals(&HashMap::new()),
        total_earnings: 0.0,
        earnings_by_project: Vec::new(),
    }
}

fn category_totals(by_category: &HashMap<Category, TimeDelta>) -> Vec<CategoryTotal> {
    Category::ALL
        .iter()
        .map(|category| {
            let worked = by_category.get(category).copied().unwrap_or_else(TimeDelta::zero);
            CategoryTotal { category: *category, worked, formatted: format_hms(worked) }
        })
        .collect()
}

fn day_index(range: &DateRange, date: chrono::NaiveDate) -> Option<usize> {
    if !range.contains(date) {
        return None;
    }
    usize::try_from((date - range.start).num_days()).ok()
}

fn project_label(project_id: Option<ProjectId>, projects: &HashMap<ProjectId, Project>) -> String {
    project_id
        .and_then(|id| projects.get(&id))
        .map_or_else(|| UNASSIGNED_LABEL.to_string(), |project| project.name.clone())
}
