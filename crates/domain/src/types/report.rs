//! Report structures handed to rendering and export layers

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::analytics::DateRange;
use super::entry::Category;
use super::ids::{EntryId, ProjectId};
use crate::utils::serde::duration_seconds;

/// Selection of entries for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub range: DateRange,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub category: Option<Category>,
}

impl ReportFilter {
    #[must_use]
    pub const fn new(range: DateRange) -> Self {
        Self { range, project_id: None, category: None }
    }

    #[must_use]
    pub const fn with_project(mut self, project_id: Option<ProjectId>) -> Self {
        self.project_id = project_id;
        self
    }
}

/// One closed entry, fully computed for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLine {
    pub entry_id: EntryId,
    pub title: String,
    pub project_name: String,
    pub category: Category,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(with = "duration_seconds")]
    pub worked: TimeDelta,
    #[serde(with = "duration_seconds")]
    pub paused: TimeDelta,
    /// Compact `1h 1m 1s` rendering
    pub formatted_duration: String,
    /// `HH:MM:SS` rendering
    pub clock_duration: String,
    pub description: String,
    pub notes: String,
    pub earnings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub range: DateRange,
    pub lines: Vec<ReportLine>,
    #[serde(with = "duration_seconds")]
    pub total_duration: TimeDelta,
    pub total_formatted: String,
    pub total_clock: String,
    pub total_earnings: f64,
}

/// Earnings of a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEarning {
    pub date: NaiveDate,
    pub hours: f64,
    pub earnings: f64,
}

/// Daily earnings of one project with payroll deductions applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsReport {
    pub project_id: ProjectId,
    pub project_name: String,
    pub hourly_rate: f64,
    pub range: DateRange,
    pub days: Vec<DailyEarning>,
    pub total_hours: f64,
    pub gross_pay: f64,
    pub social_fees: f64,
    pub income_tax: f64,
    pub net_pay: f64,
}
