//! Activity aggregation inputs and outputs

use chrono::{Days, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use super::entry::Category;
use super::ids::ProjectId;
use crate::utils::serde::duration_seconds;
use crate::{Result, TallyError};

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// # Errors
    ///
    /// Returns [`TallyError::InvalidRange`] when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(TallyError::InvalidRange(format!("{start} is after {end}")));
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    /// Every day of the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }

    /// Number of days in the range, counting both ends.
    #[must_use]
    pub fn len_days(&self) -> usize {
        usize::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }

    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Look-back presets offered by the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "7d")]
    Days7,
    #[serde(rename = "15d")]
    Days15,
    #[default]
    #[serde(rename = "30d")]
    Days30,
    #[serde(rename = "3m")]
    Months3,
    #[serde(rename = "6m")]
    Months6,
    #[serde(rename = "1y")]
    Year1,
    #[serde(rename = "all")]
    All,
}

crate::impl_domain_status_conversions!(Period {
    Days7 => "7d",
    Days15 => "15d",
    Days30 => "30d",
    Months3 => "3m",
    Months6 => "6m",
    Year1 => "1y",
    All => "all",
});

impl Period {
    /// Days subtracted from today to find the first day; `None` for all time.
    #[must_use]
    pub const fn lookback_days(&self) -> Option<u64> {
        match self {
            Self::Days7 => Some(7),
            Self::Days15 => Some(15),
            Self::Days30 => Some(30),
            Self::Months3 => Some(90),
            Self::Months6 => Some(182),
            Self::Year1 => Some(365),
            Self::All => None,
        }
    }

    #[must_use]
    pub fn start_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        self.lookback_days().and_then(|days| today.checked_sub_days(Days::new(days)))
    }
}

/// Selection of entries to aggregate.
///
/// A missing `start` means "all time": the range begins on the day of the
/// earliest matching entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityFilter {
    pub start: Option<NaiveDate>,
    pub end: NaiveDate,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub include_archived: bool,
}

impl ActivityFilter {
    #[must_use]
    pub const fn new(start: Option<NaiveDate>, end: NaiveDate) -> Self {
        Self { start, end, project_id: None, category: None, include_archived: false }
    }

    #[must_use]
    pub fn for_period(period: Period, today: NaiveDate) -> Self {
        Self::new(period.start_date(today), today)
    }

    #[must_use]
    pub const fn with_project(mut self, project_id: Option<ProjectId>) -> Self {
        self.project_id = project_id;
        self
    }

    #[must_use]
    pub const fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub const fn with_archived(mut self, include: bool) -> Self {
        self.include_archived = include;
        self
    }
}

/// Worked hours of one project for each day label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSeries {
    pub label: String,
    pub project_id: Option<ProjectId>,
    pub hours_per_day: Vec<f64>,
}

/// Day-bucketed chart data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySeries {
    pub day_labels: Vec<NaiveDate>,
    pub series: Vec<ProjectSeries>,
}

/// Worked time of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    #[serde(with = "duration_seconds")]
    pub worked: TimeDelta,
    pub formatted: String,
}

/// Earnings of one billable project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEarnings {
    pub project_id: ProjectId,
    pub name: String,
    pub hourly_rate: f64,
    pub hours: f64,
    pub earnings: f64,
}

/// Dashboard summary figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    #[serde(with = "duration_seconds")]
    pub total_worked: TimeDelta,
    pub total_worked_formatted: String,
    pub worked_by_category: Vec<CategoryTotal>,
    pub total_earnings: f64,
    pub earnings_by_project: Vec<ProjectEarnings>,
}
