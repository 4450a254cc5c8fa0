//! Domain types and models

pub mod analytics;
pub mod entry;
pub mod ids;
pub mod project;
pub mod report;

pub use analytics::{
    ActivityFilter, ActivitySeries, ActivitySummary, CategoryTotal, DateRange, Period,
    ProjectEarnings, ProjectSeries,
};
pub use entry::{
    Category, EntryDetails, EntryEdit, EntryListQuery, EntryOrigin, EntryQuery, EntryState, ManualEntry,
    SortOrder, TimeEntry, TimerStatus,
};
pub use ids::{EntryId, ProjectId, UserId};
pub use project::{NewProject, Project};
pub use report::{DailyEarning, EarningsReport, Report, ReportFilter, ReportLine};
