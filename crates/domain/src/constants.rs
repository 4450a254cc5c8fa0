//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Entry constants
pub const DEFAULT_ENTRY_TITLE: &str = "New Entry";
pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_PROJECT_NAME_LENGTH: usize = 100;

// Aggregation labels
pub const UNASSIGNED_LABEL: &str = "Unassigned";
pub const NO_PROJECT_LABEL: &str = "No Project";

// Time arithmetic
pub const SECONDS_PER_HOUR: f64 = 3600.0;
pub const MILLIS_PER_HOUR: f64 = 3_600_000.0;

// Payroll defaults (Swedish sole trader model)
pub const DEFAULT_SOCIAL_FEES_RATE: f64 = 0.2897;
pub const DEFAULT_INCOME_TAX_RATE: f64 = 0.32;

// Listing
pub const DEFAULT_RECENT_ENTRIES: usize = 10;
