//! # Tally Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for entry and project storage (traits)
//! - The timer state machine with per-user serialisation
//! - Worked-duration arithmetic and formatting
//! - Activity aggregation with midnight splitting
//! - Report and earnings assembly
//!
//! ## Architecture Principles
//! - Only depends on `tally-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod analytics;
pub mod calendar;
pub mod clock;
pub mod duration;
pub mod entries;
pub mod projects;
pub mod reports;
pub mod timer;

pub use analytics::ActivityAggregator;
pub use clock::{Clock, MockClock, SystemClock};
pub use entries::{EntryService, EntryStore};
pub use projects::{ProjectService, ProjectStore};
pub use reports::ReportAssembler;
pub use timer::{TimerController, UserLocks};
