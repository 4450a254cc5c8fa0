//! Pure helper functions shared by domain types

pub mod duration;
pub mod money;
pub mod serde;
pub mod title;

pub use duration::seconds_to_delta;
pub use money::round_cents;
pub use title::{normalize_project_name, normalize_title};
