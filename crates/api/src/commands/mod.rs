//! Commands - one async function per exposed operation

mod analytics;
mod entries;
mod projects;
mod reports;
mod timer;

pub use analytics::*;
pub use entries::*;
pub use projects::*;
pub use reports::*;
pub use timer::*;
