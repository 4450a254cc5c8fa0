//! Activity aggregation

pub mod aggregator;
pub mod buckets;

pub use aggregator::{ActivityAggregator, Selection};
pub use buckets::{split_by_day, DayChunk};
