//! Wall-clock abstraction
//!
//! Timer transitions stamp entries with "now". Reading the time through a
//! trait lets tests drive the state machine through hours of simulated work
//! without sleeping.
//!
//! ```
//! use chrono::{TimeDelta, TimeZone, Utc};
//! use tally_core::clock::{Clock, MockClock};
//!
//! let clock = MockClock::at(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
//! let start = clock.now();
//! clock.advance(TimeDelta::minutes(10));
//! assert_eq!(clock.now() - start, TimeDelta::minutes(10));
//! ```

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock. Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for deterministic tests
///
/// Clones share the same underlying instant.
#[derive(Debug, Clone)]
pub struct MockClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    #[must_use]
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self { current: Arc::new(Mutex::new(instant)) }
    }

    /// Move the clock forward (or backward, for negative deltas).
    pub fn advance(&self, delta: TimeDelta) {
        let mut current = self.current.lock();
        *current += delta;
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.current.lock() = instant;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::at(Utc::now())
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}
