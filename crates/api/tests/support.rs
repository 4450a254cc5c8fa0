#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tally_api::AppContext;
use tally_core::MockClock;
use tally_domain::{Config, DatabaseConfig, UserId};
use tempfile::TempDir;

/// Application context over a temporary database and a manual clock.
pub struct TestApp {
    pub ctx: AppContext,
    pub clock: MockClock,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Build with a tweaked configuration; the database path is always temporary.
    pub fn with_config(tweak: impl FnOnce(&mut Config)) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temporary directory");
        let mut config = Config {
            database: DatabaseConfig {
                path: temp_dir.path().join("tally.db").to_string_lossy().to_string(),
                pool_size: 4,
            },
            ..Config::default()
        };
        tweak(&mut config);

        let clock = MockClock::at(utc(2024, 3, 1, 9, 0));
        let ctx = AppContext::with_clock(config, Arc::new(clock.clone()))
            .expect("application context should initialise");

        Self { ctx, clock, _temp_dir: temp_dir }
    }
}

pub fn user(name: &str) -> UserId {
    UserId::from(name)
}

pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
