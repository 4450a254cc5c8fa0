#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use tally_domain::{Category, EntryState, Project, ProjectId, TimeEntry, UserId};
use tally_infra::database::{DbManager, SqliteEntryRepository, SqliteProjectRepository};
use tempfile::TempDir;

/// Temporary migrated database that keeps the underlying file alive for the
/// duration of a test.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("tally-test.db");

        let manager = DbManager::new(&db_path, 4).expect("db manager should be created");
        manager.run_migrations().expect("schema migrations should apply");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    pub fn entries(&self) -> SqliteEntryRepository {
        SqliteEntryRepository::new(Arc::clone(&self.manager))
    }

    pub fn projects(&self) -> SqliteProjectRepository {
        SqliteProjectRepository::new(Arc::clone(&self.manager))
    }

    /// Execute a batch of SQL statements against the database.
    pub fn execute_batch(&self, sql: &str) {
        let conn = self.manager.get_connection().expect("connection should be available");
        conn.execute_batch(sql).expect("SQL batch execution should succeed");
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

pub fn user(name: &str) -> UserId {
    UserId::from(name)
}

pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

pub fn project(owner: &UserId, name: &str, rate: f64) -> Project {
    Project {
        id: ProjectId::new(),
        owner_id: owner.clone(),
        name: name.to_string(),
        description: String::new(),
        category: Category::Work,
        hourly_rate: rate,
        is_archived: false,
        created_at: utc(2024, 1, 1, 0, 0),
    }
}

pub fn closed_entry(
    owner: &UserId,
    project_id: Option<ProjectId>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> TimeEntry {
    let mut entry = TimeEntry::start(owner.clone(), "Work".into(), project_id, Category::Work, start);
    entry.state = EntryState::Closed { end_time: end };
    entry.updated_at = end;
    entry.paused_duration = TimeDelta::zero();
    entry
}
