//! Fixtures wiring core services over in-memory stores

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use tally_core::{
    ActivityAggregator, Clock, EntryService, MockClock, ProjectService, ReportAssembler,
    TimerController, UserLocks,
};
use tally_domain::{Category, EntryState, PayrollConfig, Project, ProjectId, TimeEntry, UserId};

use super::repositories::{InMemoryEntryStore, InMemoryProjectStore};

/// All core services sharing one pair of stores and one clock
pub struct Harness {
    pub entries: InMemoryEntryStore,
    pub projects: InMemoryProjectStore,
    pub clock: MockClock,
    pub timer: TimerController,
    pub aggregator: ActivityAggregator,
    pub reports: ReportAssembler,
    pub entry_service: EntryService,
    pub project_service: ProjectService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_zone(chrono_tz::UTC)
    }

    pub fn with_zone(tz: Tz) -> Self {
        let entries = InMemoryEntryStore::new();
        let projects = InMemoryProjectStore::new();
        let clock = MockClock::at(utc(2024, 3, 1, 9, 0));
        let locks = UserLocks::new();

        let entry_store = Arc::new(entries.clone());
        let project_store = Arc::new(projects.clone());
        let clock_port = Arc::new(clock.clone());

        Self {
            timer: TimerController::new(
                entry_store.clone(),
                project_store.clone(),
                clock_port.clone(),
                locks.clone(),
            ),
            aggregator: ActivityAggregator::new(entry_store.clone(), project_store.clone(), tz),
            reports: ReportAssembler::new(
                entry_store.clone(),
                project_store.clone(),
                tz,
                PayrollConfig::default(),
            ),
            entry_service: EntryService::new(
                entry_store.clone(),
                project_store.clone(),
                clock_port.clone(),
                locks,
                tz,
            ),
            project_service: ProjectService::new(project_store, entry_store, clock_port),
            entries,
            projects,
            clock,
        }
    }

    /// Insert a project directly into the store.
    pub fn project(&self, user: &UserId, name: &str, rate: f64) -> Project {
        let project = Project {
            id: ProjectId::new(),
            owner_id: user.clone(),
            name: name.to_string(),
            description: String::new(),
            category: Category::Work,
            hourly_rate: rate,
            is_archived: false,
            created_at: self.clock.now(),
        };
        self.projects.insert(project.clone());
        project
    }

    /// Insert a closed entry directly into the store.
    pub fn closed_entry(
        &self,
        user: &UserId,
        project_id: Option<ProjectId>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> TimeEntry {
        let entry = closed(user, project_id, start, end, TimeDelta::zero());
        self.entries.insert(entry.clone());
        entry
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

pub fn closed(
    user: &UserId,
    project_id: Option<ProjectId>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    paused: TimeDelta,
) -> TimeEntry {
    let mut entry = TimeEntry::start(user.clone(), "Work".into(), project_id, Category::Work, start);
    entry.state = EntryState::Closed { end_time: end };
    entry.paused_duration = paused;
    entry
}
