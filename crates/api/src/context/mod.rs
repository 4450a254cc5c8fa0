//! Application context - dependency injection container

use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use tally_core::calendar::local_date;
use tally_core::{
    ActivityAggregator, Clock, EntryService, EntryStore, ProjectService, ProjectStore,
    ReportAssembler, SystemClock, TimerController, UserLocks,
};
use tally_domain::{Config, Result, TallyError};
use tally_infra::{DbManager, SqliteEntryRepository, SqliteProjectRepository};
use tracing::info;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub clock: Arc<dyn Clock>,
    pub timezone: Tz,
    pub timer: Arc<TimerController>,
    pub entries: Arc<EntryService>,
    pub projects: Arc<ProjectService>,
    pub aggregator: Arc<ActivityAggregator>,
    pub reports: Arc<ReportAssembler>,
}

impl AppContext {
    /// Open the database, apply migrations and wire every service.
    ///
    /// # Errors
    ///
    /// `Config` for an invalid configuration, `Database` when the store
    /// cannot be opened or migrated.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Like [`AppContext::new`] with an injected clock.
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let timezone = config.analytics.tz()?;

        ensure_parent_dir(Path::new(&config.database.path))?;
        let db = Arc::new(DbManager::from_config(&config.database)?);
        db.run_migrations()?;

        let entry_store: Arc<dyn EntryStore> =
            Arc::new(SqliteEntryRepository::new(Arc::clone(&db)));
        let project_store: Arc<dyn ProjectStore> =
            Arc::new(SqliteProjectRepository::new(Arc::clone(&db)));

        // Timer and entry edits must serialize on the same per-user locks.
        let locks = UserLocks::new();

        let timer = Arc::new(TimerController::new(
            Arc::clone(&entry_store),
            Arc::clone(&project_store),
            Arc::clone(&clock),
            locks.clone(),
        ));
        let entries = Arc::new(EntryService::new(
            Arc::clone(&entry_store),
            Arc::clone(&project_store),
            Arc::clone(&clock),
            locks,
            timezone,
        ));
        let projects = Arc::new(ProjectService::new(
            Arc::clone(&project_store),
            Arc::clone(&entry_store),
            Arc::clone(&clock),
        ));
        let aggregator = Arc::new(ActivityAggregator::new(
            Arc::clone(&entry_store),
            Arc::clone(&project_store),
            timezone,
        ));
        let reports = Arc::new(ReportAssembler::new(
            entry_store,
            project_store,
            timezone,
            config.payroll,
        ));

        info!(
            db_path = %db.path().display(),
            timezone = %timezone,
            "application context initialised"
        );

        Ok(Self { config, db, clock, timezone, timer, entries, projects, aggregator, reports })
    }

    /// The current calendar day in the configured zone.
    pub fn today(&self) -> NaiveDate {
        local_date(self.clock.now(), self.timezone)
    }

    /// Check that the database answers queries.
    pub fn health_check(&self) -> Result<()> {
        self.db.health_check()
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent).map_err(|err| {
                TallyError::Database(format!(
                    "failed to create database directory {}: {err}",
                    parent.display()
                ))
            })
        }
        _ => Ok(()),
    }
}
