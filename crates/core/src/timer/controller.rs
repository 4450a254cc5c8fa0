//! Timer state machine
//!
//! ```text
//! [idle] --start--> Running --pause--> Paused --resume--> Running
//! Running --stop--> [idle]
//! Paused  --stop--> [idle]   (open pause window is closed first)
//! ```
//!
//! Every transition runs under the user's lock from [`UserLocks`], so two
//! concurrent requests can never both observe the same state and both act
//! on it.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tally_domain::utils::normalize_title;
use tally_domain::{
    Category, EntryId, EntryState, ProjectId, Result, TallyError, TimeEntry, TimerStatus, UserId,
};
use tracing::{debug, info, warn};

use super::locks::UserLocks;
use crate::clock::Clock;
use crate::duration::{clamp_non_negative, elapsed_at};
use crate::entries::ports::EntryStore;
use crate::projects::ports::ProjectStore;
use crate::projects::require_open_project;

/// Owns start/stop/pause/resume of each user's single active entry
pub struct TimerController {
    entries: Arc<dyn EntryStore>,
    projects: Arc<dyn ProjectStore>,
    clock: Arc<dyn Clock>,
    locks: UserLocks,
}

impl TimerController {
    pub fn new(
        entries: Arc<dyn EntryStore>,
        projects: Arc<dyn ProjectStore>,
        clock: Arc<dyn Clock>,
        locks: UserLocks,
    ) -> Self {
        Self { entries, projects, clock, locks }
    }

    /// Start a new running entry.
    ///
    /// The entry takes its category from the project when one is given.
    ///
    /// # Errors
    ///
    /// - [`TallyError::AlreadyRunning`] if the user already has an active entry
    /// - [`TallyError::NotFound`] for an unknown or archived project
    /// - [`TallyError::InvalidInput`] for an over-long title
    pub async fn start(
        &self,
        user_id: &UserId,
        title: &str,
        project_id: Option<ProjectId>,
    ) -> Result<EntryId> {
        let title = normalize_title(title)?;
        let category = match project_id {
            Some(id) => require_open_project(self.projects.as_ref(), user_id, id).await?.category,
            None => Category::default(),
        };

        let _guard = self.locks.acquire(user_id).await;
        if let Some(active) = self.entries.find_active_entry(user_id).await? {
            warn!(user_id = %user_id, active_entry = %active.id, "Start rejected: timer already running");
            return Err(TallyError::AlreadyRunning);
        }

        let entry = TimeEntry::start(user_id.clone(), title, project_id, category, self.clock.now());
        let id = self.entries.create_entry(&entry).await?;
        info!(user_id = %user_id, entry_id = %id, transition = "start", "Timer started");
        Ok(id)
    }

    /// Close the active entry, closing any open pause window first.
    ///
    /// # Errors
    ///
    /// [`TallyError::NoActiveEntry`] when nothing is running or paused.
    pub async fn stop(&self, user_id: &UserId) -> Result<EntryId> {
        let _guard = self.locks.acquire(user_id).await;
        let mut entry = self.active_or(user_id, TallyError::NoActiveEntry, "stop").await?;
        let now = self.clock.now();

        if let EntryState::Paused { since } = entry.state {
            close_pause_window(&mut entry, since, now);
        }
        entry.state = EntryState::Closed { end_time: now };
        entry.updated_at = now;
        entry.validate()?;

        self.entries.update_entry(&entry).await?;
        info!(
            user_id = %user_id,
            entry_id = %entry.id,
            transition = "stop",
            paused_ms = entry.paused_duration.num_milliseconds(),
            "Timer stopped"
        );
        Ok(entry.id)
    }

    /// Pause the running entry.
    ///
    /// # Errors
    ///
    /// [`TallyError::NotRunning`] when there is no active entry or it is
    /// already paused.
    pub async fn pause(&self, user_id: &UserId) -> Result<EntryId> {
        let _guard = self.locks.acquire(user_id).await;
        let mut entry = self.active_or(user_id, TallyError::NotRunning, "pause").await?;
        if entry.state != EntryState::Running {
            debug!(user_id = %user_id, entry_id = %entry.id, "Pause rejected: already paused");
            return Err(TallyError::NotRunning);
        }

        let now = self.clock.now();
        entry.state = EntryState::Paused { since: now };
        entry.updated_at = now;
        self.entries.update_entry(&entry).await?;
        info!(user_id = %user_id, entry_id = %entry.id, transition = "pause", "Timer paused");
        Ok(entry.id)
    }

    /// Resume the paused entry, adding the pause window to the accumulator.
    ///
    /// # Errors
    ///
    /// [`TallyError::NotPaused`] when there is no paused active entry.
    pub async fn resume(&self, user_id: &UserId) -> Result<EntryId> {
        let _guard = self.locks.acquire(user_id).await;
        let mut entry = self.active_or(user_id, TallyError::NotPaused, "resume").await?;
        let EntryState::Paused { since } = entry.state else {
            debug!(user_id = %user_id, entry_id = %entry.id, "Resume rejected: not paused");
            return Err(TallyError::NotPaused);
        };

        let now = self.clock.now();
        close_pause_window(&mut entry, since, now);
        entry.updated_at = now;
        self.entries.update_entry(&entry).await?;
        info!(
            user_id = %user_id,
            entry_id = %entry.id,
            transition = "resume",
            paused_ms = entry.paused_duration.num_milliseconds(),
            "Timer resumed"
        );
        Ok(entry.id)
    }

    /// Current timer state with worked time so far. Takes no lock.
    pub async fn status(&self, user_id: &UserId) -> Result<TimerStatus> {
        let Some(entry) = self.entries.find_active_entry(user_id).await? else {
            return Ok(TimerStatus::Idle);
        };
        let elapsed = elapsed_at(&entry, self.clock.now());
        Ok(match entry.state {
            EntryState::Paused { .. } => TimerStatus::Paused { entry: Box::new(entry), elapsed },
            _ => TimerStatus::Running { entry: Box::new(entry), elapsed },
        })
    }

    async fn active_or(
        &self,
        user_id: &UserId,
        missing: TallyError,
        transition: &'static str,
    ) -> Result<TimeEntry> {
        match self.entries.find_active_entry(user_id).await? {
            Some(entry) => Ok(entry),
            None => {
                debug!(user_id = %user_id, transition, "Transition rejected: no active entry");
                Err(missing)
            }
        }
    }
}

/// Fold the pause that began at `since` into the accumulator and mark the
/// entry running. Clock skew never subtracts time.
fn close_pause_window(entry: &mut TimeEntry, since: DateTime<Utc>, now: DateTime<Utc>) {
    let window: TimeDelta = clamp_non_negative(now - since);
    entry.paused_duration += window;
    entry.state = EntryState::Running;
}
