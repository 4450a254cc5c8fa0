//! Manual entries, edits, archival and listing

use std::sync::Arc;

use chrono_tz::Tz;
use tally_domain::constants::NO_PROJECT_LABEL;
use tally_domain::utils::{normalize_title, seconds_to_delta};
use tally_domain::{
    EntryDetails, EntryEdit, EntryId, EntryListQuery, EntryOrigin, EntryQuery, EntryState,
    ManualEntry, ProjectId, Result, SortOrder, TallyError, TimeEntry, UserId,
};
use tracing::info;

use super::ports::EntryStore;
use crate::calendar::start_of_day;
use crate::clock::Clock;
use crate::duration::{format_hms, format_hms_opt, worked_duration};
use crate::projects::ports::ProjectStore;
use crate::projects::require_open_project;
use crate::timer::UserLocks;

/// Entry operations outside the timer state machine
///
/// Shares the timer's [`UserLocks`] so edits never interleave with a
/// transition of the same user's active entry.
pub struct EntryService {
    entries: Arc<dyn EntryStore>,
    projects: Arc<dyn ProjectStore>,
    clock: Arc<dyn Clock>,
    locks: UserLocks,
    tz: Tz,
}

impl EntryService {
    pub fn new(
        entries: Arc<dyn EntryStore>,
        projects: Arc<dyn ProjectStore>,
        clock: Arc<dyn Clock>,
        locks: UserLocks,
        tz: Tz,
    ) -> Self {
        Self { entries, projects, clock, locks, tz }
    }

    /// Record a closed entry after the fact.
    ///
    /// # Errors
    ///
    /// [`TallyError::InvalidInput`] when the end is not after the start or
    /// the pause exceeds the span; [`TallyError::NotFound`] for an unknown
    /// project.
    pub async fn create_manual(&self, user_id: &UserId, input: ManualEntry) -> Result<TimeEntry> {
        let title = normalize_title(&input.title)?;
        let project_category = match input.project_id {
            Some(id) => Some(require_open_project(self.projects.as_ref(), user_id, id).await?.category),
            None => None,
        };

        let now = self.clock.now();
        let entry = TimeEntry {
            description: input.description,
            notes: input.notes,
            category: input.category.or(project_category).unwrap_or_default(),
            start_time: input.start_time,
            state: EntryState::Closed { end_time: input.end_time },
            paused_duration: input.paused_duration,
            origin: EntryOrigin::Manual,
            ..TimeEntry::start(user_id.clone(), title, input.project_id, Default::default(), now)
        };
        entry.validate()?;

        self.entries.create_entry(&entry).await?;
        info!(user_id = %user_id, entry_id = %entry.id, "Manual entry created");
        Ok(entry)
    }

    /// Apply a partial edit.
    ///
    /// Overriding a timestamp or the pause accumulator marks the entry as
    /// edited; the times of a running entry cannot be overridden.
    ///
    /// # Errors
    ///
    /// [`TallyError::NotFound`] for an unknown entry or project and
    /// [`TallyError::InvalidInput`] when the edited entry is inconsistent.
    pub async fn edit(&self, user_id: &UserId, entry_id: EntryId, edit: EntryEdit) -> Result<TimeEntry> {
        let _guard = self.locks.acquire(user_id).await;
        let mut entry = self.require_entry(user_id, entry_id).await?;
        let edited_times = edit.touches_times();

        if let Some(title) = edit.title.as_deref() {
            entry.title = normalize_title(title)?;
        }
        if let Some(description) = edit.description {
            entry.description = description;
        }
        if let Some(notes) = edit.notes {
            entry.notes = notes;
        }
        if let Some(category) = edit.category {
            entry.category = category;
        }
        if edit.clear_project {
            entry.project_id = None;
        } else if let Some(project_id) = edit.project_id.filter(|id| Some(*id) != entry.project_id) {
            require_open_project(self.projects.as_ref(), user_id, project_id).await?;
            entry.project_id = Some(project_id);
        }

        if edited_times {
            let EntryState::Closed { end_time } = entry.state else {
                return Err(TallyError::InvalidInput(
                    "times of a running entry cannot be edited".into(),
                ));
            };
            entry.start_time = edit.start_time.unwrap_or(entry.start_time);
            entry.state = EntryState::Closed { end_time: edit.end_time.unwrap_or(end_time) };
            if let Some(seconds) = edit.paused_seconds {
                entry.paused_duration = seconds_to_delta(seconds)?;
            }
            entry.was_edited = true;
        }

        entry.validate()?;
        entry.updated_at = self.clock.now();
        self.entries.update_entry(&entry).await?;
        info!(user_id = %user_id, entry_id = %entry_id, edited_times, "Entry updated");
        Ok(entry)
    }

    /// Bulk archive or unarchive. Returns the number of entries changed.
    pub async fn set_archived(&self, user_id: &UserId, ids: &[EntryId], archived: bool) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let changed = self.entries.set_archived(user_id, ids, archived).await?;
        info!(user_id = %user_id, requested = ids.len(), changed, archived, "Entries archive flag set");
        Ok(changed)
    }

    /// Flip one entry's archival flag and return the new value.
    pub async fn toggle_archive(&self, user_id: &UserId, entry_id: EntryId) -> Result<bool> {
        let entry = self.require_entry(user_id, entry_id).await?;
        let archived = !entry.is_archived;
        self.entries.set_archived(user_id, &[entry_id], archived).await?;
        Ok(archived)
    }

    /// Entries newest first. Dates select entries overlapping those local days.
    pub async fn list(&self, user_id: &UserId, query: EntryListQuery) -> Result<Vec<TimeEntry>> {
        if let (Some(start), Some(end)) = (query.start, query.end) {
            if start > end {
                return Ok(Vec::new());
            }
        }
        let to = query.end.and_then(|end| end.succ_opt()).map(|day| start_of_day(day, self.tz));
        let store_query = EntryQuery::for_user(user_id.clone())
            .between(query.start.map(|day| start_of_day(day, self.tz)), to)
            .project(query.project_id)
            .category(query.category)
            .include_archived(query.include_archived)
            .order(SortOrder::Descending)
            .limit(query.limit);
        self.entries.query_entries(&store_query).await
    }

    /// One entry with its formatted durations and project name.
    pub async fn details(&self, user_id: &UserId, entry_id: EntryId) -> Result<EntryDetails> {
        let entry = self.require_entry(user_id, entry_id).await?;
        let project_name = self.project_name(user_id, entry.project_id).await?;
        let worked = worked_duration(&entry);
        Ok(EntryDetails {
            project_name,
            worked_seconds: worked.map(|d| d.num_seconds()),
            formatted_duration: format_hms_opt(worked),
            formatted_paused: format_hms(entry.paused_duration),
            entry,
        })
    }

    /// The latest closed entries.
    pub async fn recent(&self, user_id: &UserId, limit: usize) -> Result<Vec<TimeEntry>> {
        let query = EntryQuery::for_user(user_id.clone())
            .closed_only()
            .order(SortOrder::Descending)
            .limit(Some(limit));
        self.entries.query_entries(&query).await
    }

    async fn require_entry(&self, user_id: &UserId, entry_id: EntryId) -> Result<TimeEntry> {
        self.entries
            .find_entry(user_id, entry_id)
            .await?
            .ok_or_else(|| TallyError::NotFound(format!("entry {entry_id}")))
    }

    async fn project_name(&self, user_id: &UserId, project_id: Option<ProjectId>) -> Result<String> {
        let Some(id) = project_id else {
            return Ok(NO_PROJECT_LABEL.to_string());
        };
        Ok(self
            .projects
            .find_project(id, user_id)
            .await?
            .map_or_else(|| NO_PROJECT_LABEL.to_string(), |project| project.name))
    }
}
