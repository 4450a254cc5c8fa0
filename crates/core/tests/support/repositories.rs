//! In-memory store implementations for testing
//!
//! Mirror the SQLite adapter's semantics (overlap queries, ordering, the
//! one-active-entry-per-user constraint) so core tests run without a
//! database.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tally_core::entries::ports::EntryStore;
use tally_core::projects::ports::ProjectStore;
use tally_domain::{
    EntryId, EntryQuery, Project, ProjectId, Result as DomainResult, SortOrder, TallyError,
    TimeEntry, UserId,
};

/// In-memory `EntryStore`.
///
/// `find_active_entry` yields to the scheduler before answering, which
/// widens the window for racing callers that skip the user lock.
#[derive(Default, Clone)]
pub struct InMemoryEntryStore {
    entries: Arc<Mutex<Vec<TimeEntry>>>,
}

impl InMemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store directly, bypassing the active-entry check.
    pub fn with_entries(entries: Vec<TimeEntry>) -> Self {
        Self { entries: Arc::new(Mutex::new(entries)) }
    }

    pub fn insert(&self, entry: TimeEntry) {
        self.entries.lock().push(entry);
    }

    pub fn all(&self) -> Vec<TimeEntry> {
        self.entries.lock().clone()
    }

    pub fn get(&self, id: EntryId) -> Option<TimeEntry> {
        self.entries.lock().iter().find(|e| e.id == id).cloned()
    }

    pub fn active_count(&self, user_id: &UserId) -> usize {
        self.entries.lock().iter().filter(|e| &e.user_id == user_id && e.is_active()).count()
    }
}

#[async_trait]
impl EntryStore for InMemoryEntryStore {
    async fn find_active_entry(&self, user_id: &UserId) -> DomainResult<Option<TimeEntry>> {
        tokio::task::yield_now().await;
        Ok(self.entries.lock().iter().find(|e| &e.user_id == user_id && e.is_active()).cloned())
    }

    async fn create_entry(&self, entry: &TimeEntry) -> DomainResult<EntryId> {
        let mut entries = self.entries.lock();
        if entry.is_active() && entries.iter().any(|e| e.user_id == entry.user_id && e.is_active()) {
            return Err(TallyError::AlreadyRunning);
        }
        entries.push(entry.clone());
        Ok(entry.id)
    }

    async fn update_entry(&self, entry: &TimeEntry) -> DomainResult<()> {
        let mut entries = self.entries.lock();
        let slot = entries
            .iter_mut()
            .find(|e| e.id == entry.id && e.user_id == entry.user_id)
            .ok_or_else(|| TallyError::NotFound(format!("entry {}", entry.id)))?;
        *slot = entry.clone();
        Ok(())
    }

    async fn find_entry(&self, user_id: &UserId, entry_id: EntryId) -> DomainResult<Option<TimeEntry>> {
        Ok(self.entries.lock().iter().find(|e| e.id == entry_id && &e.user_id == user_id).cloned())
    }

    async fn query_entries(&self, query: &EntryQuery) -> DomainResult<Vec<TimeEntry>> {
        let mut found: Vec<TimeEntry> =
            self.entries.lock().iter().filter(|e| query.matches(e)).cloned().collect();
        found.sort_by_key(|e| e.start_time);
        if query.order == SortOrder::Descending {
            found.reverse();
        }
        if let Some(limit) = query.limit {
            found.truncate(limit);
        }
        Ok(found)
    }

    async fn set_archived(&self, user_id: &UserId, ids: &[EntryId], archived: bool) -> DomainResult<usize> {
        let mut changed = 0;
        for entry in self.entries.lock().iter_mut() {
            if &entry.user_id == user_id && ids.contains(&entry.id) && entry.is_archived != archived {
                entry.is_archived = archived;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn set_project_entries_archived(
        &self,
        user_id: &UserId,
        project_id: ProjectId,
        archived: bool,
    ) -> DomainResult<usize> {
        let mut changed = 0;
        for entry in self.entries.lock().iter_mut() {
            if &entry.user_id == user_id && entry.project_id == Some(project_id) && entry.is_archived != archived {
                entry.is_archived = archived;
                changed += 1;
            }
        }
        Ok(changed)
    }
}

/// In-memory `ProjectStore`.
#[derive(Default, Clone)]
pub struct InMemoryProjectStore {
    projects: Arc<Mutex<Vec<Project>>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, project: Project) {
        self.projects.lock().push(project);
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn find_project(&self, project_id: ProjectId, user_id: &UserId) -> DomainResult<Option<Project>> {
        Ok(self.projects.lock().iter().find(|p| p.id == project_id && &p.owner_id == user_id).cloned())
    }

    async fn create_project(&self, project: &Project) -> DomainResult<ProjectId> {
        self.projects.lock().push(project.clone());
        Ok(project.id)
    }

    async fn update_project(&self, project: &Project) -> DomainResult<()> {
        let mut projects = self.projects.lock();
        let slot = projects
            .iter_mut()
            .find(|p| p.id == project.id)
            .ok_or_else(|| TallyError::NotFound(format!("project {}", project.id)))?;
        *slot = project.clone();
        Ok(())
    }

    async fn list_projects(&self, user_id: &UserId, include_archived: bool) -> DomainResult<Vec<Project>> {
        let mut found: Vec<Project> = self
            .projects
            .lock()
            .iter()
            .filter(|p| &p.owner_id == user_id && (include_archived || !p.is_archived))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }
}
