//! Port interface for durable time-entry storage

use async_trait::async_trait;
use tally_domain::{EntryId, EntryQuery, ProjectId, Result, TimeEntry, UserId};

/// Record store for time entries
///
/// Implementations must reject a second active entry for the same user
/// with [`TallyError::AlreadyRunning`](tally_domain::TallyError::AlreadyRunning)
/// when they can detect it.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// The user's entry without an end time, if any.
    async fn find_active_entry(&self, user_id: &UserId) -> Result<Option<TimeEntry>>;

    async fn create_entry(&self, entry: &TimeEntry) -> Result<EntryId>;

    /// Overwrite a stored entry. Unknown ids fail with `NotFound`.
    async fn update_entry(&self, entry: &TimeEntry) -> Result<()>;

    async fn find_entry(&self, user_id: &UserId, entry_id: EntryId) -> Result<Option<TimeEntry>>;

    async fn query_entries(&self, query: &EntryQuery) -> Result<Vec<TimeEntry>>;

    /// Set the archival flag on the listed entries owned by the user.
    /// Returns the number of entries changed.
    async fn set_archived(&self, user_id: &UserId, ids: &[EntryId], archived: bool)
        -> Result<usize>;

    /// Set the archival flag on every entry of a project.
    async fn set_project_entries_archived(
        &self,
        user_id: &UserId,
        project_id: ProjectId,
        archived: bool,
    ) -> Result<usize>;
}
