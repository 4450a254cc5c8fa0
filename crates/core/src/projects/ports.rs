//! Port interface for project storage

use async_trait::async_trait;
use tally_domain::{Project, ProjectId, Result, UserId};

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// A project owned by `user_id`. Other users' projects are invisible.
    async fn find_project(&self, project_id: ProjectId, user_id: &UserId)
        -> Result<Option<Project>>;

    async fn create_project(&self, project: &Project) -> Result<ProjectId>;

    async fn update_project(&self, project: &Project) -> Result<()>;

    /// Projects of a user ordered by name.
    async fn list_projects(&self, user_id: &UserId, include_archived: bool)
        -> Result<Vec<Project>>;
}
