//! Project management

pub mod ports;
pub mod service;

pub use ports::ProjectStore;
pub use service::ProjectService;
use tally_domain::{Project, ProjectId, Result, TallyError, UserId};

/// Look up a project the user may attach new work to.
///
/// # Errors
///
/// [`TallyError::NotFound`] when the project does not exist, belongs to
/// another user, or is archived.
pub async fn require_open_project(
    store: &dyn ProjectStore,
    user_id: &UserId,
    project_id: ProjectId,
) -> Result<Project> {
    match store.find_project(project_id, user_id).await? {
        Some(project) if !project.is_archived => Ok(project),
        _ => Err(TallyError::NotFound(format!("project {project_id}"))),
    }
}
