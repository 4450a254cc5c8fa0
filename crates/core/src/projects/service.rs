//! Project creation, listing and archival

use std::sync::Arc;

use tally_domain::utils::normalize_project_name;
use tally_domain::{NewProject, Project, ProjectId, Result, TallyError, UserId};
use tracing::info;

use super::ports::ProjectStore;
use crate::clock::Clock;
use crate::entries::ports::EntryStore;

pub struct ProjectService {
    projects: Arc<dyn ProjectStore>,
    entries: Arc<dyn EntryStore>,
    clock: Arc<dyn Clock>,
}

impl ProjectService {
    pub fn new(
        projects: Arc<dyn ProjectStore>,
        entries: Arc<dyn EntryStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { projects, entries, clock }
    }

    /// # Errors
    ///
    /// [`TallyError::InvalidInput`] for a blank name or a negative or
    /// non-finite hourly rate.
    pub async fn create(&self, user_id: &UserId, input: NewProject) -> Result<Project> {
        let name = normalize_project_name(&input.name)?;
        if !input.hourly_rate.is_finite() || input.hourly_rate < 0.0 {
            return Err(TallyError::InvalidInput("hourly rate must be zero or positive".into()));
        }

        let project = Project {
            id: ProjectId::new(),
            owner_id: user_id.clone(),
            name,
            description: input.description.trim().to_string(),
            category: input.category,
            hourly_rate: input.hourly_rate,
            is_archived: false,
            created_at: self.clock.now(),
        };
        self.projects.create_project(&project).await?;
        info!(user_id = %user_id, project_id = %project.id, "Project created");
        Ok(project)
    }

    pub async fn list(&self, user_id: &UserId, include_archived: bool) -> Result<Vec<Project>> {
        self.projects.list_projects(user_id, include_archived).await
    }

    /// Flip the project's archival flag. With `cascade_entries` the new flag
    /// is copied onto every entry of the project; entries are never deleted.
    ///
    /// # Errors
    ///
    /// [`TallyError::NotFound`] for a project the user does not own.
    pub async fn toggle_archive(
        &self,
        user_id: &UserId,
        project_id: ProjectId,
        cascade_entries: bool,
    ) -> Result<Project> {
        let mut project = self
            .projects
            .find_project(project_id, user_id)
            .await?
            .ok_or_else(|| TallyError::NotFound(format!("project {project_id}")))?;

        project.is_archived = !project.is_archived;
        self.projects.update_project(&project).await?;

        let cascaded = if cascade_entries {
            self.entries
                .set_project_entries_archived(user_id, project_id, project.is_archived)
                .await?
        } else {
            0
        };
        info!(
            user_id = %user_id,
            project_id = %project_id,
            archived = project.is_archived,
            cascaded,
            "Project archive toggled"
        );
        Ok(project)
    }
}
