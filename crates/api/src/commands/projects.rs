//! Project management commands

use tally_domain::{NewProject, Project, ProjectId, Result, UserId};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

pub async fn create_project(
    ctx: &AppContext,
    user_id: &UserId,
    input: NewProject,
) -> Result<Project> {
    execute_command("projects::create_project", ctx.projects.create(user_id, input)).await
}

pub async fn list_projects(
    ctx: &AppContext,
    user_id: &UserId,
    include_archived: bool,
) -> Result<Vec<Project>> {
    execute_command("projects::list_projects", ctx.projects.list(user_id, include_archived)).await
}

/// Flip a project's archive flag, optionally applying it to its entries.
pub async fn toggle_project_archive(
    ctx: &AppContext,
    user_id: &UserId,
    project_id: ProjectId,
    cascade_entries: bool,
) -> Result<Project> {
    execute_command(
        "projects::toggle_project_archive",
        ctx.projects.toggle_archive(user_id, project_id, cascade_entries),
    )
    .await
}
