//! Timer commands

use tally_domain::{EntryId, ProjectId, Result, TimerStatus, UserId};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Start a new running entry for the user.
pub async fn start_timer(
    ctx: &AppContext,
    user_id: &UserId,
    title: &str,
    project_id: Option<ProjectId>,
) -> Result<EntryId> {
    execute_command("timer::start_timer", ctx.timer.start(user_id, title, project_id)).await
}

pub async fn stop_timer(ctx: &AppContext, user_id: &UserId) -> Result<EntryId> {
    execute_command("timer::stop_timer", ctx.timer.stop(user_id)).await
}

pub async fn pause_timer(ctx: &AppContext, user_id: &UserId) -> Result<EntryId> {
    execute_command("timer::pause_timer", ctx.timer.pause(user_id)).await
}

pub async fn resume_timer(ctx: &AppContext, user_id: &UserId) -> Result<EntryId> {
    execute_command("timer::resume_timer", ctx.timer.resume(user_id)).await
}

/// Current timer state with the worked time so far.
pub async fn timer_status(ctx: &AppContext, user_id: &UserId) -> Result<TimerStatus> {
    execute_command("timer::timer_status", ctx.timer.status(user_id)).await
}
