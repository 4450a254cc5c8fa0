//! Report commands

use tally_domain::{DateRange, EarningsReport, ProjectId, Report, ReportFilter, Result, UserId};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

pub async fn get_report(ctx: &AppContext, user_id: &UserId, filter: &ReportFilter) -> Result<Report> {
    execute_command("reports::get_report", ctx.reports.get_report(user_id, filter)).await
}

/// Daily earnings and payroll deductions for one project.
pub async fn get_earnings(
    ctx: &AppContext,
    user_id: &UserId,
    project_id: ProjectId,
    range: DateRange,
) -> Result<EarningsReport> {
    execute_command("reports::get_earnings", ctx.reports.get_earnings(user_id, project_id, range))
        .await
}
