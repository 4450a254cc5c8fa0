//! Dashboard analytics commands

use tally_domain::{ActivityFilter, ActivitySeries, ActivitySummary, Period, Result, UserId};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Filter for a look-back preset ending today in the configured zone.
///
/// Falls back to the configured default period.
pub fn period_filter(ctx: &AppContext, period: Option<Period>) -> ActivityFilter {
    let period = period.unwrap_or(ctx.config.analytics.default_period);
    ActivityFilter::for_period(period, ctx.today())
}

/// Per-project worked hours for every day of the filter's range.
pub async fn get_activity_series(
    ctx: &AppContext,
    user_id: &UserId,
    filter: &ActivityFilter,
) -> Result<ActivitySeries> {
    execute_command(
        "analytics::get_activity_series",
        ctx.aggregator.get_activity_series(user_id, filter),
    )
    .await
}

/// Totals by category and earnings by project over the filter's range.
pub async fn get_summary(
    ctx: &AppContext,
    user_id: &UserId,
    filter: &ActivityFilter,
) -> Result<ActivitySummary> {
    execute_command("analytics::get_summary", ctx.aggregator.get_summary(user_id, filter)).await
}
