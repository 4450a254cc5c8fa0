//! Command execution helpers
//!
//! Keeps each command wrapper down to its name and body.

use std::future::Future;
use std::time::Instant;

use tally_domain::Result as DomainResult;
use tracing::debug;

use crate::utils::logging::{error_label, log_command_execution};

/// Execute a command, timing and logging its outcome.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn my_command(ctx: &AppContext, user: &UserId) -> Result<MyResponse> {
///     execute_command("my_module::my_command", async {
///         ctx.some_service.do_something(user).await
///     })
///     .await
/// }
/// ```
pub async fn execute_command<Fut, T>(command_name: &str, command: Fut) -> DomainResult<T>
where
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();

    let result = command.await;

    let elapsed = start.elapsed();
    if let Err(err) = &result {
        debug!(command = command_name, error_type = error_label(err), error = %err, "command failed");
    }
    log_command_execution(command_name, elapsed, result.is_ok());

    result
}
