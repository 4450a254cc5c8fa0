use std::time::Duration;

use tally_domain::TallyError;
use tracing::{info, warn};

/// Log the outcome of a command execution with structured fields.
///
/// `command` is a logical identifier such as `"timer::start_timer"`. Callers
/// must avoid forwarding user data in it.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Convert a `TallyError` into a stable label suitable for logging.
#[inline]
pub const fn error_label(error: &TallyError) -> &'static str {
    match error {
        TallyError::AlreadyRunning => "already_running",
        TallyError::NoActiveEntry => "no_active_entry",
        TallyError::NotRunning => "not_running",
        TallyError::NotPaused => "not_paused",
        TallyError::InvalidRange(_) => "invalid_range",
        TallyError::NotFound(_) => "not_found",
        TallyError::InvalidInput(_) => "invalid_input",
        TallyError::Database(_) => "database",
        TallyError::Config(_) => "config",
        TallyError::Internal(_) => "internal",
    }
}
