//! Checked construction of durations from caller-supplied counts

use chrono::TimeDelta;

use crate::{Result, TallyError};

/// Build a duration from whole seconds, rejecting values chrono cannot hold.
///
/// # Errors
///
/// [`TallyError::InvalidInput`] when `seconds` is outside the representable range.
pub fn seconds_to_delta(seconds: i64) -> Result<TimeDelta> {
    TimeDelta::try_seconds(seconds)
        .ok_or_else(|| TallyError::InvalidInput(format!("duration out of range: {seconds}s")))
}
