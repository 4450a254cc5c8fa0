//! Worked-duration arithmetic and formatting
//!
//! Pure functions shared by the timer, the aggregator and the report
//! assembler.

use chrono::{DateTime, TimeDelta, Utc};
use tally_domain::constants::MILLIS_PER_HOUR;
use tally_domain::{EntryState, TimeEntry};

/// `max(0, (end - start) - paused)` for closed entries, `None` while active.
#[must_use]
pub fn worked_duration(entry: &TimeEntry) -> Option<TimeDelta> {
    entry.gross_duration().map(|gross| clamp_non_negative(gross - entry.paused_duration))
}

/// Worked time so far, as of `now`.
///
/// A paused entry stops accruing at the moment the pause began. Closed
/// entries report their final worked duration.
#[must_use]
pub fn elapsed_at(entry: &TimeEntry, now: DateTime<Utc>) -> TimeDelta {
    let reference = match entry.state {
        EntryState::Running => now,
        EntryState::Paused { since } => since,
        EntryState::Closed { end_time } => end_time,
    };
    clamp_non_negative(reference - entry.start_time - entry.paused_duration)
}

/// Render a duration as compact `XhYmZs` tokens.
///
/// Zero-valued units are omitted; a zero or negative duration is `"0s"`.
/// Sub-second remainders are truncated.
///
/// ```
/// use chrono::TimeDelta;
/// use tally_core::duration::format_hms;
///
/// assert_eq!(format_hms(TimeDelta::seconds(150)), "2m 30s");
/// assert_eq!(format_hms(TimeDelta::seconds(3661)), "1h 1m 1s");
/// assert_eq!(format_hms(TimeDelta::seconds(-5)), "0s");
/// ```
#[must_use]
pub fn format_hms(duration: TimeDelta) -> String {
    let total_secs = duration.num_seconds();
    if total_secs <= 0 {
        return "0s".to_string();
    }

    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    [(hours, "h"), (minutes, "m"), (seconds, "s")]
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, suffix)| format!("{value}{suffix}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// [`format_hms`] for optional durations; `None` renders as `"0s"`.
#[must_use]
pub fn format_hms_opt(duration: Option<TimeDelta>) -> String {
    duration.map_or_else(|| "0s".to_string(), format_hms)
}

/// Render a duration as `HH:MM:SS`. Hours are not wrapped at 24.
///
/// ```
/// use chrono::TimeDelta;
/// use tally_core::duration::format_clock;
///
/// assert_eq!(format_clock(TimeDelta::seconds(3661)), "01:01:01");
/// assert_eq!(format_clock(TimeDelta::hours(26)), "26:00:00");
/// ```
#[must_use]
pub fn format_clock(duration: TimeDelta) -> String {
    let total_secs = duration.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", total_secs / 3600, (total_secs % 3600) / 60, total_secs % 60)
}

/// Fractional hours, at millisecond resolution.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn hours(duration: TimeDelta) -> f64 {
    duration.num_milliseconds() as f64 / MILLIS_PER_HOUR
}

pub(crate) fn clamp_non_negative(duration: TimeDelta) -> TimeDelta {
    duration.max(TimeDelta::zero())
}
