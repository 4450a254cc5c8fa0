//! Calendar-day arithmetic in a configured time zone

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// The local calendar day an instant falls on.
#[must_use]
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// First instant of a local calendar day.
///
/// Zones that skip local midnight on a DST change start the day at the first
/// hour that exists.
#[must_use]
pub fn start_of_day(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    (0..=3)
        .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .find_map(|time| tz.from_local_datetime(&date.and_time(time)).earliest())
        .map_or_else(|| date.and_time(NaiveTime::MIN).and_utc(), |local| local.with_timezone(&Utc))
}

/// Start of the local day following the one `instant` falls on.
#[must_use]
pub fn next_midnight(instant: DateTime<Utc>, tz: Tz) -> Option<DateTime<Utc>> {
    local_date(instant, tz).succ_opt().map(|next| start_of_day(next, tz))
}

/// Half-open UTC window `[start of first day, start of day after last)`.
#[must_use]
pub fn utc_window(first: NaiveDate, last: NaiveDate, tz: Tz) -> (DateTime<Utc>, Option<DateTime<Utc>>) {
    (start_of_day(first, tz), last.succ_opt().map(|day| start_of_day(day, tz)))
}

#[cfg(test)]
mod tests {
    use chrono_tz::{America, Europe};

    use super::*;

    #[test]
    fn local_date_follows_zone() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 23, 30, 0).unwrap();
        assert_eq!(local_date(instant, chrono_tz::UTC), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(
            local_date(instant, Europe::Stockholm),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
    }

    #[test]
    fn next_midnight_is_local() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let midnight = next_midnight(instant, Europe::Stockholm).unwrap();
        assert_eq!(midnight, Utc.with_ymd_and_hms(2024, 1, 15, 23, 0, 0).unwrap());
    }

    #[test]
    fn skipped_midnight_starts_at_first_existing_hour() {
        // Santiago springs forward at 00:00 local on 2024-09-08.
        let date = NaiveDate::from_ymd_opt(2024, 9, 8).unwrap();
        let start = start_of_day(date, America::Santiago);
        assert_eq!(local_date(start, America::Santiago), date);
        assert_eq!(start.with_timezone(&America::Santiago).time(), NaiveTime::from_hms_opt(1, 0, 0).unwrap());
    }
}
