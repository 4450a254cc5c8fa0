//! Midnight splitting of closed entries into calendar-day chunks

use chrono::{NaiveDate, TimeDelta};
use chrono_tz::Tz;
use tally_domain::TimeEntry;

use crate::calendar::{local_date, next_midnight};
use crate::duration::worked_duration;

/// Worked time an entry contributes to one local calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayChunk {
    pub date: NaiveDate,
    pub worked: TimeDelta,
}

/// Split a closed entry at each local midnight it crosses.
///
/// Each chunk's wall-clock span is scaled by `worked / gross` so that paused
/// entries distribute their pause evenly; the chunks always sum to exactly
/// the entry's worked duration. Active entries yield nothing.
///
/// Chunks follow the zone's real day length, so a full day on a DST
/// transition contributes 23 or 25 hours.
#[must_use]
pub fn split_by_day(entry: &TimeEntry, tz: Tz) -> Vec<DayChunk> {
    let (Some(end), Some(worked)) = (entry.end_time(), worked_duration(entry)) else {
        return Vec::new();
    };

    let mut spans: Vec<(NaiveDate, i64)> = Vec::new();
    let mut cursor = entry.start_time;
    while cursor < end {
        let chunk_end = next_midnight(cursor, tz).filter(|m| *m > cursor).map_or(end, |m| m.min(end));
        spans.push((local_date(cursor, tz), (chunk_end - cursor).num_milliseconds()));
        cursor = chunk_end;
    }

    let gross_ms: i64 = spans.iter().map(|(_, ms)| ms).sum();
    let worked_ms = worked.num_milliseconds();
    if gross_ms <= 0 {
        return Vec::new();
    }

    let mut assigned = 0_i64;
    let last = spans.len() - 1;
    spans
        .iter()
        .enumerate()
        .map(|(idx, (date, span_ms))| {
            let share = if idx == last {
                worked_ms - assigned
            } else {
                scale(*span_ms, worked_ms, gross_ms)
            };
            assigned += share;
            DayChunk { date: *date, worked: TimeDelta::milliseconds(share) }
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn scale(span_ms: i64, worked_ms: i64, gross_ms: i64) -> i64 {
    if worked_ms == gross_ms {
        return span_ms;
    }
    (span_ms as f64 * worked_ms as f64 / gross_ms as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use chrono_tz::Europe;
    use tally_domain::{Category, EntryState, UserId};

    use super::*;

    fn closed(start: DateTime<Utc>, end: DateTime<Utc>, paused: TimeDelta) -> TimeEntry {
        let mut entry = TimeEntry::start(UserId::from("u"), "t".into(), None, Category::Work, start);
        entry.state = EntryState::Closed { end_time: end };
        entry.paused_duration = paused;
        entry
    }

    fn utc(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, h, m, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn same_day_entry_is_one_chunk() {
        let chunks = split_by_day(&closed(utc(1, 9, 0), utc(1, 17, 0), TimeDelta::zero()), chrono_tz::UTC);
        assert_eq!(chunks, vec![DayChunk { date: day(1), worked: TimeDelta::hours(8) }]);
    }

    #[test]
    fn entry_across_midnight_splits_in_two() {
        let chunks = split_by_day(&closed(utc(1, 23, 30), utc(2, 1, 15), TimeDelta::zero()), chrono_tz::UTC);
        assert_eq!(
            chunks,
            vec![
                DayChunk { date: day(1), worked: TimeDelta::minutes(30) },
                DayChunk { date: day(2), worked: TimeDelta::minutes(75) },
            ]
        );
    }

    #[test]
    fn multi_day_entry_caps_each_day_at_24h() {
        let chunks = split_by_day(&closed(utc(1, 12, 0), utc(4, 6, 0), TimeDelta::zero()), chrono_tz::UTC);
        assert_eq!(chunks.len(), 4);
        assert!(chunks.iter().all(|c| c.worked <= TimeDelta::hours(24)));
        assert_eq!(chunks[1].worked, TimeDelta::hours(24));
        let total: TimeDelta = chunks.iter().map(|c| c.worked).sum();
        assert_eq!(total, TimeDelta::hours(66));
    }

    #[test]
    fn pause_is_spread_proportionally() {
        // 2h gross, 1h paused: each half-span contributes half.
        let entry = closed(utc(1, 23, 0), utc(2, 1, 0), TimeDelta::hours(1));
        let chunks = split_by_day(&entry, chrono_tz::UTC);
        assert_eq!(chunks[0].worked, TimeDelta::minutes(30));
        assert_eq!(chunks[1].worked, TimeDelta::minutes(30));
    }

    #[test]
    fn chunks_sum_to_worked_duration_with_odd_ratios() {
        let entry = closed(utc(1, 22, 17), utc(3, 3, 41), TimeDelta::seconds(4_321));
        let chunks = split_by_day(&entry, chrono_tz::UTC);
        let total: TimeDelta = chunks.iter().map(|c| c.worked).sum();
        assert_eq!(Some(total), worked_duration(&entry));
    }

    #[test]
    fn midnight_is_taken_in_the_configured_zone() {
        // 22:30 to 23:30 UTC is 23:30 to 00:30 in Stockholm (UTC+1 in March).
        let chunks = split_by_day(&closed(utc(1, 22, 30), utc(1, 23, 30), TimeDelta::zero()), Europe::Stockholm);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], DayChunk { date: day(1), worked: TimeDelta::minutes(30) });
        assert_eq!(chunks[1], DayChunk { date: day(2), worked: TimeDelta::minutes(30) });
    }

    #[test]
    fn dst_days_keep_their_real_length() {
        let stockholm = Europe::Stockholm;
        // Local 2024-10-26 12:00 to 2024-10-28 12:00; clocks fall back on the 27th.
        let start = Utc.with_ymd_and_hms(2024, 10, 26, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 10, 28, 11, 0, 0).unwrap();
        let chunks = split_by_day(&closed(start, end, TimeDelta::zero()), stockholm);

        let date = |d| NaiveDate::from_ymd_opt(2024, 10, d).unwrap();
        assert_eq!(
            chunks,
            vec![
                DayChunk { date: date(26), worked: TimeDelta::hours(12) },
                DayChunk { date: date(27), worked: TimeDelta::hours(25) },
                DayChunk { date: date(28), worked: TimeDelta::hours(12) },
            ]
        );

        // Spring forward: 2024-03-31 is 23 hours long.
        let start = Utc.with_ymd_and_hms(2024, 3, 30, 23, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 31, 22, 0, 0).unwrap();
        let chunks = split_by_day(&closed(start, end, TimeDelta::zero()), stockholm);
        let march_31 = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(chunks, vec![DayChunk { date: march_31, worked: TimeDelta::hours(23) }]);
    }

    #[test]
    fn active_entries_are_not_split() {
        let entry = TimeEntry::start(UserId::from("u"), "t".into(), None, Category::Work, utc(1, 9, 0));
        assert!(split_by_day(&entry, chrono_tz::UTC).is_empty());
    }
}
