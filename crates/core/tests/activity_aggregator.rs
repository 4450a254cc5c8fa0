//! Day bucketing, filtering and earnings of the activity aggregator

mod support;

use chrono::TimeDelta;
use chrono_tz::Europe;
use support::{closed, date, user, utc, Harness};
use tally_domain::constants::UNASSIGNED_LABEL;
use tally_domain::{ActivityFilter, Category, Period};

const EPS: f64 = 1e-9;

#[tokio::test]
async fn entry_across_midnight_lands_in_two_buckets() {
    let h = Harness::new();
    let alice = user("alice");
    h.closed_entry(&alice, None, utc(2024, 3, 1, 23, 30), utc(2024, 3, 2, 1, 15));

    let filter = ActivityFilter::new(Some(date(2024, 3, 1)), date(2024, 3, 2));
    let series = h.aggregator.get_activity_series(&alice, &filter).await.unwrap();

    assert_eq!(series.day_labels, vec![date(2024, 3, 1), date(2024, 3, 2)]);
    assert_eq!(series.series.len(), 1);
    assert_eq!(series.series[0].label, UNASSIGNED_LABEL);
    assert!((series.series[0].hours_per_day[0] - 0.5).abs() < EPS);
    assert!((series.series[0].hours_per_day[1] - 1.25).abs() < EPS);
}

#[tokio::test]
async fn bucket_sums_equal_worked_duration() {
    let h = Harness::with_zone(Europe::Stockholm);
    let alice = user("alice");
    let entry = closed(
        &alice,
        None,
        utc(2024, 3, 1, 20, 0),
        utc(2024, 3, 4, 3, 30),
        TimeDelta::minutes(95),
    );
    h.entries.insert(entry);

    let filter = ActivityFilter::new(Some(date(2024, 2, 28)), date(2024, 3, 6));
    let series = h.aggregator.get_activity_series(&alice, &filter).await.unwrap();
    let row = &series.series[0].hours_per_day;

    let expected_hours = (55.5 * 60.0 - 95.0) / 60.0;
    assert!((row.iter().sum::<f64>() - expected_hours).abs() < 1e-6);
    assert!(row.iter().all(|h| *h <= 24.0 + EPS));
    assert_eq!(series.day_labels.len(), 8);
}

#[tokio::test]
async fn billable_project_earns_and_unassigned_does_not() {
    let h = Harness::new();
    let alice = user("alice");
    let client = h.project(&alice, "Client", 50.0);
    h.closed_entry(&alice, Some(client.id), utc(2024, 3, 1, 9, 0), utc(2024, 3, 1, 10, 0));

    let filter = ActivityFilter::new(Some(date(2024, 3, 1)), date(2024, 3, 1));
    let before = h.aggregator.get_summary(&alice, &filter).await.unwrap();
    assert!((before.total_earnings - 50.0).abs() < EPS);
    assert_eq!(before.total_worked, TimeDelta::hours(1));

    h.closed_entry(&alice, None, utc(2024, 3, 1, 11, 0), utc(2024, 3, 1, 12, 0));
    let after = h.aggregator.get_summary(&alice, &filter).await.unwrap();
    assert!((after.total_earnings - 50.0).abs() < EPS);
    assert_eq!(after.total_worked, TimeDelta::hours(2));
    assert_eq!(after.total_worked_formatted, "2h");
    assert_eq!(after.earnings_by_project.len(), 1);
    assert_eq!(after.earnings_by_project[0].name, "Client");
}

#[tokio::test]
async fn worked_time_is_split_by_category() {
    let h = Harness::new();
    let alice = user("alice");
    let mut personal = closed(&alice, None, utc(2024, 3, 1, 18, 0), utc(2024, 3, 1, 18, 45), TimeDelta::zero());
    personal.category = Category::Personal;
    h.entries.insert(personal);
    h.closed_entry(&alice, None, utc(2024, 3, 1, 9, 0), utc(2024, 3, 1, 11, 0));

    let filter = ActivityFilter::new(Some(date(2024, 3, 1)), date(2024, 3, 1));
    let summary = h.aggregator.get_summary(&alice, &filter).await.unwrap();
    let by_category: Vec<_> =
        summary.worked_by_category.iter().map(|c| (c.category, c.worked)).collect();
    assert_eq!(
        by_category,
        vec![(Category::Work, TimeDelta::hours(2)), (Category::Personal, TimeDelta::minutes(45))]
    );
    assert_eq!(summary.worked_by_category[1].formatted, "45m");
}

#[tokio::test]
async fn filters_narrow_before_bucketing() {
    let h = Harness::new();
    let alice = user("alice");
    let a = h.project(&alice, "A", 0.0);
    let b = h.project(&alice, "B", 0.0);
    h.closed_entry(&alice, Some(a.id), utc(2024, 3, 1, 9, 0), utc(2024, 3, 1, 10, 0));
    h.closed_entry(&alice, Some(b.id), utc(2024, 3, 3, 9, 0), utc(2024, 3, 3, 10, 0));

    let all_time_b = ActivityFilter::new(None, date(2024, 3, 4)).with_project(Some(b.id));
    let series = h.aggregator.get_activity_series(&alice, &all_time_b).await.unwrap();

    assert_eq!(series.day_labels, vec![date(2024, 3, 3), date(2024, 3, 4)]);
    assert_eq!(series.series.len(), 1);
    assert_eq!(series.series[0].label, "B");
}

#[tokio::test]
async fn all_time_without_entries_is_a_single_day() {
    let h = Harness::new();
    let filter = ActivityFilter::for_period(Period::All, date(2024, 3, 10));
    let series = h.aggregator.get_activity_series(&user("alice"), &filter).await.unwrap();
    assert_eq!(series.day_labels, vec![date(2024, 3, 10)]);
    assert!(series.series.is_empty());
}

#[tokio::test]
async fn reversed_range_degrades_to_empty() {
    let h = Harness::new();
    let alice = user("alice");
    h.closed_entry(&alice, None, utc(2024, 3, 1, 9, 0), utc(2024, 3, 1, 10, 0));

    let filter = ActivityFilter::new(Some(date(2024, 3, 5)), date(2024, 3, 1));
    let series = h.aggregator.get_activity_series(&alice, &filter).await.unwrap();
    assert!(series.day_labels.is_empty());
    let summary = h.aggregator.get_summary(&alice, &filter).await.unwrap();
    assert_eq!(summary.total_worked, TimeDelta::zero());
}

#[tokio::test]
async fn archived_and_running_entries_are_excluded_by_default() {
    let h = Harness::new();
    let alice = user("alice");
    let mut archived = closed(&alice, None, utc(2024, 3, 1, 9, 0), utc(2024, 3, 1, 10, 0), TimeDelta::zero());
    archived.is_archived = true;
    h.entries.insert(archived);
    h.clock.set(utc(2024, 3, 1, 11, 0));
    h.timer.start(&alice, "live", None).await.unwrap();
    h.clock.advance(TimeDelta::hours(1));

    let filter = ActivityFilter::new(Some(date(2024, 3, 1)), date(2024, 3, 1));
    let summary = h.aggregator.get_summary(&alice, &filter).await.unwrap();
    assert_eq!(summary.total_worked, TimeDelta::zero());

    let with_archived = filter.with_archived(true);
    let summary = h.aggregator.get_summary(&alice, &with_archived).await.unwrap();
    assert_eq!(summary.total_worked, TimeDelta::hours(1));
}

#[tokio::test]
async fn other_users_entries_are_invisible() {
    let h = Harness::new();
    h.closed_entry(&user("bob"), None, utc(2024, 3, 1, 9, 0), utc(2024, 3, 1, 10, 0));
    let filter = ActivityFilter::new(Some(date(2024, 3, 1)), date(2024, 3, 1));
    let series = h.aggregator.get_activity_series(&user("alice"), &filter).await.unwrap();
    assert!(series.series.is_empty());
}
