//! Manual entries, edits, archival and project cascades

mod support;

use chrono::TimeDelta;
use support::{date, user, utc, Harness};
use tally_core::duration::worked_duration;
use tally_domain::{
    Category, EntryEdit, EntryListQuery, EntryOrigin, ManualEntry, NewProject, TallyError,
};

fn manual(start_hour: u32, end_hour: u32) -> ManualEntry {
    ManualEntry {
        title: "Retro".into(),
        project_id: None,
        category: None,
        start_time: utc(2024, 3, 1, start_hour, 0),
        end_time: utc(2024, 3, 1, end_hour, 0),
        paused_duration: TimeDelta::zero(),
        description: String::new(),
        notes: String::new(),
    }
}

#[tokio::test]
async fn manual_entries_are_closed_and_flagged_manual() {
    let h = Harness::new();
    let alice = user("alice");
    let entry = h.entry_service.create_manual(&alice, manual(9, 11)).await.unwrap();

    assert_eq!(entry.origin, EntryOrigin::Manual);
    assert!(!entry.was_edited);
    assert_eq!(worked_duration(&entry), Some(TimeDelta::hours(2)));
    assert_eq!(h.entries.all().len(), 1);
}

#[tokio::test]
async fn manual_entry_validation() {
    let h = Harness::new();
    let alice = user("alice");

    let reversed = h.entry_service.create_manual(&alice, manual(11, 9)).await;
    assert!(matches!(reversed, Err(TallyError::InvalidInput(_))));

    let mut over_paused = manual(9, 10);
    over_paused.paused_duration = TimeDelta::minutes(61);
    assert!(h.entry_service.create_manual(&alice, over_paused).await.is_err());
    assert!(h.entries.all().is_empty());
}

#[tokio::test]
async fn manual_entry_can_be_recorded_while_a_timer_runs() {
    let h = Harness::new();
    let alice = user("alice");
    h.timer.start(&alice, "live", None).await.unwrap();
    assert!(h.entry_service.create_manual(&alice, manual(6, 7)).await.is_ok());
    assert_eq!(h.entries.active_count(&alice), 1);
}

#[tokio::test]
async fn editing_times_sets_the_edited_flag() {
    let h = Harness::new();
    let alice = user("alice");
    let entry = h.entry_service.create_manual(&alice, manual(9, 11)).await.unwrap();

    let renamed = h
        .entry_service
        .edit(&alice, entry.id, EntryEdit { title: Some("Retro notes".into()), ..EntryEdit::default() })
        .await
        .unwrap();
    assert!(!renamed.was_edited);

    let retimed = h
        .entry_service
        .edit(
            &alice,
            entry.id,
            EntryEdit { end_time: Some(utc(2024, 3, 1, 12, 0)), paused_seconds: Some(600), ..EntryEdit::default() },
        )
        .await
        .unwrap();
    assert!(retimed.was_edited);
    assert_eq!(worked_duration(&retimed), Some(TimeDelta::minutes(170)));
}

#[tokio::test]
async fn invalid_edits_leave_the_entry_untouched() {
    let h = Harness::new();
    let alice = user("alice");
    let entry = h.entry_service.create_manual(&alice, manual(9, 11)).await.unwrap();

    let result = h
        .entry_service
        .edit(&alice, entry.id, EntryEdit { start_time: Some(utc(2024, 3, 1, 12, 0)), ..EntryEdit::default() })
        .await;
    assert!(matches!(result, Err(TallyError::InvalidInput(_))));
    assert_eq!(h.entries.get(entry.id).unwrap(), entry);
}

#[tokio::test]
async fn oversized_paused_seconds_are_rejected() {
    let h = Harness::new();
    let alice = user("alice");
    let entry = h.entry_service.create_manual(&alice, manual(9, 11)).await.unwrap();

    for seconds in [i64::MAX, i64::MIN] {
        let edit = EntryEdit { paused_seconds: Some(seconds), ..EntryEdit::default() };
        let result = h.entry_service.edit(&alice, entry.id, edit).await;
        assert!(matches!(result, Err(TallyError::InvalidInput(_))), "{seconds}");
    }
    assert_eq!(h.entries.get(entry.id).unwrap(), entry);
}

#[tokio::test]
async fn running_entry_times_cannot_be_edited() {
    let h = Harness::new();
    let alice = user("alice");
    let id = h.timer.start(&alice, "live", None).await.unwrap();

    let result = h
        .entry_service
        .edit(&alice, id, EntryEdit { start_time: Some(utc(2024, 3, 1, 8, 0)), ..EntryEdit::default() })
        .await;
    assert!(matches!(result, Err(TallyError::InvalidInput(_))));

    let notes = EntryEdit { notes: Some("continue tomorrow".into()), ..EntryEdit::default() };
    assert!(h.entry_service.edit(&alice, id, notes).await.is_ok());
}

#[tokio::test]
async fn edits_of_other_users_entries_are_not_found() {
    let h = Harness::new();
    let entry = h.entry_service.create_manual(&user("alice"), manual(9, 10)).await.unwrap();
    let result = h.entry_service.edit(&user("mallory"), entry.id, EntryEdit::default()).await;
    assert!(matches!(result, Err(TallyError::NotFound(_))));
}

#[tokio::test]
async fn archive_toggles_and_listing_hides_archived() {
    let h = Harness::new();
    let alice = user("alice");
    let first = h.entry_service.create_manual(&alice, manual(9, 10)).await.unwrap();
    let second = h.entry_service.create_manual(&alice, manual(11, 12)).await.unwrap();

    assert_eq!(h.entry_service.set_archived(&alice, &[first.id, second.id], true).await.unwrap(), 2);
    assert!(h.entry_service.list(&alice, EntryListQuery::default()).await.unwrap().is_empty());

    assert!(!h.entry_service.toggle_archive(&alice, first.id).await.unwrap());
    let listed = h.entry_service.list(&alice, EntryListQuery::default()).await.unwrap();
    assert_eq!(listed.len(), 1);

    let everything = EntryListQuery { include_archived: true, ..EntryListQuery::default() };
    let listed = h.entry_service.list(&alice, everything).await.unwrap();
    assert_eq!(listed.iter().map(|e| e.id).collect::<Vec<_>>(), vec![second.id, first.id]);
}

#[tokio::test]
async fn list_filters_by_local_day() {
    let h = Harness::new();
    let alice = user("alice");
    h.closed_entry(&alice, None, utc(2024, 3, 1, 9, 0), utc(2024, 3, 1, 10, 0));
    h.closed_entry(&alice, None, utc(2024, 3, 3, 9, 0), utc(2024, 3, 3, 10, 0));

    let query = EntryListQuery {
        start: Some(date(2024, 3, 2)),
        end: Some(date(2024, 3, 3)),
        ..EntryListQuery::default()
    };
    assert_eq!(h.entry_service.list(&alice, query).await.unwrap().len(), 1);
}

#[tokio::test]
async fn details_format_durations() {
    let h = Harness::new();
    let alice = user("alice");
    let mut input = manual(9, 11);
    input.paused_duration = TimeDelta::seconds(150);
    let entry = h.entry_service.create_manual(&alice, input).await.unwrap();

    let details = h.entry_service.details(&alice, entry.id).await.unwrap();
    assert_eq!(details.formatted_duration, "1h 57m 30s");
    assert_eq!(details.formatted_paused, "2m 30s");
    assert_eq!(details.project_name, "No Project");
}

#[tokio::test]
async fn recent_returns_latest_closed_entries() {
    let h = Harness::new();
    let alice = user("alice");
    for hour in 1..6 {
        h.closed_entry(&alice, None, utc(2024, 3, 1, hour, 0), utc(2024, 3, 1, hour, 30));
    }
    h.timer.start(&alice, "live", None).await.unwrap();

    let recent = h.entry_service.recent(&alice, 3).await.unwrap();
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0].start_time, utc(2024, 3, 1, 5, 0));
    assert!(recent.iter().all(|e| !e.is_active()));
}

#[tokio::test]
async fn project_creation_validates_input() {
    let h = Harness::new();
    let alice = user("alice");
    let negative = NewProject {
        name: "Client".into(),
        description: String::new(),
        category: Category::Work,
        hourly_rate: -1.0,
    };
    assert!(h.project_service.create(&alice, negative).await.is_err());

    let blank = NewProject {
        name: "  ".into(),
        description: String::new(),
        category: Category::Work,
        hourly_rate: 0.0,
    };
    assert!(h.project_service.create(&alice, blank).await.is_err());
}

#[tokio::test]
async fn archiving_a_project_cascades_only_when_asked() {
    let h = Harness::new();
    let alice = user("alice");
    let project = h
        .project_service
        .create(
            &alice,
            NewProject { name: "Client".into(), description: String::new(), category: Category::Personal, hourly_rate: 40.0 },
        )
        .await
        .unwrap();
    let mut input = manual(9, 10);
    input.project_id = Some(project.id);
    let entry = h.entry_service.create_manual(&alice, input).await.unwrap();
    assert_eq!(entry.category, Category::Personal);

    let archived = h.project_service.toggle_archive(&alice, project.id, false).await.unwrap();
    assert!(archived.is_archived);
    assert!(!h.entries.get(entry.id).unwrap().is_archived);

    let restored = h.project_service.toggle_archive(&alice, project.id, true).await.unwrap();
    assert!(!restored.is_archived);
    let archived = h.project_service.toggle_archive(&alice, project.id, true).await.unwrap();
    assert!(archived.is_archived);
    assert!(h.entries.get(entry.id).unwrap().is_archived);
    assert_eq!(h.entries.all().len(), 1);

    assert!(h.project_service.list(&alice, false).await.unwrap().is_empty());
    assert_eq!(h.project_service.list(&alice, true).await.unwrap().len(), 1);
}
