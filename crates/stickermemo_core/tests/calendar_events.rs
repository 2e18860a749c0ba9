use chrono::{DateTime, TimeZone, Utc};
use stickermemo_core::db::open_db_in_memory;
use stickermemo_core::model::event::{EventValidationError, RepeatRule};
use stickermemo_core::repo::event_repo::SqliteEventRepository;
use stickermemo_core::repo::RepoError;
use stickermemo_core::service::event_service::{EventDraft, EventService, EventServiceError};

#[test]
fn schedule_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::new(&conn));

    let mut draft = EventDraft::new("Dentist", at(2024, 5, 10, 9, 0), at(2024, 5, 10, 9, 30));
    draft.description = Some("Bring insurance card".to_string());
    draft.reminder_minutes = Some(30);
    draft.color = Some("#90CAF9".to_string());

    let event = service.schedule("user-1", draft).unwrap();

    assert_eq!(event.user_id, "user-1");
    assert_eq!(event.title, "Dentist");
    assert_eq!(event.description.as_deref(), Some("Bring insurance card"));
    assert_eq!(event.reminder_minutes, Some(30));
    assert_eq!(event.color, "#90CAF9");
    assert!(!event.is_all_day);
    assert_eq!(event.repeat, RepeatRule::None);

    let loaded = service.get_event(event.id).unwrap().unwrap();
    assert_eq!(loaded, event);
}

#[test]
fn schedule_rejects_invalid_windows() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::new(&conn));

    let reversed = EventDraft::new("Backwards", at(2024, 5, 10, 10, 0), at(2024, 5, 10, 9, 0));
    let err = service.schedule("user-1", reversed).unwrap_err();
    assert!(matches!(
        err,
        EventServiceError::Repo(RepoError::EventValidation(
            EventValidationError::EndsBeforeStart
        ))
    ));

    let blank = EventDraft::new("   ", at(2024, 5, 10, 9, 0), at(2024, 5, 10, 10, 0));
    let err = service.schedule("user-1", blank).unwrap_err();
    assert!(matches!(
        err,
        EventServiceError::Repo(RepoError::EventValidation(EventValidationError::EmptyTitle))
    ));

    let mut repeating = EventDraft::new("Standup", at(2024, 5, 10, 9, 0), at(2024, 5, 10, 9, 15));
    repeating.repeat = RepeatRule::Daily;
    repeating.repeat_until = Some(at(2024, 5, 1, 0, 0));
    let err = service.schedule("user-1", repeating).unwrap_err();
    assert!(matches!(
        err,
        EventServiceError::Repo(RepoError::EventValidation(
            EventValidationError::RepeatUntilBeforeStart
        ))
    ));
}

#[test]
fn update_replaces_fields_and_stamps_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::new(&conn));

    let draft = EventDraft::new("Standup", at(2024, 5, 13, 9, 0), at(2024, 5, 13, 9, 15));
    let event = service.schedule("user-1", draft).unwrap();
    assert_eq!(event.created_at, event.updated_at);

    let mut edit = EventDraft::new("Standup (moved)", at(2024, 5, 13, 10, 0), at(2024, 5, 13, 10, 15));
    edit.repeat = RepeatRule::Weekly;
    edit.repeat_until = Some(at(2024, 6, 30, 0, 0));
    edit.is_all_day = false;
    let updated = service.update_event(event.id, edit).unwrap();

    assert_eq!(updated.id, event.id);
    assert_eq!(updated.title, "Standup (moved)");
    assert_eq!(updated.starts_at, at(2024, 5, 13, 10, 0));
    assert_eq!(updated.repeat, RepeatRule::Weekly);
    assert_eq!(updated.created_at, event.created_at);
    assert!(updated.updated_at >= event.updated_at);
    // Fields absent from the replacement draft reset to their defaults.
    assert_eq!(updated.description, None);
}

#[test]
fn update_unknown_event_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::new(&conn));

    let ghost_id = uuid::Uuid::new_v4();
    let draft = EventDraft::new("Ghost", at(2024, 5, 13, 9, 0), at(2024, 5, 13, 9, 15));
    let err = service.update_event(ghost_id, draft).unwrap_err();
    assert!(matches!(
        err,
        EventServiceError::EventNotFound(id) if id == ghost_id
    ));
}

#[test]
fn events_between_returns_the_window_sorted_by_start() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::new(&conn));

    let may_late = service
        .schedule(
            "user-1",
            EventDraft::new("Late May", at(2024, 5, 28, 9, 0), at(2024, 5, 28, 10, 0)),
        )
        .unwrap();
    let may_early = service
        .schedule(
            "user-1",
            EventDraft::new("Early May", at(2024, 5, 2, 9, 0), at(2024, 5, 2, 10, 0)),
        )
        .unwrap();
    service
        .schedule(
            "user-1",
            EventDraft::new("June", at(2024, 6, 3, 9, 0), at(2024, 6, 3, 10, 0)),
        )
        .unwrap();
    service
        .schedule(
            "user-2",
            EventDraft::new("Not mine", at(2024, 5, 15, 9, 0), at(2024, 5, 15, 10, 0)),
        )
        .unwrap();

    let may = service
        .events_between("user-1", at(2024, 5, 1, 0, 0), at(2024, 5, 31, 23, 59))
        .unwrap();

    let titles: Vec<&str> = may.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["Early May", "Late May"]);
    assert_eq!(may[0].id, may_early.id);
    assert_eq!(may[1].id, may_late.id);
}

#[test]
fn cancel_removes_the_event() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::new(&conn));

    let event = service
        .schedule(
            "user-1",
            EventDraft::new("One-off", at(2024, 5, 20, 14, 0), at(2024, 5, 20, 15, 0)),
        )
        .unwrap();

    service.cancel(event.id).unwrap();
    assert!(service.get_event(event.id).unwrap().is_none());

    let err = service.cancel(event.id).unwrap_err();
    assert!(matches!(
        err,
        EventServiceError::EventNotFound(id) if id == event.id
    ));
}

#[test]
fn all_day_and_repeat_rules_round_trip_through_storage() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::new(&conn));

    let mut draft = EventDraft::new("Holiday", at(2024, 12, 25, 0, 0), at(2024, 12, 25, 23, 59));
    draft.is_all_day = true;
    draft.repeat = RepeatRule::Yearly;
    let event = service.schedule("user-1", draft).unwrap();

    let loaded = service.get_event(event.id).unwrap().unwrap();
    assert!(loaded.is_all_day);
    assert_eq!(loaded.repeat, RepeatRule::Yearly);
    assert_eq!(loaded.repeat_until, None);
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}
