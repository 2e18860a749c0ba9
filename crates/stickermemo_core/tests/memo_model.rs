use chrono::{TimeZone, Utc};
use stickermemo_core::model::color::{default_color, text_color_for_background, MEMO_COLORS};
use stickermemo_core::{Memo, MemoId, MemoValidationError, Priority};

#[test]
fn memo_new_sets_defaults() {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let memo = Memo::new("user-1", "hello", created);

    assert!(!memo.id.as_str().is_empty());
    assert_eq!(memo.user_id, "user-1");
    assert_eq!(memo.title, None);
    assert_eq!(memo.content, "hello");
    assert_eq!(memo.color, default_color());
    assert!(memo.tags.is_empty());
    assert_eq!(memo.priority, Priority::Medium);
    assert!(!memo.is_pinned);
    assert_eq!(memo.position, None);
    assert_eq!(memo.created_at, created);
    assert_eq!(memo.updated_at, None);
}

#[test]
fn recency_falls_back_to_created_until_first_touch() {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let edited = Utc.with_ymd_and_hms(2024, 1, 2, 18, 30, 0).unwrap();
    let mut memo = Memo::new("user-1", "draft", created);

    assert_eq!(memo.recency(), created);

    memo.touch(edited);
    assert_eq!(memo.updated_at, Some(edited));
    assert_eq!(memo.recency(), edited);
}

#[test]
fn display_title_prefers_explicit_title() {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let mut memo = Memo::new("user-1", "body text", created);
    memo.title = Some("Groceries".to_string());

    assert_eq!(memo.display_title(), "Groceries");
}

#[test]
fn display_title_derives_preview_from_content() {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();

    let short = Memo::new("user-1", "short body", created);
    assert_eq!(short.display_title(), "short body");

    let mut blank_title = Memo::new("user-1", "line one\n  line two", created);
    blank_title.title = Some("   ".to_string());
    assert_eq!(blank_title.display_title(), "line one line two");

    let long = Memo::new("user-1", "a".repeat(40), created);
    let preview = long.display_title();
    assert_eq!(preview.chars().count(), 33);
    assert!(preview.ends_with("..."));
}

#[test]
fn display_title_of_blank_memo_is_untitled() {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let memo = Memo::new("user-1", "   \n  ", created);

    assert_eq!(memo.display_title(), "Untitled");
}

#[test]
fn priority_code_and_label_mappings_are_canonical() {
    assert_eq!(Priority::from_code(0), Priority::Low);
    assert_eq!(Priority::from_code(1), Priority::Medium);
    assert_eq!(Priority::from_code(2), Priority::High);
    assert_eq!(Priority::from_code(7), Priority::Medium);
    assert_eq!(Priority::from_code(-1), Priority::Medium);

    assert_eq!(Priority::from_label("HIGH"), Priority::High);
    assert_eq!(Priority::from_label("  low "), Priority::Low);
    assert_eq!(Priority::from_label("urgent"), Priority::Medium);

    assert_eq!(Priority::Low.code(), 0);
    assert_eq!(Priority::High.as_str(), "high");
    assert!(Priority::Low < Priority::Medium);
    assert!(Priority::Medium < Priority::High);
}

#[test]
fn memo_serialization_uses_expected_wire_fields() {
    let created = Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap();
    let mut memo = Memo::with_id(MemoId::from("memo-1"), "user-1", "ship it", created);
    memo.title = Some("Release".to_string());
    memo.tags = vec!["work".to_string()];
    memo.priority = Priority::High;
    memo.is_pinned = true;

    let json = serde_json::to_value(&memo).unwrap();
    assert_eq!(json["id"], "memo-1");
    assert_eq!(json["user_id"], "user-1");
    assert_eq!(json["title"], "Release");
    assert_eq!(json["content"], "ship it");
    assert_eq!(json["tags"], serde_json::json!(["work"]));
    assert_eq!(json["priority"], "high");
    assert_eq!(json["is_pinned"], true);
    assert_eq!(json["position"], serde_json::Value::Null);
    assert_eq!(json["updated_at"], serde_json::Value::Null);

    let decoded: Memo = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, memo);
}

#[test]
fn validate_rejects_blank_and_oversized_content() {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();

    let blank = Memo::new("user-1", "   ", created);
    assert_eq!(blank.validate().unwrap_err(), MemoValidationError::EmptyContent);

    let oversized = Memo::new("user-1", "x".repeat(1001), created);
    assert_eq!(
        oversized.validate().unwrap_err(),
        MemoValidationError::ContentTooLong { chars: 1001 }
    );

    let at_limit = Memo::new("user-1", "y".repeat(1000), created);
    assert!(at_limit.validate().is_ok());
}

#[test]
fn validate_enforces_tag_rules() {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let mut memo = Memo::new("user-1", "tagged", created);

    memo.tags = (0..6).map(|n| format!("tag-{n}")).collect();
    assert_eq!(
        memo.validate().unwrap_err(),
        MemoValidationError::TooManyTags { count: 6 }
    );

    memo.tags = vec!["ok".to_string(), "  ".to_string()];
    assert_eq!(memo.validate().unwrap_err(), MemoValidationError::EmptyTag);

    memo.tags = vec!["z".repeat(21)];
    assert!(matches!(
        memo.validate().unwrap_err(),
        MemoValidationError::TagTooLong { .. }
    ));

    memo.tags = vec!["Work".to_string(), "work".to_string()];
    assert!(matches!(
        memo.validate().unwrap_err(),
        MemoValidationError::DuplicateTag { .. }
    ));

    memo.tags = vec!["work".to_string(), "home".to_string()];
    assert!(memo.validate().is_ok());
}

#[test]
fn palette_colors_resolve_readable_text_colors() {
    assert_eq!(MEMO_COLORS.len(), 9);
    assert_eq!(default_color(), "#FFE082");

    // Light pastel backgrounds take dark text.
    assert_eq!(text_color_for_background("#FFE082"), "#000000");
    assert_eq!(text_color_for_background("#F5F5F5"), "#000000");
    // Dark backgrounds take light text.
    assert_eq!(text_color_for_background("#222222"), "#FFFFFF");
    // Malformed input falls back to dark text.
    assert_eq!(text_color_for_background("not-a-color"), "#000000");
}
