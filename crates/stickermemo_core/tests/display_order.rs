use chrono::{TimeZone, Utc};
use stickermemo_core::{
    display_order, filter_memos, rank_memos, DisplayCache, Memo, MemoId, Priority,
};

#[test]
fn pinned_memo_outranks_higher_priority_unpinned_memos() {
    let memo_a = memo_updated_on("a", "alpha", Priority::High, false, 3);
    let memo_b = memo_updated_on("b", "bravo", Priority::Low, true, 1);
    let memo_c = memo_updated_on("c", "charlie", Priority::High, false, 5);

    let ranked = rank_memos(&[memo_a, memo_b, memo_c]);

    let ids: Vec<&str> = ranked.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["b", "c", "a"]);
}

#[test]
fn priority_beats_recency_within_a_pin_group() {
    let fresh_low = memo_updated_on("fresh-low", "new but low", Priority::Low, false, 20);
    let stale_high = memo_updated_on("stale-high", "old but high", Priority::High, false, 2);

    let ranked = rank_memos(&[fresh_low.clone(), stale_high.clone()]);

    assert_eq!(ranked[0].id, stale_high.id);
    assert_eq!(ranked[1].id, fresh_low.id);
}

#[test]
fn recency_orders_newest_first_and_falls_back_to_created_at() {
    let created = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
    let never_edited = Memo::with_id(MemoId::from("never"), "user-1", "untouched", created);

    let mut edited_earlier = Memo::with_id(
        MemoId::from("edited"),
        "user-1",
        "touched",
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
    );
    edited_earlier.touch(Utc.with_ymd_and_hms(2024, 1, 12, 8, 0, 0).unwrap());

    let ranked = rank_memos(&[never_edited, edited_earlier]);

    // The later edit wins even though the memo was created first.
    assert_eq!(ranked[0].id.as_str(), "edited");
    assert_eq!(ranked[1].id.as_str(), "never");
}

#[test]
fn ranking_is_stable_for_fully_tied_memos() {
    let first = memo_updated_on("first", "same keys", Priority::Medium, false, 4);
    let second = memo_updated_on("second", "same keys", Priority::Medium, false, 4);
    let third = memo_updated_on("third", "same keys", Priority::Medium, false, 4);

    let ranked = rank_memos(&[first, second, third]);

    let ids: Vec<&str> = ranked.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["first", "second", "third"]);
}

#[test]
fn ranking_is_idempotent_and_leaves_input_untouched() {
    let memos = vec![
        memo_updated_on("a", "alpha", Priority::High, false, 3),
        memo_updated_on("b", "bravo", Priority::Low, true, 1),
        memo_updated_on("c", "charlie", Priority::High, false, 5),
    ];
    let snapshot = memos.clone();

    let ranked_once = rank_memos(&memos);
    let ranked_twice = rank_memos(&ranked_once);

    assert_eq!(ranked_once, ranked_twice);
    assert_eq!(memos, snapshot);
}

#[test]
fn ranking_empty_input_yields_empty_output() {
    assert!(rank_memos(&[]).is_empty());
    assert!(filter_memos(&[], "anything").is_empty());
    assert!(display_order(&[], "").is_empty());
}

#[test]
fn filter_matches_title_content_and_tags() {
    let mut memo = memo_updated_on("milk", "Buy milk", Priority::Medium, false, 1);
    memo.tags = vec!["shopping".to_string()];
    let memos = vec![memo];

    assert_eq!(filter_memos(&memos, "milk").len(), 1);
    assert_eq!(filter_memos(&memos, "shop").len(), 1);
    assert_eq!(filter_memos(&memos, "xyz").len(), 0);
}

#[test]
fn filter_is_case_insensitive_on_both_sides() {
    let mut memo = memo_updated_on("m", "Buy Milk", Priority::Medium, false, 1);
    memo.title = Some("Groceries".to_string());
    let memos = vec![memo];

    assert_eq!(filter_memos(&memos, "MILK").len(), 1);
    assert_eq!(filter_memos(&memos, "groceries").len(), 1);
    assert_eq!(filter_memos(&memos, "gRoCeR").len(), 1);
}

#[test]
fn filter_matches_the_derived_display_title() {
    // No explicit title: the preview derived from content is searchable,
    // including its "..." truncation marker.
    let long_body = format!("{} tail that is cut off", "x".repeat(40));
    let memo = memo_updated_on("long", &long_body, Priority::Medium, false, 1);
    let memos = vec![memo];

    assert_eq!(filter_memos(&memos, "...").len(), 1);
}

#[test]
fn filter_does_not_fold_diacritics() {
    let memo = memo_updated_on("cafe", "café notes", Priority::Medium, false, 1);
    let memos = vec![memo];

    assert_eq!(filter_memos(&memos, "café").len(), 1);
    assert_eq!(filter_memos(&memos, "cafe").len(), 0);
}

#[test]
fn blank_query_returns_input_order_unchanged() {
    let memos = vec![
        memo_updated_on("z", "zulu", Priority::Low, false, 9),
        memo_updated_on("a", "alpha", Priority::High, true, 1),
    ];

    assert_eq!(filter_memos(&memos, ""), memos);
    assert_eq!(filter_memos(&memos, "   "), memos);
}

#[test]
fn filter_keeps_relative_order_of_survivors() {
    let memos = vec![
        memo_updated_on("1", "team meeting notes", Priority::High, false, 5),
        memo_updated_on("2", "grocery run", Priority::Medium, false, 4),
        memo_updated_on("3", "meeting follow-up", Priority::Low, false, 3),
        memo_updated_on("4", "random thought", Priority::Low, false, 2),
        memo_updated_on("5", "one more meeting", Priority::Low, false, 1),
    ];

    let filtered = filter_memos(&memos, "meeting");

    let ids: Vec<&str> = filtered.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["1", "3", "5"]);
}

#[test]
fn display_order_ranks_before_filtering() {
    let mut pinned_low = memo_updated_on("pinned", "meeting agenda", Priority::Low, true, 1);
    pinned_low.tags = vec!["work".to_string()];
    let fresh_high = memo_updated_on("fresh", "meeting minutes", Priority::High, false, 9);
    let unrelated = memo_updated_on("other", "shopping list", Priority::High, false, 9);

    let memos = vec![fresh_high, unrelated, pinned_low];
    let displayed = display_order(&memos, "meeting");

    let ids: Vec<&str> = displayed.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["pinned", "fresh"]);
    assert_eq!(displayed, filter_memos(&rank_memos(&memos), "meeting"));
}

#[test]
fn display_cache_agrees_with_fresh_computation() {
    let memos = vec![
        memo_updated_on("a", "alpha meeting", Priority::High, false, 3),
        memo_updated_on("b", "bravo", Priority::Low, true, 1),
    ];
    let mut cache = DisplayCache::new();

    let first = cache.display_order(&memos, "meeting");
    let second = cache.display_order(&memos, "meeting");
    assert_eq!(first, display_order(&memos, "meeting"));
    assert_eq!(first, second);

    // A state change must produce a fresh answer, not a stale hit.
    let mut changed = memos.clone();
    changed[0].is_pinned = true;
    changed[0].touch(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
    let after_change = cache.display_order(&changed, "meeting");
    assert_eq!(after_change, display_order(&changed, "meeting"));
}

fn memo_updated_on(id: &str, content: &str, priority: Priority, pinned: bool, day: u32) -> Memo {
    let created = Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap();
    let mut memo = Memo::with_id(MemoId::from(id), "user-1", content, created);
    memo.priority = priority;
    memo.is_pinned = pinned;
    memo.touch(Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap());
    memo
}
