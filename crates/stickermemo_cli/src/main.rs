//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `stickermemo_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use stickermemo_core::service::lottery_service::generate_numbers;
use stickermemo_core::{display_order, Memo, MemoId, Priority};

fn main() {
    // Why: keep a tiny CLI probe to validate core crate wiring independently
    // from Flutter/FFI runtime setup.
    println!("stickermemo_core ping={}", stickermemo_core::ping());
    println!(
        "stickermemo_core version={}",
        stickermemo_core::core_version()
    );

    let board = sample_board();
    for memo in display_order(&board, "") {
        println!(
            "board id={} pinned={} priority={} title={}",
            memo.id,
            memo.is_pinned,
            memo.priority.as_str(),
            memo.display_title()
        );
    }
    println!(
        "board query=milk matches={}",
        display_order(&board, "milk").len()
    );

    // Why: fixed seed so repeated runs print the same draw.
    let mut rng = StdRng::seed_from_u64(42);
    let numbers: Vec<String> = generate_numbers(&mut rng)
        .iter()
        .map(u8::to_string)
        .collect();
    println!("lucky numbers={}", numbers.join(","));
}

/// Fixed ids and relative timestamps keep the printed order stable.
fn sample_board() -> Vec<Memo> {
    let now = Utc::now();

    let mut groceries = Memo::with_id(
        MemoId::from("groceries"),
        "smoke",
        "Buy milk and eggs",
        now - Duration::days(2),
    );
    groceries.priority = Priority::High;

    let mut passport = Memo::with_id(
        MemoId::from("passport"),
        "smoke",
        "Renew passport",
        now - Duration::days(30),
    );
    passport.priority = Priority::Low;
    passport.is_pinned = true;

    let mut standup = Memo::with_id(
        MemoId::from("standup"),
        "smoke",
        "Prepare standup notes",
        now - Duration::days(1),
    );
    standup.priority = Priority::High;

    vec![groceries, passport, standup]
}
