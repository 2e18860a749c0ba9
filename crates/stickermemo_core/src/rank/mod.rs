//! Board display ordering and query filtering.
//!
//! # Responsibility
//! - Produce the presentation order: pinned memos first, then priority,
//!   then most recently touched.
//! - Narrow a memo list to entries matching a search query.
//!
//! # Invariants
//! - Both operations are pure: inputs are never mutated, output order is
//!   deterministic, and ties keep input order (stable sort).
//! - Ranking runs before filtering, so a filtered board is always a
//!   subsequence of the fully ranked board.
//! - Matching folds ASCII/Unicode case but performs no diacritic folding.
//!
//! # See also
//! - docs/architecture/display-pipeline.md

use std::cmp::Ordering;

use crate::model::memo::Memo;

pub mod cache;

/// Comparator behind [`rank_memos`].
///
/// Pin state dominates, then [`Priority`](crate::model::memo::Priority)
/// descending, then [`Memo::recency`] descending. Equal keys compare
/// `Equal` so a stable sort preserves input order.
pub fn compare_for_display(a: &Memo, b: &Memo) -> Ordering {
    b.is_pinned
        .cmp(&a.is_pinned)
        .then_with(|| b.priority.cmp(&a.priority))
        .then_with(|| b.recency().cmp(&a.recency()))
}

/// Returns the memos in board display order.
///
/// The input is left untouched; an empty slice yields an empty vec.
pub fn rank_memos(memos: &[Memo]) -> Vec<Memo> {
    let mut ranked = memos.to_vec();
    ranked.sort_by(compare_for_display);
    ranked
}

/// Whether a memo matches a search query.
///
/// A blank query matches everything. Otherwise the query must appear,
/// case-insensitively, in the display title, the content, or one of the
/// tags.
pub fn memo_matches_query(memo: &Memo, query: &str) -> bool {
    let needle = fold_query(query);
    needle.is_empty() || matches_folded(memo, &needle)
}

/// Keeps the memos matching `query`, preserving their relative order.
///
/// A blank or whitespace-only query returns the input unchanged.
pub fn filter_memos(memos: &[Memo], query: &str) -> Vec<Memo> {
    let needle = fold_query(query);
    if needle.is_empty() {
        return memos.to_vec();
    }
    memos
        .iter()
        .filter(|memo| matches_folded(memo, &needle))
        .cloned()
        .collect()
}

/// Ranks, then filters: the full board pipeline.
pub fn display_order(memos: &[Memo], query: &str) -> Vec<Memo> {
    filter_memos(&rank_memos(memos), query)
}

fn fold_query(query: &str) -> String {
    query.trim().to_lowercase()
}

fn matches_folded(memo: &Memo, needle: &str) -> bool {
    memo.display_title().to_lowercase().contains(needle)
        || memo.content.to_lowercase().contains(needle)
        || memo.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}
