//! Memoization for the board display pipeline.
//!
//! # Responsibility
//! - Skip re-ranking when neither the memo snapshot nor the query changed.
//!
//! # Invariants
//! - A cached result is always equal to a fresh [`display_order`] call.
//! - A memo's version is its `(id, recency)` pair: every mutation path in
//!   core and every backend update stamps `updated_at`, so content edits
//!   are always visible in the fingerprint.
//!
//! # See also
//! - docs/architecture/display-pipeline.md

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::model::memo::Memo;
use crate::rank::display_order;

/// Single-slot cache for ranked-and-filtered board snapshots.
///
/// The board recomputes its order on every state change notification;
/// most notifications do not actually change the `(memos, query)` pair,
/// so one remembered result covers the common case.
#[derive(Debug, Default)]
pub struct DisplayCache {
    slot: Option<(u64, Vec<Memo>)>,
}

impl DisplayCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the display order for `(memos, query)`, reusing the cached
    /// result when the fingerprint matches.
    pub fn display_order(&mut self, memos: &[Memo], query: &str) -> Vec<Memo> {
        let key = fingerprint(memos, query);
        if let Some((cached_key, cached)) = &self.slot {
            if *cached_key == key {
                return cached.clone();
            }
        }
        let fresh = display_order(memos, query);
        self.slot = Some((key, fresh.clone()));
        fresh
    }

    /// Drops the remembered result.
    pub fn invalidate(&mut self) {
        self.slot = None;
    }
}

fn fingerprint(memos: &[Memo], query: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    query.trim().to_lowercase().hash(&mut hasher);
    memos.len().hash(&mut hasher);
    for memo in memos {
        memo.id.hash(&mut hasher);
        memo.recency().timestamp_millis().hash(&mut hasher);
        memo.is_pinned.hash(&mut hasher);
        memo.priority.hash(&mut hasher);
    }
    hasher.finish()
}
