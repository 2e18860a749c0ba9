//! In-memory board snapshot fed by realtime change events.

use crate::model::memo::{Memo, MemoId};
use crate::rank::cache::DisplayCache;

/// One realtime mutation reported by the backend, already decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum MemoChange {
    Created(Memo),
    Updated(Memo),
    Deleted(MemoId),
}

/// Owned memo snapshot plus the memoized display pipeline over it.
///
/// The feed holds whatever the last full fetch returned and keeps it
/// current by applying change events. Reads go through
/// [`MemoFeed::display`], which re-ranks and filters the whole snapshot;
/// nothing here merges partial results.
#[derive(Debug, Default)]
pub struct MemoFeed {
    memos: Vec<Memo>,
    cache: DisplayCache,
}

impl MemoFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a freshly fetched collection.
    pub fn replace_all(&mut self, memos: Vec<Memo>) {
        self.memos = memos;
        self.cache.invalidate();
    }

    /// Applies one change event to the snapshot.
    ///
    /// Creations are prepended, newest first; a re-delivered creation
    /// replaces the stale copy instead of duplicating it. Updates for
    /// unknown ids are dropped, deletions for unknown ids are no-ops.
    pub fn apply(&mut self, change: MemoChange) {
        match change {
            MemoChange::Created(memo) => {
                self.memos.retain(|existing| existing.id != memo.id);
                self.memos.insert(0, memo);
            }
            MemoChange::Updated(memo) => {
                if let Some(slot) = self
                    .memos
                    .iter_mut()
                    .find(|existing| existing.id == memo.id)
                {
                    *slot = memo;
                }
            }
            MemoChange::Deleted(id) => {
                self.memos.retain(|existing| existing.id != id);
            }
        }
    }

    /// Current board order for `query`, via the memoized pipeline.
    pub fn display(&mut self, query: &str) -> Vec<Memo> {
        self.cache.display_order(&self.memos, query)
    }

    /// Raw snapshot in arrival order, newest creation first.
    pub fn memos(&self) -> &[Memo] {
        &self.memos
    }

    pub fn len(&self) -> usize {
        self.memos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memos.is_empty()
    }
}
