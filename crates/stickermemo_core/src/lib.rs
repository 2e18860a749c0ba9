//! Core domain logic for Sticker Memo.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod rank;
pub mod repo;
pub mod service;
pub mod sync;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::memo::{Memo, MemoId, MemoValidationError, Position, Priority};
pub use rank::cache::DisplayCache;
pub use rank::{display_order, filter_memos, rank_memos};
pub use repo::memo_repo::{MemoListQuery, MemoRepository, SqliteMemoRepository};
pub use repo::{RepoError, RepoResult};
pub use service::memo_service::{MemoDraft, MemoService};
pub use sync::feed::{MemoChange, MemoFeed};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
