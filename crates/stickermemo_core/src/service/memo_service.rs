//! Memo use-case service.
//!
//! # Responsibility
//! - Provide create/update/pin/move/delete/list APIs over memo storage.
//! - Assemble the board view: stored memos through the display pipeline.
//!
//! # Invariants
//! - `update_memo` uses full replacement semantics for editable fields;
//!   identity, ownership, position and `created_at` survive the edit.
//! - Every mutation stamps `updated_at`, so `(id, recency)` always
//!   reflects the latest state.
//! - Listing returns storage order; only `memos_for_display` applies the
//!   board ordering.
//!
//! # See also
//! - docs/architecture/display-pipeline.md

use std::error::Error;
use std::fmt::{Display, Formatter};

use chrono::Utc;

use crate::model::memo::{Memo, MemoId, Position, Priority};
use crate::rank::display_order;
use crate::repo::memo_repo::{MemoListQuery, MemoRepository};
use crate::repo::{RepoError, RepoResult};

/// Service error for memo use-cases.
#[derive(Debug)]
pub enum MemoServiceError {
    /// Target memo does not exist.
    MemoNotFound(MemoId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for MemoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemoNotFound(id) => write!(f, "memo not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent memo state: {details}"),
        }
    }
}

impl Error for MemoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for MemoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity: "memo", id } => Self::MemoNotFound(MemoId::from(id)),
            other => Self::Repo(other),
        }
    }
}

/// Editable memo fields, used for both creation and full-replacement
/// updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoDraft {
    pub title: Option<String>,
    pub content: String,
    /// `None` keeps the default (create) or current (update) color.
    pub color: Option<String>,
    pub tags: Vec<String>,
    pub priority: Priority,
    pub is_pinned: bool,
}

impl MemoDraft {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            title: None,
            content: content.into(),
            color: None,
            tags: Vec::new(),
            priority: Priority::Medium,
            is_pinned: false,
        }
    }
}

/// Memo service facade over repository implementations.
pub struct MemoService<R: MemoRepository> {
    repo: R,
}

impl<R: MemoRepository> MemoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one memo for `user_id` from draft input.
    pub fn create_memo(
        &self,
        user_id: &str,
        draft: MemoDraft,
    ) -> Result<Memo, MemoServiceError> {
        let mut memo = Memo::new(user_id, draft.content, Utc::now());
        apply_draft_cosmetics(&mut memo, draft.title, draft.color);
        memo.tags = draft.tags;
        memo.priority = draft.priority;
        memo.is_pinned = draft.is_pinned;

        let id = self.repo.create_memo(&memo)?;
        self.repo
            .get_memo(&id)?
            .ok_or(MemoServiceError::InconsistentState(
                "created memo not found in read-back",
            ))
    }

    /// Replaces the editable fields of one memo.
    pub fn update_memo(
        &self,
        id: &MemoId,
        draft: MemoDraft,
    ) -> Result<Memo, MemoServiceError> {
        let mut memo = self.require_memo(id)?;
        memo.content = draft.content;
        apply_draft_cosmetics(&mut memo, draft.title, draft.color);
        memo.tags = draft.tags;
        memo.priority = draft.priority;
        memo.is_pinned = draft.is_pinned;
        memo.touch(Utc::now());

        self.repo.update_memo(&memo)?;
        self.read_back(id, "updated memo not found in read-back")
    }

    /// Pins or unpins one memo.
    pub fn toggle_pin(&self, id: &MemoId, is_pinned: bool) -> Result<Memo, MemoServiceError> {
        let mut memo = self.require_memo(id)?;
        memo.is_pinned = is_pinned;
        memo.touch(Utc::now());

        self.repo.update_memo(&memo)?;
        self.read_back(id, "pinned memo not found in read-back")
    }

    /// Moves one memo sticker on the board.
    pub fn move_memo(&self, id: &MemoId, x: f64, y: f64) -> Result<Memo, MemoServiceError> {
        let mut memo = self.require_memo(id)?;
        memo.position = Some(Position { x, y });
        memo.touch(Utc::now());

        self.repo.update_memo(&memo)?;
        self.read_back(id, "moved memo not found in read-back")
    }

    /// Deletes one memo permanently.
    pub fn delete_memo(&self, id: &MemoId) -> Result<(), MemoServiceError> {
        self.repo.delete_memo(id)?;
        Ok(())
    }

    /// Gets one memo by stable ID.
    pub fn get_memo(&self, id: &MemoId) -> RepoResult<Option<Memo>> {
        self.repo.get_memo(id)
    }

    /// Lists all memos of one account in storage order.
    pub fn list_memos(&self, user_id: &str) -> RepoResult<Vec<Memo>> {
        self.repo.list_memos(user_id, &MemoListQuery::default())
    }

    /// Lists memos carrying an exact tag.
    pub fn memos_by_tag(&self, user_id: &str, tag: &str) -> RepoResult<Vec<Memo>> {
        let query = MemoListQuery {
            tag: Some(tag.to_owned()),
            ..MemoListQuery::default()
        };
        self.repo.list_memos(user_id, &query)
    }

    /// Lists memos of one priority level.
    pub fn memos_by_priority(&self, user_id: &str, priority: Priority) -> RepoResult<Vec<Memo>> {
        let query = MemoListQuery {
            priority: Some(priority),
            ..MemoListQuery::default()
        };
        self.repo.list_memos(user_id, &query)
    }

    /// Lists currently pinned memos.
    pub fn pinned_memos(&self, user_id: &str) -> RepoResult<Vec<Memo>> {
        let query = MemoListQuery {
            pinned_only: true,
            ..MemoListQuery::default()
        };
        self.repo.list_memos(user_id, &query)
    }

    /// Storage-side title/content search, results in storage order.
    pub fn search_memos(&self, user_id: &str, text: &str) -> RepoResult<Vec<Memo>> {
        let query = MemoListQuery {
            text: Some(text.to_owned()),
            ..MemoListQuery::default()
        };
        self.repo.list_memos(user_id, &query)
    }

    /// The board view: every memo of the account, ranked, then narrowed
    /// by `query`.
    pub fn memos_for_display(
        &self,
        user_id: &str,
        query: &str,
    ) -> Result<Vec<Memo>, MemoServiceError> {
        let memos = self.list_memos(user_id)?;
        Ok(display_order(&memos, query))
    }

    fn require_memo(&self, id: &MemoId) -> Result<Memo, MemoServiceError> {
        self.repo
            .get_memo(id)?
            .ok_or_else(|| MemoServiceError::MemoNotFound(id.clone()))
    }

    fn read_back(&self, id: &MemoId, details: &'static str) -> Result<Memo, MemoServiceError> {
        self.repo
            .get_memo(id)?
            .ok_or(MemoServiceError::InconsistentState(details))
    }
}

fn apply_draft_cosmetics(memo: &mut Memo, title: Option<String>, color: Option<String>) {
    memo.title = title.filter(|t| !t.trim().is_empty());
    if let Some(color) = color.filter(|c| !c.trim().is_empty()) {
        memo.color = color;
    }
}
