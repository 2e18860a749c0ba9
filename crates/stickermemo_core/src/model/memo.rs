//! Memo domain model.
//!
//! # Responsibility
//! - Define the canonical memo record every other layer consumes.
//! - Normalize priority codes/labels into one ordered enum.
//! - Enforce content/tag limits at create and edit boundaries.
//!
//! # Invariants
//! - `id` is opaque: it is never parsed or compared numerically.
//! - `recency()` is total: a memo without `updated_at` falls back to
//!   `created_at`.
//! - Ranking and filtering never validate; `validate()` runs where memos
//!   are created or edited.
//!
//! # See also
//! - docs/architecture/data-model.md

use std::error::Error;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of tags a memo may carry.
pub const MAX_TAGS: usize = 5;
/// Maximum length of a single tag, in characters.
pub const MAX_TAG_CHARS: usize = 20;
/// Maximum memo body length, in characters.
pub const MAX_CONTENT_CHARS: usize = 1000;
/// Derived display titles are cut after this many characters.
pub const TITLE_PREVIEW_CHARS: usize = 30;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Stable identifier for a memo.
///
/// Backends disagree on id shape (string uuid vs integer row id), so the
/// core keeps ids as opaque strings and only ever compares them for
/// equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoId(String);

impl MemoId {
    /// Generates a fresh random id for locally created memos.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MemoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MemoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for MemoId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Memo urgency level.
///
/// Ordering is part of the contract: `Low < Medium < High`, so comparators
/// can rely on `Ord` directly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Maps the numeric wire convention: 0 is low, 1 is medium, 2 is high.
    ///
    /// Anything outside that range normalizes to `Medium` so malformed
    /// records degrade instead of failing.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Low,
            1 => Self::Medium,
            2 => Self::High,
            _ => Self::Medium,
        }
    }

    /// Maps string labels case-insensitively; unknown labels become
    /// `Medium`, mirroring [`Priority::from_code`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Board coordinate of a memo sticker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Canonical memo record.
///
/// Wire records from either backend shape are normalized into this type
/// exactly once (see `sync::record`); ranking, filtering, storage and the
/// FFI surface all consume it as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memo {
    /// Opaque stable id. String form even when the backend used integers.
    pub id: MemoId,
    /// Owning account. Core treats it as an opaque partition key.
    pub user_id: String,
    /// Optional explicit title; display falls back to content.
    pub title: Option<String>,
    /// Memo body. Never empty for a validated memo.
    pub content: String,
    /// Background color as `#rrggbb`. Cosmetic only.
    pub color: String,
    /// Ordered tag list, at most [`MAX_TAGS`] entries.
    pub tags: Vec<String>,
    pub priority: Priority,
    pub is_pinned: bool,
    /// Free placement on the sticker board, when the user moved the memo.
    pub position: Option<Position>,
    pub created_at: DateTime<Utc>,
    /// Absent until the memo is first edited.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Validation failures for memo create/edit input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoValidationError {
    EmptyContent,
    ContentTooLong { chars: usize },
    TooManyTags { count: usize },
    EmptyTag,
    TagTooLong { tag: String },
    DuplicateTag { tag: String },
}

impl Display for MemoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "memo content must not be empty"),
            Self::ContentTooLong { chars } => write!(
                f,
                "memo content has {chars} characters, limit is {MAX_CONTENT_CHARS}"
            ),
            Self::TooManyTags { count } => {
                write!(f, "memo has {count} tags, limit is {MAX_TAGS}")
            }
            Self::EmptyTag => write!(f, "tags must not be empty"),
            Self::TagTooLong { tag } => write!(
                f,
                "tag '{tag}' is longer than {MAX_TAG_CHARS} characters"
            ),
            Self::DuplicateTag { tag } => write!(f, "tag '{tag}' appears more than once"),
        }
    }
}

impl Error for MemoValidationError {}

impl Memo {
    /// Creates a memo with a generated id and default cosmetics.
    ///
    /// # Invariants
    /// - `updated_at` starts as `None`; it is set on first edit.
    /// - `priority` defaults to `Medium`, `is_pinned` to `false`.
    pub fn new(
        user_id: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::with_id(MemoId::generate(), user_id, content, created_at)
    }

    /// Creates a memo with a caller-provided id.
    ///
    /// Used by ingest/sync paths where identity already exists remotely.
    pub fn with_id(
        id: MemoId,
        user_id: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id: user_id.into(),
            title: None,
            content: content.into(),
            color: super::color::default_color().to_owned(),
            tags: Vec::new(),
            priority: Priority::Medium,
            is_pinned: false,
            position: None,
            created_at,
            updated_at: None,
        }
    }

    /// The instant this memo last changed, falling back to creation time
    /// for records that were never edited.
    pub fn recency(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }

    /// Records an edit instant.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    /// The title shown on the board.
    ///
    /// Falls back from the explicit title to a whitespace-collapsed content
    /// preview of at most [`TITLE_PREVIEW_CHARS`] characters, then to
    /// "Untitled" for blank memos.
    pub fn display_title(&self) -> String {
        if let Some(title) = &self.title {
            if !title.trim().is_empty() {
                return title.clone();
            }
        }
        let collapsed = WHITESPACE_RE.replace_all(self.content.trim(), " ");
        if collapsed.is_empty() {
            return "Untitled".to_owned();
        }
        let mut preview: String = collapsed.chars().take(TITLE_PREVIEW_CHARS).collect();
        if collapsed.chars().count() > TITLE_PREVIEW_CHARS {
            preview.push_str("...");
        }
        preview
    }

    /// Checks create/edit limits.
    ///
    /// # Invariants
    /// - Content is non-blank and at most [`MAX_CONTENT_CHARS`] characters.
    /// - At most [`MAX_TAGS`] tags; each tag is non-blank after trimming,
    ///   unique, and at most [`MAX_TAG_CHARS`] characters.
    pub fn validate(&self) -> Result<(), MemoValidationError> {
        if self.content.trim().is_empty() {
            return Err(MemoValidationError::EmptyContent);
        }
        let chars = self.content.chars().count();
        if chars > MAX_CONTENT_CHARS {
            return Err(MemoValidationError::ContentTooLong { chars });
        }
        if self.tags.len() > MAX_TAGS {
            return Err(MemoValidationError::TooManyTags {
                count: self.tags.len(),
            });
        }
        let mut seen: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in &self.tags {
            let trimmed = tag.trim();
            if trimmed.is_empty() {
                return Err(MemoValidationError::EmptyTag);
            }
            if trimmed.chars().count() > MAX_TAG_CHARS {
                return Err(MemoValidationError::TagTooLong { tag: tag.clone() });
            }
            let folded = trimmed.to_lowercase();
            if seen.contains(&folded) {
                return Err(MemoValidationError::DuplicateTag { tag: tag.clone() });
            }
            seen.push(folded);
        }
        Ok(())
    }
}
