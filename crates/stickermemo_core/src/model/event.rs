//! Calendar event domain model.
//!
//! # Responsibility
//! - Define the schedule record shown on the calendar tab.
//! - Validate event windows before persistence.
//!
//! # Invariants
//! - `ends_at` is never earlier than `starts_at` for a validated event.
//! - `repeat_until` only constrains repeating events and is never earlier
//!   than `starts_at`.
//!
//! # See also
//! - docs/architecture/data-model.md

use std::error::Error;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a calendar event.
pub type EventId = Uuid;

/// Recurrence pattern of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RepeatRule {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RepeatRule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Parses the storage label; unknown labels become `None`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "yearly" => Self::Yearly,
            _ => Self::None,
        }
    }
}

/// Schedule entry owned by one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    /// Equal to `starts_at` for instantaneous entries.
    pub ends_at: DateTime<Utc>,
    pub is_all_day: bool,
    /// Minutes before `starts_at` to notify, when set.
    pub reminder_minutes: Option<u32>,
    pub repeat: RepeatRule,
    /// Last day the repetition applies. Ignored when `repeat` is `None`.
    pub repeat_until: Option<DateTime<Utc>>,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validation failures for event create/edit input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    EmptyTitle,
    EndsBeforeStart,
    RepeatUntilBeforeStart,
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "event title must not be empty"),
            Self::EndsBeforeStart => write!(f, "event must not end before it starts"),
            Self::RepeatUntilBeforeStart => {
                write!(f, "repeat end must not be earlier than event start")
            }
        }
    }
}

impl Error for EventValidationError {}

impl CalendarEvent {
    /// Creates an event with a generated id and default cosmetics.
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), user_id, title, starts_at, ends_at, created_at)
    }

    /// Creates an event with a caller-provided id, for import paths.
    pub fn with_id(
        id: EventId,
        user_id: impl Into<String>,
        title: impl Into<String>,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id: user_id.into(),
            title: title.into(),
            description: None,
            starts_at,
            ends_at,
            is_all_day: false,
            reminder_minutes: None,
            repeat: RepeatRule::None,
            repeat_until: None,
            color: super::color::default_color().to_owned(),
            created_at,
            updated_at: created_at,
        }
    }

    /// Checks the event window.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.title.trim().is_empty() {
            return Err(EventValidationError::EmptyTitle);
        }
        if self.ends_at < self.starts_at {
            return Err(EventValidationError::EndsBeforeStart);
        }
        if let Some(until) = self.repeat_until {
            if until < self.starts_at {
                return Err(EventValidationError::RepeatUntilBeforeStart);
            }
        }
        Ok(())
    }
}
