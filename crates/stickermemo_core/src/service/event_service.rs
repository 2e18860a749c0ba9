//! Calendar use-case service.
//!
//! # Responsibility
//! - Provide schedule/update/cancel/list APIs over event storage.
//!
//! # Invariants
//! - Service APIs never bypass repository validation contracts.
//! - `update_event` uses full replacement semantics for editable fields.

use std::error::Error;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};

use crate::model::event::{CalendarEvent, EventId, RepeatRule};
use crate::repo::event_repo::EventRepository;
use crate::repo::{RepoError, RepoResult};

/// Service error for calendar use-cases.
#[derive(Debug)]
pub enum EventServiceError {
    /// Target event does not exist.
    EventNotFound(EventId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for EventServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventNotFound(id) => write!(f, "calendar event not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent event state: {details}")
            }
        }
    }
}

impl Error for EventServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EventServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: "calendar event",
                id,
            } => match uuid::Uuid::parse_str(&id) {
                Ok(event_id) => Self::EventNotFound(event_id),
                Err(_) => Self::Repo(RepoError::InvalidData(format!(
                    "unparseable event id `{id}` in not-found error"
                ))),
            },
            other => Self::Repo(other),
        }
    }
}

/// Editable event fields for scheduling and full-replacement updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_all_day: bool,
    pub reminder_minutes: Option<u32>,
    pub repeat: RepeatRule,
    pub repeat_until: Option<DateTime<Utc>>,
    /// `None` keeps the default (schedule) or current (update) color.
    pub color: Option<String>,
}

impl EventDraft {
    pub fn new(
        title: impl Into<String>,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            starts_at,
            ends_at,
            is_all_day: false,
            reminder_minutes: None,
            repeat: RepeatRule::None,
            repeat_until: None,
            color: None,
        }
    }
}

/// Calendar service facade over repository implementations.
pub struct EventService<R: EventRepository> {
    repo: R,
}

impl<R: EventRepository> EventService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Schedules one event for `user_id`.
    pub fn schedule(
        &self,
        user_id: &str,
        draft: EventDraft,
    ) -> Result<CalendarEvent, EventServiceError> {
        let now = Utc::now();
        let mut event =
            CalendarEvent::new(user_id, draft.title.clone(), draft.starts_at, draft.ends_at, now);
        apply_draft_fields(&mut event, draft);

        let id = self.repo.create_event(&event)?;
        self.read_back(id, "scheduled event not found in read-back")
    }

    /// Replaces the editable fields of one event.
    pub fn update_event(
        &self,
        id: EventId,
        draft: EventDraft,
    ) -> Result<CalendarEvent, EventServiceError> {
        let mut event = self
            .repo
            .get_event(id)?
            .ok_or(EventServiceError::EventNotFound(id))?;

        event.title = draft.title.clone();
        event.starts_at = draft.starts_at;
        event.ends_at = draft.ends_at;
        apply_draft_fields(&mut event, draft);
        event.updated_at = Utc::now();

        self.repo.update_event(&event)?;
        self.read_back(id, "updated event not found in read-back")
    }

    /// Removes one event from the calendar.
    pub fn cancel(&self, id: EventId) -> Result<(), EventServiceError> {
        self.repo.delete_event(id)?;
        Ok(())
    }

    /// Gets one event by stable ID.
    pub fn get_event(&self, id: EventId) -> RepoResult<Option<CalendarEvent>> {
        self.repo.get_event(id)
    }

    /// Events starting within `[from, to]`, ordered by start time.
    pub fn events_between(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepoResult<Vec<CalendarEvent>> {
        self.repo.list_between(user_id, from, to)
    }

    fn read_back(
        &self,
        id: EventId,
        details: &'static str,
    ) -> Result<CalendarEvent, EventServiceError> {
        self.repo
            .get_event(id)?
            .ok_or(EventServiceError::InconsistentState(details))
    }
}

fn apply_draft_fields(event: &mut CalendarEvent, draft: EventDraft) {
    event.description = draft.description.filter(|d| !d.trim().is_empty());
    event.is_all_day = draft.is_all_day;
    event.reminder_minutes = draft.reminder_minutes;
    event.repeat = draft.repeat;
    event.repeat_until = draft.repeat_until;
    if let Some(color) = draft.color.filter(|c| !c.trim().is_empty()) {
        event.color = color;
    }
}
