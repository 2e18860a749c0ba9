//! Calendar event persistence.
//!
//! # Responsibility
//! - Store schedule entries per account.
//! - Answer date-window listings for the calendar views.
//!
//! # Invariants
//! - Write paths call `CalendarEvent::validate()` before SQL mutations.
//! - Window listing selects by `starts_at`, matching how the calendar
//!   groups entries by their start day.
//!
//! # See also
//! - docs/architecture/storage.md

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{
    bool_to_int, datetime_to_ms, int_to_bool, parse_epoch_ms, RepoError, RepoResult,
};
use crate::model::event::{CalendarEvent, EventId, RepeatRule};

const EVENT_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    description,
    starts_at,
    ends_at,
    is_all_day,
    reminder_minutes,
    repeat,
    repeat_until,
    color,
    created_at,
    updated_at
FROM calendar_events";

/// Repository interface for calendar events.
pub trait EventRepository {
    fn create_event(&self, event: &CalendarEvent) -> RepoResult<EventId>;
    fn update_event(&self, event: &CalendarEvent) -> RepoResult<()>;
    fn get_event(&self, id: EventId) -> RepoResult<Option<CalendarEvent>>;
    /// Events starting within `[from, to]`, ordered by start time.
    fn list_between(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepoResult<Vec<CalendarEvent>>;
    fn delete_event(&self, id: EventId) -> RepoResult<()>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create_event(&self, event: &CalendarEvent) -> RepoResult<EventId> {
        event.validate()?;

        self.conn.execute(
            "INSERT INTO calendar_events (
                id,
                user_id,
                title,
                description,
                starts_at,
                ends_at,
                is_all_day,
                reminder_minutes,
                repeat,
                repeat_until,
                color,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13);",
            params![
                event.id.to_string(),
                event.user_id.as_str(),
                event.title.as_str(),
                event.description.as_deref(),
                datetime_to_ms(event.starts_at),
                datetime_to_ms(event.ends_at),
                bool_to_int(event.is_all_day),
                event.reminder_minutes,
                event.repeat.as_str(),
                event.repeat_until.map(datetime_to_ms),
                event.color.as_str(),
                datetime_to_ms(event.created_at),
                datetime_to_ms(event.updated_at),
            ],
        )?;

        Ok(event.id)
    }

    fn update_event(&self, event: &CalendarEvent) -> RepoResult<()> {
        event.validate()?;

        let changed = self.conn.execute(
            "UPDATE calendar_events
             SET
                title = ?1,
                description = ?2,
                starts_at = ?3,
                ends_at = ?4,
                is_all_day = ?5,
                reminder_minutes = ?6,
                repeat = ?7,
                repeat_until = ?8,
                color = ?9,
                updated_at = ?10
             WHERE id = ?11;",
            params![
                event.title.as_str(),
                event.description.as_deref(),
                datetime_to_ms(event.starts_at),
                datetime_to_ms(event.ends_at),
                bool_to_int(event.is_all_day),
                event.reminder_minutes,
                event.repeat.as_str(),
                event.repeat_until.map(datetime_to_ms),
                event.color.as_str(),
                datetime_to_ms(event.updated_at),
                event.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "calendar event",
                id: event.id.to_string(),
            });
        }

        Ok(())
    }

    fn get_event(&self, id: EventId) -> RepoResult<Option<CalendarEvent>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_event_row(row)?));
        }

        Ok(None)
    }

    fn list_between(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepoResult<Vec<CalendarEvent>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EVENT_SELECT_SQL}
             WHERE user_id = ?1
               AND starts_at >= ?2
               AND starts_at <= ?3
             ORDER BY starts_at ASC, id ASC;"
        ))?;

        let mut rows = stmt.query(params![
            user_id,
            datetime_to_ms(from),
            datetime_to_ms(to)
        ])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }

        Ok(events)
    }

    fn delete_event(&self, id: EventId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM calendar_events WHERE id = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "calendar event",
                id: id.to_string(),
            });
        }

        Ok(())
    }
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<CalendarEvent> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{id_text}` in calendar_events.id"
        ))
    })?;

    let repeat_text: String = row.get("repeat")?;
    let repeat = parse_repeat(&repeat_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid repeat value `{repeat_text}` in calendar_events.repeat"
        ))
    })?;

    let reminder_minutes = match row.get::<_, Option<i64>>("reminder_minutes")? {
        Some(value) => Some(u32::try_from(value).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid reminder value `{value}` in calendar_events.reminder_minutes"
            ))
        })?),
        None => None,
    };

    let repeat_until = match row.get::<_, Option<i64>>("repeat_until")? {
        Some(ms) => Some(parse_epoch_ms(ms, "calendar_events.repeat_until")?),
        None => None,
    };

    let event = CalendarEvent {
        id,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        starts_at: parse_epoch_ms(row.get("starts_at")?, "calendar_events.starts_at")?,
        ends_at: parse_epoch_ms(row.get("ends_at")?, "calendar_events.ends_at")?,
        is_all_day: int_to_bool(row.get("is_all_day")?, "calendar_events.is_all_day")?,
        reminder_minutes,
        repeat,
        repeat_until,
        color: row.get("color")?,
        created_at: parse_epoch_ms(row.get("created_at")?, "calendar_events.created_at")?,
        updated_at: parse_epoch_ms(row.get("updated_at")?, "calendar_events.updated_at")?,
    };
    event.validate()?;
    Ok(event)
}

/// Strict storage-label parse, unlike the tolerant `RepeatRule::from_label`.
fn parse_repeat(value: &str) -> Option<RepeatRule> {
    match value {
        "none" => Some(RepeatRule::None),
        "daily" => Some(RepeatRule::Daily),
        "weekly" => Some(RepeatRule::Weekly),
        "monthly" => Some(RepeatRule::Monthly),
        "yearly" => Some(RepeatRule::Yearly),
        _ => None,
    }
}
