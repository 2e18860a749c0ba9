//! Lottery ticket persistence.
//!
//! # Responsibility
//! - Store generated and hand-picked number sets per account.
//! - Answer favorite/purchase bookkeeping and aggregate statistics.
//!
//! # Invariants
//! - A stored ticket always holds exactly six ascending numbers in
//!   `1..=45`; read paths reject anything else.
//! - `is_purchased` mirrors `purchased_at IS NOT NULL`.
//!
//! # See also
//! - docs/architecture/storage.md

use std::error::Error;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{
    bool_to_int, datetime_to_ms, int_to_bool, parse_epoch_ms, RepoError, RepoResult,
};

/// Numbers drawn per ticket.
pub const TICKET_NUMBERS: usize = 6;
/// Smallest drawable number.
pub const NUMBER_MIN: u8 = 1;
/// Largest drawable number.
pub const NUMBER_MAX: u8 = 45;

const DEFAULT_LIST_LIMIT: u32 = 20;
const MAX_LIST_LIMIT: u32 = 50;

const TICKET_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    numbers,
    bonus_number,
    method,
    is_favorite,
    is_purchased,
    purchased_at,
    notes,
    created_at
FROM lottery_tickets";

/// Stable identifier for a saved ticket.
pub type TicketId = Uuid;

/// How a ticket's numbers came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMethod {
    /// Produced by the weighted generator.
    Ai,
    /// Entered by hand.
    Manual,
}

impl GenerationMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Manual => "manual",
        }
    }
}

fn parse_method(value: &str) -> Option<GenerationMethod> {
    match value {
        "ai" => Some(GenerationMethod::Ai),
        "manual" => Some(GenerationMethod::Manual),
        _ => None,
    }
}

/// One saved set of lottery numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotteryTicket {
    pub id: TicketId,
    pub user_id: String,
    /// Exactly [`TICKET_NUMBERS`] values, ascending.
    pub numbers: Vec<u8>,
    pub bonus_number: Option<u8>,
    pub method: GenerationMethod,
    pub is_favorite: bool,
    /// Set when the ticket was actually bought.
    pub purchased_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LotteryTicket {
    pub fn is_purchased(&self) -> bool {
        self.purchased_at.is_some()
    }

    /// Checks the number-set shape.
    pub fn validate(&self) -> Result<(), TicketValidationError> {
        validate_numbers(&self.numbers)?;
        if let Some(bonus) = self.bonus_number {
            if !(NUMBER_MIN..=NUMBER_MAX).contains(&bonus) {
                return Err(TicketValidationError::BonusOutOfRange(bonus));
            }
            if self.numbers.contains(&bonus) {
                return Err(TicketValidationError::BonusAlreadyDrawn(bonus));
            }
        }
        Ok(())
    }
}

/// Validation failures for a ticket's number set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketValidationError {
    WrongCount(usize),
    OutOfRange(u8),
    NotAscending,
    Duplicate(u8),
    BonusOutOfRange(u8),
    BonusAlreadyDrawn(u8),
}

impl Display for TicketValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongCount(count) => {
                write!(f, "ticket must hold {TICKET_NUMBERS} numbers, got {count}")
            }
            Self::OutOfRange(value) => write!(
                f,
                "number {value} is outside {NUMBER_MIN}..={NUMBER_MAX}"
            ),
            Self::NotAscending => write!(f, "ticket numbers must be sorted ascending"),
            Self::Duplicate(value) => write!(f, "number {value} appears more than once"),
            Self::BonusOutOfRange(value) => write!(
                f,
                "bonus number {value} is outside {NUMBER_MIN}..={NUMBER_MAX}"
            ),
            Self::BonusAlreadyDrawn(value) => {
                write!(f, "bonus number {value} is already among the drawn numbers")
            }
        }
    }
}

impl Error for TicketValidationError {}

/// Checks that `numbers` is a well-formed draw: six values, in range,
/// strictly ascending (which also rules out duplicates).
pub fn validate_numbers(numbers: &[u8]) -> Result<(), TicketValidationError> {
    if numbers.len() != TICKET_NUMBERS {
        return Err(TicketValidationError::WrongCount(numbers.len()));
    }
    for &value in numbers {
        if !(NUMBER_MIN..=NUMBER_MAX).contains(&value) {
            return Err(TicketValidationError::OutOfRange(value));
        }
    }
    for pair in numbers.windows(2) {
        if pair[0] == pair[1] {
            return Err(TicketValidationError::Duplicate(pair[0]));
        }
        if pair[0] > pair[1] {
            return Err(TicketValidationError::NotAscending);
        }
    }
    Ok(())
}

/// Per-account ticket counters, aggregated in SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LotteryStatistics {
    pub total: i64,
    pub ai_generated: i64,
    pub manual_generated: i64,
    pub purchased: i64,
    pub favorites: i64,
}

/// Repository interface for ticket bookkeeping.
pub trait LotteryRepository {
    fn create_ticket(&self, ticket: &LotteryTicket) -> RepoResult<TicketId>;
    fn get_ticket(&self, id: TicketId) -> RepoResult<Option<LotteryTicket>>;
    /// Newest first. `limit` defaults to 20 and is capped at 50.
    fn list_tickets(
        &self,
        user_id: &str,
        limit: Option<u32>,
        offset: u32,
    ) -> RepoResult<Vec<LotteryTicket>>;
    fn list_favorites(&self, user_id: &str) -> RepoResult<Vec<LotteryTicket>>;
    fn set_favorite(&self, id: TicketId, is_favorite: bool) -> RepoResult<()>;
    /// `Some` marks the ticket purchased at that instant, `None` clears it.
    fn set_purchased(&self, id: TicketId, purchased_at: Option<DateTime<Utc>>) -> RepoResult<()>;
    fn update_notes(&self, id: TicketId, notes: &str) -> RepoResult<()>;
    fn delete_ticket(&self, id: TicketId) -> RepoResult<()>;
    fn statistics(&self, user_id: &str) -> RepoResult<LotteryStatistics>;
}

/// SQLite-backed ticket repository.
pub struct SqliteLotteryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLotteryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn require_changed(&self, changed: usize, id: TicketId) -> RepoResult<()> {
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "lottery ticket",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

impl LotteryRepository for SqliteLotteryRepository<'_> {
    fn create_ticket(&self, ticket: &LotteryTicket) -> RepoResult<TicketId> {
        ticket.validate()?;

        self.conn.execute(
            "INSERT INTO lottery_tickets (
                id,
                user_id,
                numbers,
                bonus_number,
                method,
                is_favorite,
                is_purchased,
                purchased_at,
                notes,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                ticket.id.to_string(),
                ticket.user_id.as_str(),
                numbers_to_json(&ticket.numbers)?,
                ticket.bonus_number,
                ticket.method.as_str(),
                bool_to_int(ticket.is_favorite),
                bool_to_int(ticket.is_purchased()),
                ticket.purchased_at.map(datetime_to_ms),
                ticket.notes.as_deref(),
                datetime_to_ms(ticket.created_at),
            ],
        )?;

        Ok(ticket.id)
    }

    fn get_ticket(&self, id: TicketId) -> RepoResult<Option<LotteryTicket>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TICKET_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_ticket_row(row)?));
        }

        Ok(None)
    }

    fn list_tickets(
        &self,
        user_id: &str,
        limit: Option<u32>,
        offset: u32,
    ) -> RepoResult<Vec<LotteryTicket>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TICKET_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY created_at DESC, id ASC
             LIMIT ?2 OFFSET ?3;"
        ))?;

        let mut rows = stmt.query(params![
            user_id,
            normalize_list_limit(limit),
            offset
        ])?;
        let mut tickets = Vec::new();
        while let Some(row) = rows.next()? {
            tickets.push(parse_ticket_row(row)?);
        }

        Ok(tickets)
    }

    fn list_favorites(&self, user_id: &str) -> RepoResult<Vec<LotteryTicket>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TICKET_SELECT_SQL}
             WHERE user_id = ?1 AND is_favorite = 1
             ORDER BY created_at DESC, id ASC;"
        ))?;

        let mut rows = stmt.query(params![user_id])?;
        let mut tickets = Vec::new();
        while let Some(row) = rows.next()? {
            tickets.push(parse_ticket_row(row)?);
        }

        Ok(tickets)
    }

    fn set_favorite(&self, id: TicketId, is_favorite: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE lottery_tickets SET is_favorite = ?1 WHERE id = ?2;",
            params![bool_to_int(is_favorite), id.to_string()],
        )?;
        self.require_changed(changed, id)
    }

    fn set_purchased(&self, id: TicketId, purchased_at: Option<DateTime<Utc>>) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE lottery_tickets
             SET is_purchased = ?1, purchased_at = ?2
             WHERE id = ?3;",
            params![
                bool_to_int(purchased_at.is_some()),
                purchased_at.map(datetime_to_ms),
                id.to_string()
            ],
        )?;
        self.require_changed(changed, id)
    }

    fn update_notes(&self, id: TicketId, notes: &str) -> RepoResult<()> {
        let trimmed = notes.trim();
        let stored = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        };
        let changed = self.conn.execute(
            "UPDATE lottery_tickets SET notes = ?1 WHERE id = ?2;",
            params![stored, id.to_string()],
        )?;
        self.require_changed(changed, id)
    }

    fn delete_ticket(&self, id: TicketId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM lottery_tickets WHERE id = ?1;",
            [id.to_string()],
        )?;
        self.require_changed(changed, id)
    }

    fn statistics(&self, user_id: &str) -> RepoResult<LotteryStatistics> {
        let stats = self.conn.query_row(
            "SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN method = 'ai' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN method = 'manual' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(is_purchased), 0),
                COALESCE(SUM(is_favorite), 0)
             FROM lottery_tickets
             WHERE user_id = ?1;",
            [user_id],
            |row| {
                Ok(LotteryStatistics {
                    total: row.get(0)?,
                    ai_generated: row.get(1)?,
                    manual_generated: row.get(2)?,
                    purchased: row.get(3)?,
                    favorites: row.get(4)?,
                })
            },
        )?;
        Ok(stats)
    }
}

fn parse_ticket_row(row: &Row<'_>) -> RepoResult<LotteryTicket> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in lottery_tickets.id"))
    })?;

    let numbers_json: String = row.get("numbers")?;
    let numbers: Vec<u8> = serde_json::from_str(&numbers_json).map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid number list in lottery_tickets.numbers: {err}"
        ))
    })?;

    let method_text: String = row.get("method")?;
    let method = parse_method(&method_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid method value `{method_text}` in lottery_tickets.method"
        ))
    })?;

    let is_favorite = int_to_bool(row.get("is_favorite")?, "lottery_tickets.is_favorite")?;
    let is_purchased = int_to_bool(row.get("is_purchased")?, "lottery_tickets.is_purchased")?;

    let purchased_at = match row.get::<_, Option<i64>>("purchased_at")? {
        Some(ms) => Some(parse_epoch_ms(ms, "lottery_tickets.purchased_at")?),
        None => None,
    };
    if is_purchased != purchased_at.is_some() {
        return Err(RepoError::InvalidData(
            "lottery_tickets.is_purchased disagrees with purchased_at".to_owned(),
        ));
    }

    let ticket = LotteryTicket {
        id,
        user_id: row.get("user_id")?,
        numbers,
        bonus_number: row.get("bonus_number")?,
        method,
        is_favorite,
        purchased_at,
        notes: row.get("notes")?,
        created_at: parse_epoch_ms(row.get("created_at")?, "lottery_tickets.created_at")?,
    };
    ticket.validate()?;
    Ok(ticket)
}

fn numbers_to_json(numbers: &[u8]) -> RepoResult<String> {
    serde_json::to_string(numbers)
        .map_err(|err| RepoError::InvalidData(format!("number list failed to encode: {err}")))
}

fn normalize_list_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_validation_catches_each_shape_error() {
        assert!(validate_numbers(&[1, 2, 3, 4, 5, 6]).is_ok());
        assert!(validate_numbers(&[3, 7, 17, 21, 34, 45]).is_ok());

        assert_eq!(
            validate_numbers(&[1, 2, 3]),
            Err(TicketValidationError::WrongCount(3))
        );
        assert_eq!(
            validate_numbers(&[0, 2, 3, 4, 5, 6]),
            Err(TicketValidationError::OutOfRange(0))
        );
        assert_eq!(
            validate_numbers(&[1, 2, 3, 4, 5, 46]),
            Err(TicketValidationError::OutOfRange(46))
        );
        assert_eq!(
            validate_numbers(&[1, 2, 2, 4, 5, 6]),
            Err(TicketValidationError::Duplicate(2))
        );
        assert_eq!(
            validate_numbers(&[2, 1, 3, 4, 5, 6]),
            Err(TicketValidationError::NotAscending)
        );
    }

    #[test]
    fn list_limit_defaults_and_caps() {
        assert_eq!(normalize_list_limit(None), 20);
        assert_eq!(normalize_list_limit(Some(5)), 5);
        assert_eq!(normalize_list_limit(Some(500)), 50);
    }
}
