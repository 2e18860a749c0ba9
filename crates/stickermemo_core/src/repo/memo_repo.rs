//! Memo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `memos` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Memo::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Listing order is storage order (`created_at` descending); board
//!   display order is computed by `rank`, never by SQL.
//!
//! # See also
//! - docs/architecture/storage.md

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

use super::{
    bool_to_int, datetime_to_ms, int_to_bool, parse_epoch_ms, table_exists, table_has_column,
    RepoError, RepoResult,
};
use crate::model::memo::{Memo, MemoId, Position, Priority};

const MEMO_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    content,
    color,
    tags,
    priority,
    is_pinned,
    position_x,
    position_y,
    created_at,
    updated_at
FROM memos";

/// Query options for listing memos of one account.
#[derive(Debug, Clone, Default)]
pub struct MemoListQuery {
    /// Exact tag match against the stored tag list.
    pub tag: Option<String>,
    pub priority: Option<Priority>,
    pub pinned_only: bool,
    /// Case-insensitive substring over title and content.
    pub text: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for memo CRUD operations.
pub trait MemoRepository {
    fn create_memo(&self, memo: &Memo) -> RepoResult<MemoId>;
    fn update_memo(&self, memo: &Memo) -> RepoResult<()>;
    fn get_memo(&self, id: &MemoId) -> RepoResult<Option<Memo>>;
    fn list_memos(&self, user_id: &str, query: &MemoListQuery) -> RepoResult<Vec<Memo>>;
    fn delete_memo(&self, id: &MemoId) -> RepoResult<()>;
}

/// SQLite-backed memo repository.
pub struct SqliteMemoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemoRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_memo_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl MemoRepository for SqliteMemoRepository<'_> {
    fn create_memo(&self, memo: &Memo) -> RepoResult<MemoId> {
        memo.validate()?;

        self.conn.execute(
            "INSERT INTO memos (
                id,
                user_id,
                title,
                content,
                color,
                tags,
                priority,
                is_pinned,
                position_x,
                position_y,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
            params![
                memo.id.as_str(),
                memo.user_id.as_str(),
                memo.title.as_deref(),
                memo.content.as_str(),
                memo.color.as_str(),
                tags_to_json(&memo.tags)?,
                memo.priority.as_str(),
                bool_to_int(memo.is_pinned),
                memo.position.map(|p| p.x),
                memo.position.map(|p| p.y),
                datetime_to_ms(memo.created_at),
                memo.updated_at.map(datetime_to_ms),
            ],
        )?;

        Ok(memo.id.clone())
    }

    fn update_memo(&self, memo: &Memo) -> RepoResult<()> {
        memo.validate()?;

        let changed = self.conn.execute(
            "UPDATE memos
             SET
                title = ?1,
                content = ?2,
                color = ?3,
                tags = ?4,
                priority = ?5,
                is_pinned = ?6,
                position_x = ?7,
                position_y = ?8,
                updated_at = ?9
             WHERE id = ?10;",
            params![
                memo.title.as_deref(),
                memo.content.as_str(),
                memo.color.as_str(),
                tags_to_json(&memo.tags)?,
                memo.priority.as_str(),
                bool_to_int(memo.is_pinned),
                memo.position.map(|p| p.x),
                memo.position.map(|p| p.y),
                memo.updated_at.map(datetime_to_ms),
                memo.id.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "memo",
                id: memo.id.to_string(),
            });
        }

        Ok(())
    }

    fn get_memo(&self, id: &MemoId) -> RepoResult<Option<Memo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMO_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_memo_row(row)?));
        }

        Ok(None)
    }

    fn list_memos(&self, user_id: &str, query: &MemoListQuery) -> RepoResult<Vec<Memo>> {
        let mut sql = format!("{MEMO_SELECT_SQL} WHERE user_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(user_id.to_owned())];

        if let Some(priority) = query.priority {
            sql.push_str(" AND priority = ?");
            bind_values.push(Value::Text(priority.as_str().to_owned()));
        }

        if query.pinned_only {
            sql.push_str(" AND is_pinned = 1");
        }

        if let Some(tag) = &query.tag {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1 FROM json_each(memos.tags)
                    WHERE json_each.value = ?
                )",
            );
            bind_values.push(Value::Text(tag.clone()));
        }

        if let Some(text) = &query.text {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                sql.push_str(
                    " AND (LOWER(COALESCE(title, '')) LIKE ? ESCAPE '\\'
                       OR LOWER(content) LIKE ? ESCAPE '\\')",
                );
                let pattern = like_pattern(trimmed);
                bind_values.push(Value::Text(pattern.clone()));
                bind_values.push(Value::Text(pattern));
            }
        }

        sql.push_str(" ORDER BY created_at DESC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut memos = Vec::new();

        while let Some(row) = rows.next()? {
            memos.push(parse_memo_row(row)?);
        }

        Ok(memos)
    }

    fn delete_memo(&self, id: &MemoId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM memos WHERE id = ?1;", [id.as_str()])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "memo",
                id: id.to_string(),
            });
        }

        Ok(())
    }
}

fn parse_memo_row(row: &Row<'_>) -> RepoResult<Memo> {
    let priority_text: String = row.get("priority")?;
    let priority = parse_priority(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid priority value `{priority_text}` in memos.priority"
        ))
    })?;

    let tags_json: String = row.get("tags")?;
    let tags: Vec<String> = serde_json::from_str(&tags_json).map_err(|err| {
        RepoError::InvalidData(format!("invalid tag list in memos.tags: {err}"))
    })?;

    let is_pinned = int_to_bool(row.get("is_pinned")?, "memos.is_pinned")?;

    let created_at = parse_epoch_ms(row.get("created_at")?, "memos.created_at")?;
    let updated_at = match row.get::<_, Option<i64>>("updated_at")? {
        Some(ms) => Some(parse_epoch_ms(ms, "memos.updated_at")?),
        None => None,
    };

    let position = match (
        row.get::<_, Option<f64>>("position_x")?,
        row.get::<_, Option<f64>>("position_y")?,
    ) {
        (Some(x), Some(y)) => Some(Position { x, y }),
        _ => None,
    };

    let memo = Memo {
        id: MemoId::from(row.get::<_, String>("id")?),
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        color: row.get("color")?,
        tags,
        priority,
        is_pinned,
        position,
        created_at,
        updated_at,
    };
    memo.validate()?;
    Ok(memo)
}

/// Strict storage-label parse; unknown labels are persisted-state errors,
/// unlike the tolerant wire mapping in `Priority::from_label`.
fn parse_priority(value: &str) -> Option<Priority> {
    match value {
        "low" => Some(Priority::Low),
        "medium" => Some(Priority::Medium),
        "high" => Some(Priority::High),
        _ => None,
    }
}

fn tags_to_json(tags: &[String]) -> RepoResult<String> {
    serde_json::to_string(tags)
        .map_err(|err| RepoError::InvalidData(format!("tag list failed to encode: {err}")))
}

fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn ensure_memo_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "memos")? {
        return Err(RepoError::MissingRequiredTable("memos"));
    }

    for column in [
        "id",
        "user_id",
        "content",
        "tags",
        "priority",
        "is_pinned",
        "created_at",
    ] {
        if !table_has_column(conn, "memos", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "memos",
                column,
            });
        }
    }

    Ok(())
}
