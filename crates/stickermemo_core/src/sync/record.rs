//! Tolerant decoding of backend memo rows.
//!
//! The hosted backend has shipped two memo schemas: the original sticker
//! table (string id, `title` + `content`, label priorities, pin flag,
//! board position) and the widget-era table (integer id, `text` body,
//! numeric priorities). Rows of either vintage decode into one
//! [`RemoteMemoRecord`] and normalize into the canonical [`Memo`].
//!
//! Missing `id` is the only hard decode failure; every other absent or
//! malformed field degrades to a documented default so one bad column
//! never drops a whole row.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::model::color::default_color;
use crate::model::memo::{Memo, MemoId, Position, Priority, MAX_TAGS};

/// Memo row as served by either backend schema.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteMemoRecord {
    id: RemoteId,
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    title: Option<String>,
    /// Body column of the widget-era schema.
    #[serde(default)]
    text: Option<String>,
    /// Body column of the original schema.
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    priority: Option<RemotePriority>,
    #[serde(default)]
    is_pinned: bool,
    #[serde(default)]
    position_x: Option<f64>,
    #[serde(default)]
    position_y: Option<f64>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// Row id, integer in the widget-era schema, string before that.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RemoteId {
    Int(i64),
    Text(String),
}

/// Priority column, numeric code or label depending on schema vintage.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RemotePriority {
    Code(i64),
    Label(String),
}

impl RemoteMemoRecord {
    /// Normalizes this row into the canonical memo shape.
    ///
    /// # Invariants
    /// - `text` wins over `content` when both columns are present.
    /// - Unknown priorities become `Medium`.
    /// - Tags are clipped to the first [`MAX_TAGS`] non-blank entries.
    /// - A row without `created_at` borrows `updated_at`, then falls back
    ///   to the Unix epoch; timestamps are never invented from the clock.
    pub fn into_memo(self) -> Memo {
        let id = match self.id {
            RemoteId::Int(n) => MemoId::from(n.to_string()),
            RemoteId::Text(s) => MemoId::from(s),
        };
        let title = self.title.filter(|t| !t.trim().is_empty());
        let content = match (self.text, self.content) {
            (Some(text), _) => text,
            (None, Some(content)) => content,
            (None, None) => String::new(),
        };
        let color = self
            .color
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| default_color().to_owned());
        let tags: Vec<String> = self
            .tags
            .into_iter()
            .map(|tag| tag.trim().to_owned())
            .filter(|tag| !tag.is_empty())
            .take(MAX_TAGS)
            .collect();
        let priority = match self.priority {
            Some(RemotePriority::Code(code)) => Priority::from_code(code),
            Some(RemotePriority::Label(label)) => Priority::from_label(&label),
            None => Priority::Medium,
        };
        let position = match (self.position_x, self.position_y) {
            (Some(x), Some(y)) => Some(Position { x, y }),
            _ => None,
        };
        let created_at = self
            .created_at
            .or(self.updated_at)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        Memo {
            id,
            user_id: self.user_id,
            title,
            content,
            color,
            tags,
            priority,
            is_pinned: self.is_pinned,
            position,
            created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Decodes a JSON array of backend rows into canonical memos.
///
/// This is the fetch-response entry point; realtime payloads decode single
/// records through [`RemoteMemoRecord`] directly.
pub fn parse_memo_batch(json: &str) -> Result<Vec<Memo>, serde_json::Error> {
    let records: Vec<RemoteMemoRecord> = serde_json::from_str(json)?;
    Ok(records.into_iter().map(RemoteMemoRecord::into_memo).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> Memo {
        let record: RemoteMemoRecord = serde_json::from_value(value).unwrap();
        record.into_memo()
    }

    #[test]
    fn legacy_shape_decodes() {
        let memo = decode(json!({
            "id": "abc-123",
            "user_id": "user-1",
            "title": "Groceries",
            "content": "Buy milk",
            "color": "#FFE082",
            "tags": ["shopping"],
            "priority": "high",
            "is_pinned": true,
            "position_x": 12.5,
            "position_y": 40.0,
            "created_at": "2024-01-03T12:00:00Z",
            "updated_at": "2024-01-04T08:30:00Z"
        }));
        assert_eq!(memo.id.as_str(), "abc-123");
        assert_eq!(memo.title.as_deref(), Some("Groceries"));
        assert_eq!(memo.content, "Buy milk");
        assert_eq!(memo.priority, Priority::High);
        assert!(memo.is_pinned);
        assert_eq!(memo.position, Some(Position { x: 12.5, y: 40.0 }));
        assert!(memo.updated_at.is_some());
    }

    #[test]
    fn widget_shape_decodes() {
        let memo = decode(json!({
            "id": 42,
            "user_id": "user-1",
            "text": "Call the bank",
            "priority": 2,
            "created_at": "2024-02-01T09:00:00+00:00"
        }));
        assert_eq!(memo.id.as_str(), "42");
        assert_eq!(memo.content, "Call the bank");
        assert_eq!(memo.priority, Priority::High);
        assert_eq!(memo.title, None);
        assert!(!memo.is_pinned);
        assert_eq!(memo.color, default_color());
    }

    #[test]
    fn text_wins_over_content() {
        let memo = decode(json!({
            "id": 7,
            "text": "new body",
            "content": "old body"
        }));
        assert_eq!(memo.content, "new body");
    }

    #[test]
    fn malformed_priority_defaults_to_medium() {
        let memo = decode(json!({ "id": 1, "text": "x", "priority": 9 }));
        assert_eq!(memo.priority, Priority::Medium);
        let memo = decode(json!({ "id": 1, "text": "x", "priority": "urgent" }));
        assert_eq!(memo.priority, Priority::Medium);
        let memo = decode(json!({ "id": 1, "text": "x" }));
        assert_eq!(memo.priority, Priority::Medium);
    }

    #[test]
    fn missing_timestamps_fall_back_deterministically() {
        let memo = decode(json!({
            "id": 1,
            "text": "x",
            "updated_at": "2024-03-01T00:00:00Z"
        }));
        assert_eq!(memo.created_at, memo.updated_at.unwrap());

        let memo = decode(json!({ "id": 1, "text": "x" }));
        assert_eq!(memo.created_at, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(memo.recency(), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn missing_id_is_a_decode_error() {
        let result: Result<RemoteMemoRecord, _> =
            serde_json::from_value(json!({ "text": "orphan" }));
        assert!(result.is_err());
    }

    #[test]
    fn tags_are_clipped_and_cleaned() {
        let memo = decode(json!({
            "id": 1,
            "text": "x",
            "tags": [" a ", "", "b", "c", "d", "e", "f"]
        }));
        assert_eq!(memo.tags, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn batch_parsing_maps_every_row() {
        let json = r#"[
            {"id": 1, "text": "first"},
            {"id": "two", "content": "second", "priority": "low"}
        ]"#;
        let memos = parse_memo_batch(json).unwrap();
        assert_eq!(memos.len(), 2);
        assert_eq!(memos[0].id.as_str(), "1");
        assert_eq!(memos[1].priority, Priority::Low);
    }
}
