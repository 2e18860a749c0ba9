//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Keep error semantics simple for the board UI.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures come back inside envelopes, never as thrown errors.
//!
//! # See also
//! - docs/architecture/display-pipeline.md

use std::fmt::Display;
use std::path::PathBuf;
use std::sync::OnceLock;

use rand::thread_rng;

use stickermemo_core::db::open_db;
use stickermemo_core::model::color::text_color_for_background;
use stickermemo_core::repo::lottery_repo::SqliteLotteryRepository;
use stickermemo_core::service::lottery_service::{LotteryService, LotteryServiceError};
use stickermemo_core::service::memo_service::MemoServiceError;
use stickermemo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Memo, MemoDraft, MemoId, MemoService, SqliteMemoRepository,
};

const BOARD_DB_FILE_NAME: &str = "stickermemo_board.sqlite3";
static BOARD_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One memo as shown on the sticker board.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardMemo {
    /// Stable memo ID in string form.
    pub id: String,
    /// Board title, already resolved through the content-preview fallback.
    pub title: String,
    /// Full memo body.
    pub content: String,
    /// Background color as `#rrggbb`.
    pub color: String,
    /// Readable text color for that background (`#000000` or `#FFFFFF`).
    pub text_color: String,
    pub tags: Vec<String>,
    /// Priority label (`low|medium|high`).
    pub priority: String,
    pub is_pinned: bool,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub created_at_ms: i64,
    pub updated_at_ms: Option<i64>,
}

/// Board listing envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardListResponse {
    /// Memos in display order (empty on failure or an empty board).
    pub memos: Vec<BoardMemo>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Generic action response envelope for board commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Affected memo ID, when the operation has one.
    pub memo_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl BoardActionResponse {
    fn success(message: impl Into<String>, memo_id: String) -> Self {
        Self {
            ok: true,
            memo_id: Some(memo_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            memo_id: None,
            message: message.into(),
        }
    }
}

/// Lottery draw envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LuckyDrawResponse {
    /// Whether the draw was generated and saved.
    pub ok: bool,
    /// Saved ticket ID on success.
    pub ticket_id: Option<String>,
    /// Six drawn numbers, ascending (empty on failure).
    pub numbers: Vec<u8>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// Returns the board for one account: ranked, then narrowed by `query`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Blank `query` returns the whole board.
/// - Never panics; failures return an empty list plus a message.
#[flutter_rust_bridge::frb(sync)]
pub fn board_memos(user_id: String, query: String) -> BoardListResponse {
    match with_memo_service(|service| service.memos_for_display(&user_id, &query)) {
        Ok(memos) => {
            let message = if memos.is_empty() {
                "No memos.".to_string()
            } else {
                format!("Showing {} memo(s).", memos.len())
            };
            BoardListResponse {
                memos: memos.into_iter().map(to_board_memo).collect(),
                message,
            }
        }
        Err(err) => BoardListResponse {
            memos: Vec::new(),
            message: report_failure("board_memos", err),
        },
    }
}

/// Creates a memo on the board.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns operation result and the created memo ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn board_create_memo(
    user_id: String,
    content: String,
    title: Option<String>,
) -> BoardActionResponse {
    let mut draft = MemoDraft::new(content.trim());
    draft.title = title;
    match with_memo_service(|service| service.create_memo(&user_id, draft)) {
        Ok(memo) => BoardActionResponse::success("Memo created.", memo.id.to_string()),
        Err(err) => BoardActionResponse::failure(report_failure("board_create_memo", err)),
    }
}

/// Pins or unpins one memo.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns operation result and the affected memo ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn board_toggle_pin(memo_id: String, is_pinned: bool) -> BoardActionResponse {
    let id = MemoId::from(memo_id);
    match with_memo_service(|service| service.toggle_pin(&id, is_pinned)) {
        Ok(memo) => {
            let message = if memo.is_pinned {
                "Memo pinned."
            } else {
                "Memo unpinned."
            };
            BoardActionResponse::success(message, memo.id.to_string())
        }
        Err(err) => BoardActionResponse::failure(report_failure("board_toggle_pin", err)),
    }
}

/// Deletes one memo permanently.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns operation result and the deleted memo ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn board_delete_memo(memo_id: String) -> BoardActionResponse {
    let id = MemoId::from(memo_id);
    match with_memo_service(|service| service.delete_memo(&id)) {
        Ok(()) => BoardActionResponse::success("Memo deleted.", id.to_string()),
        Err(err) => BoardActionResponse::failure(report_failure("board_delete_memo", err)),
    }
}

/// Draws six weighted lucky numbers and saves them as a ticket.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns the saved ticket ID and numbers on success.
#[flutter_rust_bridge::frb(sync)]
pub fn draw_lucky_numbers(user_id: String) -> LuckyDrawResponse {
    match with_lottery_service(|service| service.generate_and_save(&user_id, &mut thread_rng())) {
        Ok(ticket) => LuckyDrawResponse {
            ok: true,
            ticket_id: Some(ticket.id.to_string()),
            numbers: ticket.numbers,
            message: "Lucky numbers drawn.".to_string(),
        },
        Err(err) => LuckyDrawResponse {
            ok: false,
            ticket_id: None,
            numbers: Vec::new(),
            message: report_failure("draw_lucky_numbers", err),
        },
    }
}

fn resolve_board_db_path() -> PathBuf {
    BOARD_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("STICKERMEMO_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(BOARD_DB_FILE_NAME)
        })
        .clone()
}

fn with_memo_service<T>(
    f: impl FnOnce(&MemoService<SqliteMemoRepository<'_>>) -> Result<T, MemoServiceError>,
) -> Result<T, String> {
    let db_path = resolve_board_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("board DB open failed: {err}"))?;
    let repo = SqliteMemoRepository::try_new(&conn)
        .map_err(|err| format!("board repo init failed: {err}"))?;
    let service = MemoService::new(repo);
    f(&service).map_err(|err| err.to_string())
}

fn with_lottery_service<T>(
    f: impl FnOnce(&LotteryService<SqliteLotteryRepository<'_>>) -> Result<T, LotteryServiceError>,
) -> Result<T, String> {
    let db_path = resolve_board_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("lottery DB open failed: {err}"))?;
    let service = LotteryService::new(SqliteLotteryRepository::new(&conn));
    f(&service).map_err(|err| err.to_string())
}

fn to_board_memo(memo: Memo) -> BoardMemo {
    let text_color = text_color_for_background(&memo.color).to_string();
    BoardMemo {
        id: memo.id.to_string(),
        title: memo.display_title(),
        content: memo.content,
        color: memo.color,
        text_color,
        tags: memo.tags,
        priority: memo.priority.as_str().to_string(),
        is_pinned: memo.is_pinned,
        position_x: memo.position.map(|p| p.x),
        position_y: memo.position.map(|p| p.y),
        created_at_ms: memo.created_at.timestamp_millis(),
        updated_at_ms: memo.updated_at.map(|at| at.timestamp_millis()),
    }
}

// Envelope messages may carry memo text; the log line stays metadata-only.
fn report_failure(op: &'static str, err: impl Display) -> String {
    log::warn!("event=ffi_call module=ffi status=error op={op}");
    format!("{op} failed: {err}")
}
