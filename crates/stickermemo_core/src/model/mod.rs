//! Canonical domain model for the sticker board.
//!
//! # Responsibility
//! - Define the data structures used by core business logic.
//! - Keep one normalized memo shape regardless of backend schema vintage.
//!
//! # Invariants
//! - Every memo is identified by an opaque `MemoId`; ids are never parsed.
//! - Wire-shape differences are resolved before data enters this model.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod color;
pub mod event;
pub mod memo;
