//! Backend record ingestion and board snapshot maintenance.
//!
//! # Responsibility
//! - Decode memo rows from either backend schema vintage into the
//!   canonical model.
//! - Apply realtime change events to an in-memory board snapshot.
//!
//! # Invariants
//! - Normalization happens exactly once, at ingest; everything downstream
//!   sees only `model::memo::Memo`.
//! - The snapshot is recomputed from whole collections; there is no
//!   partial-result merging.
//!
//! # See also
//! - docs/architecture/display-pipeline.md

pub mod feed;
pub mod record;
