//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.
//!
//! # See also
//! - docs/architecture/display-pipeline.md

pub mod event_service;
pub mod lottery_service;
pub mod memo_service;
