//! Flutter-facing bindings for the Sticker Memo core.

pub mod api;
