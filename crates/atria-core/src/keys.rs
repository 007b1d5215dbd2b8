//! Durable-store key conventions.
//!
//! Pure string functions — no storage dependency. These define the canonical
//! layout of records in the intake durable store.

use crate::models::session_id::SessionId;

pub fn session(id: &SessionId) -> String {
    format!("sessions/{id}.json")
}

/// Well-known key holding the list of all stored session identifiers.
/// The store port has no enumeration, so secondary-key scans go through
/// this index.
pub const SESSION_INDEX: &str = "sessions/_index.json";
