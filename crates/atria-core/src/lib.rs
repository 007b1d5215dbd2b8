//! atria-core
//!
//! Pure domain types and durable-store key conventions. No I/O — this is
//! the shared vocabulary of the Atria intake system.

pub mod error;
pub mod keys;
pub mod models;
