//! atria-session
//!
//! The session state engine: identifier generation, the durable-store
//! port and its adapters, the session repository with debounced
//! write-through, the canonical in-memory session store, and the
//! draft-recovery flow.

pub mod codec;
mod debounce;
pub mod error;
pub mod recovery;
pub mod repository;
pub mod state;
pub mod store;
