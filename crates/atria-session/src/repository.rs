//! Maps session identifiers to serialized records in the durable store.
//!
//! The store port has no enumeration, so the repository maintains an index
//! record of known identifiers; secondary-key lookups (clinician email)
//! scan it linearly. Failed operations are reported once to the caller;
//! the repository does not retry internally.

use std::sync::Arc;

use tracing::info;

use atria_core::keys;
use atria_core::models::session::{Session, SessionStatus};
use atria_core::models::session_id::SessionId;

use crate::error::StorageError;
use crate::store::DurableStore;

pub struct SessionRepository {
    store: Arc<dyn DurableStore>,
}

impl SessionRepository {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self { store }
    }

    /// Load a session. Aggregate progress is recomputed fresh; the
    /// persisted record never carries an authoritative score.
    pub fn load(&self, id: &SessionId) -> Result<Option<Session>, StorageError> {
        let Some(raw) = self.store.read(&keys::session(id))? else {
            return Ok(None);
        };
        let mut session: Session = serde_json::from_str(&raw)?;
        session.progress = atria_progress::compute_progress(&session);
        Ok(Some(session))
    }

    /// Serialize and write a session, stamping `last_updated` with the
    /// current time, and index its identifier.
    pub fn save(&self, session: &Session) -> Result<(), StorageError> {
        let mut record = session.clone();
        record.last_updated = jiff::Timestamp::now();

        let key = keys::session(&record.session_id);
        self.store.write(&key, &serde_json::to_string(&record)?)?;

        let mut index = self.index()?;
        if !index.contains(&record.session_id) {
            index.push(record.session_id.clone());
            self.write_index(&index)?;
        }
        info!(session_id = %record.session_id, "session saved");
        Ok(())
    }

    /// Remove a session record and drop it from the index. Removing an
    /// absent record is a no-op.
    pub fn remove(&self, id: &SessionId) -> Result<(), StorageError> {
        self.store.remove(&keys::session(id))?;

        let mut index = self.index()?;
        let before = index.len();
        index.retain(|known| known != id);
        if index.len() != before {
            self.write_index(&index)?;
            info!(session_id = %id, "session removed");
        }
        Ok(())
    }

    /// Linear scan for an unsubmitted session owned by this clinician.
    pub fn find_by_clinician_email(&self, email: &str) -> Result<Option<Session>, StorageError> {
        let needle = email.trim().to_ascii_lowercase();
        for id in self.index()? {
            if let Some(session) = self.load(&id)?
                && session.status == SessionStatus::Draft
                && session.clinician.clinician_email.trim().to_ascii_lowercase() == needle
            {
                return Ok(Some(session));
            }
        }
        Ok(None)
    }

    /// All indexed identifiers, for seeding the generator at startup.
    pub fn known_ids(&self) -> Result<Vec<SessionId>, StorageError> {
        self.index()
    }

    fn index(&self) -> Result<Vec<SessionId>, StorageError> {
        match self.store.read(keys::SESSION_INDEX)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_index(&self, index: &[SessionId]) -> Result<(), StorageError> {
        self.store
            .write(keys::SESSION_INDEX, &serde_json::to_string(index)?)
    }
}
