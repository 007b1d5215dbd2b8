//! Draft recovery: resume an existing draft or start fresh.
//!
//! Drives the NoSession → AwaitingClinicianInfo → DraftActive → Submitted
//! lifecycle against the repository and the session store. Lookup failures
//! are surfaced distinctly (bad format vs. well-formed-but-missing) so the
//! UI can offer "check your id" vs. "start new" guidance.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use atria_core::models::clinician::ClinicianInfo;
use atria_core::models::session::{Session, SessionStatus};
use atria_core::models::session_id::SessionId;

use crate::error::{RecoveryError, StoreError};
use crate::repository::SessionRepository;
use crate::state::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryState {
    NoSession,
    AwaitingClinicianInfo,
    DraftActive,
    Submitted,
}

/// Outcome of submitting clinician info: either a session started
/// immediately, or an existing draft was found and the resume/start-new
/// choice is deferred to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntakeOutcome {
    Started { session_id: SessionId },
    ExistingDraft {
        session_id: SessionId,
        last_updated: jiff::Timestamp,
        overall_progress: f64,
    },
}

pub struct RecoveryFlow {
    repo: Arc<SessionRepository>,
    store: Arc<SessionStore>,
    state: RecoveryState,
    pending_info: Option<ClinicianInfo>,
    pending_draft: Option<Session>,
}

impl RecoveryFlow {
    pub fn new(repo: Arc<SessionRepository>, store: Arc<SessionStore>) -> Self {
        Self {
            repo,
            store,
            state: RecoveryState::NoSession,
            pending_info: None,
            pending_draft: None,
        }
    }

    pub fn state(&self) -> RecoveryState {
        self.state
    }

    pub fn begin(&mut self) {
        self.state = RecoveryState::AwaitingClinicianInfo;
    }

    /// Look up an existing draft for this clinician before creating
    /// anything. Finding one defers the resume/start-new choice
    /// ([`Self::resume_existing`] / [`Self::start_new`]); otherwise a new
    /// session starts immediately.
    pub fn submit_clinician_info(
        &mut self,
        info: ClinicianInfo,
    ) -> Result<IntakeOutcome, RecoveryError> {
        if let Some(field) = info.missing_required_field() {
            return Err(StoreError::Validation(field).into());
        }

        if let Some(draft) = self.repo.find_by_clinician_email(&info.clinician_email)? {
            info!(session_id = %draft.session_id, "existing draft found for clinician");
            let outcome = IntakeOutcome::ExistingDraft {
                session_id: draft.session_id.clone(),
                last_updated: draft.last_updated,
                overall_progress: draft.progress.overall,
            };
            self.pending_info = Some(info);
            self.pending_draft = Some(draft);
            return Ok(outcome);
        }

        let session_id = self.store.set_clinician_info(info)?;
        self.state = RecoveryState::DraftActive;
        Ok(IntakeOutcome::Started { session_id })
    }

    /// Resume the draft found by [`Self::submit_clinician_info`].
    pub fn resume_existing(&mut self) -> Result<SessionId, RecoveryError> {
        let draft = self.pending_draft.take().ok_or(RecoveryError::NoPendingDraft)?;
        self.pending_info = None;

        let id = draft.session_id.clone();
        self.store.adopt(draft);
        self.state = RecoveryState::DraftActive;
        Ok(id)
    }

    /// Start fresh with the clinician info held since
    /// [`Self::submit_clinician_info`], orphaning (not deleting) the old
    /// draft.
    pub fn start_new(&mut self) -> Result<SessionId, RecoveryError> {
        let info = self.pending_info.take().ok_or(RecoveryError::NoPendingDraft)?;
        self.pending_draft = None;

        let session_id = self.store.set_clinician_info(info)?;
        self.state = RecoveryState::DraftActive;
        Ok(session_id)
    }

    /// Resume directly from a hand-entered identifier. Format errors
    /// surface before any lookup; a well-formed identifier with no record
    /// is a distinct not-found condition. Neither mutates any state.
    pub fn enter_session_id(&mut self, raw: &str) -> Result<SessionId, RecoveryError> {
        let id = SessionId::parse(raw)
            .map_err(|_| RecoveryError::InvalidIdentifier(raw.to_string()))?;
        let Some(session) = self.repo.load(&id)? else {
            return Err(RecoveryError::NotFound(id));
        };

        let submitted = session.status == SessionStatus::Submitted;
        self.store.adopt(session);
        self.pending_info = None;
        self.pending_draft = None;
        self.state = if submitted {
            RecoveryState::Submitted
        } else {
            RecoveryState::DraftActive
        };
        Ok(id)
    }

    /// Terminal for this identifier; a subsequent report mints a fresh one.
    pub fn mark_submitted(&mut self) -> Result<(), RecoveryError> {
        self.store.mark_submitted()?;
        self.state = RecoveryState::Submitted;
        Ok(())
    }

    /// Discard the active draft (clears memory and durable storage) and
    /// return to the start of the flow.
    pub fn discard(&mut self) {
        self.store.clear();
        self.pending_info = None;
        self.pending_draft = None;
        self.state = RecoveryState::NoSession;
    }
}
