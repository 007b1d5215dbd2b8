//! The canonical in-memory session store.
//!
//! One `SessionStore` instance holds the single active session, constructed
//! and owned by the top-level composition point and passed by handle to
//! consumers. Every mutation is one synchronous, atomic lock-hold
//! (validate, merge, recompute, snapshot); subscriber callbacks and the
//! write-through run after the lock is released, so no operation can be
//! observed partially applied.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use atria_core::models::clinician::ClinicianInfo;
use atria_core::models::section::ModuleKey;
use atria_core::models::session::{Session, SessionStatus};
use atria_core::models::session_id::SessionId;

use crate::codec::SessionIdGenerator;
use crate::debounce::DebouncedWriter;
use crate::error::{StorageError, StoreError};
use crate::repository::SessionRepository;

/// Engine configuration, owned by the composition point.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Quiet period before a scheduled write-through lands.
    pub debounce: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(800),
        }
    }
}

/// Notifications delivered to subscribers. Storage failures share the
/// channel with state changes but are tagged distinctly, so a UI can tell
/// "your data changed" from "your data is safe but not yet saved".
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A committed change; carries the latest snapshot.
    Updated { session: Session },
    /// The active session was cleared.
    Cleared,
    /// Aggregate progress crossed a celebration threshold. Emitted at most
    /// once per threshold per session; the engine only signals, the UI
    /// reacts.
    ThresholdCrossed { threshold: u8 },
    /// A write-through failed. The in-memory session remains the source of
    /// truth; reported once per failed attempt.
    PersistFailed { message: String },
    /// A mutation arrived for a submitted session and was dropped. A UI
    /// race, not a fault.
    MutationIgnored { operation: &'static str },
}

pub type SubscriptionId = u64;

type Subscriber = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

/// Subscriber registry shared between the store and the write-through
/// tasks. Callbacks run on the emitting thread, outside the store's state
/// lock; they must not call back into the store.
#[derive(Clone, Default)]
pub(crate) struct EventBus {
    inner: Arc<Mutex<BusInner>>,
}

#[derive(Default)]
struct BusInner {
    next_id: SubscriptionId,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

impl EventBus {
    fn subscribe(&self, callback: Subscriber) -> SubscriptionId {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.subscribers.push((id, callback));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().subscribers.retain(|(sid, _)| *sid != id);
    }

    pub(crate) fn emit(&self, event: &SessionEvent) {
        let subscribers: Vec<Subscriber> = self
            .lock()
            .subscribers
            .iter()
            .map(|(_, s)| Arc::clone(s))
            .collect();
        for subscriber in subscribers {
            subscriber(event);
        }
    }

    fn lock(&self) -> MutexGuard<'_, BusInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

struct Inner {
    session: Option<Session>,
    /// Last celebrated progress threshold.
    celebrated: u8,
    generator: SessionIdGenerator,
}

pub struct SessionStore {
    inner: Mutex<Inner>,
    bus: EventBus,
    writer: DebouncedWriter,
    repo: Arc<SessionRepository>,
}

impl SessionStore {
    /// Must be constructed inside a Tokio runtime; write-through timers
    /// spawn on the ambient handle.
    pub fn new(repo: Arc<SessionRepository>, config: StoreConfig) -> Self {
        let bus = EventBus::default();
        Self {
            writer: DebouncedWriter::new(Arc::clone(&repo), bus.clone(), config.debounce),
            inner: Mutex::new(Inner {
                session: None,
                celebrated: 0,
                generator: SessionIdGenerator::new(),
            }),
            bus,
            repo,
        }
    }

    /// Seed the identifier generator, e.g. with the repository's index or
    /// a remote known-identifiers list.
    pub fn register_known_ids(&self, ids: impl IntoIterator<Item = SessionId>) {
        self.lock().generator.register_known_ids(ids);
    }

    pub fn subscribe(
        &self,
        callback: impl Fn(&SessionEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe(Arc::new(callback))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.bus.unsubscribe(id);
    }

    /// Read-only snapshot of the active session, the handoff the
    /// submission pipeline consumes.
    pub fn snapshot(&self) -> Option<Session> {
        self.lock().session.clone()
    }

    /// Create the session (minting an identifier) or amend the clinician
    /// details of the active draft. Required fields are validated before
    /// any state changes; the session identifier never changes on amend.
    pub fn set_clinician_info(&self, info: ClinicianInfo) -> Result<SessionId, StoreError> {
        if let Some(field) = info.missing_required_field() {
            return Err(StoreError::Validation(field));
        }

        let mut inner = self.lock();
        if let Some(session) = &inner.session
            && session.is_submitted()
        {
            let id = session.session_id.clone();
            drop(inner);
            warn!(session_id = %id, "clinician info change ignored on submitted session");
            self.bus.emit(&SessionEvent::MutationIgnored {
                operation: "set_clinician_info",
            });
            return Ok(id);
        }

        let snapshot = match &mut inner.session {
            Some(session) => {
                session.clinician = info;
                session.last_updated = jiff::Timestamp::now();
                session.clone()
            }
            None => {
                let id = inner
                    .generator
                    .generate(&info.clinician_name, &info.child_name)?;
                let mut session = Session::new(id, info);
                // New sessions start from the unplaced milestone catalog.
                let milestones = serde_json::to_value(atria_progress::catalog::starter_section())
                    .map_err(StorageError::from)?;
                session.sections.insert(ModuleKey::Milestones, milestones);
                session.progress = atria_progress::compute_progress(&session);
                inner.celebrated = 0;
                inner.session = Some(session.clone());
                session
            }
        };
        drop(inner);

        let id = snapshot.session_id.clone();
        info!(session_id = %id, "clinician info set");
        self.bus.emit(&SessionEvent::Updated {
            session: snapshot.clone(),
        });
        self.writer.schedule(snapshot);
        Ok(id)
    }

    /// Shallow-merge a partial payload into one module's section: top-level
    /// object keys are replaced wholesale (the caller owns which nested
    /// fields to replace), a non-object patch replaces the whole section.
    /// Recomputes progress and notifies subscribers exactly once per call.
    pub fn update_section(
        &self,
        key: ModuleKey,
        patch: serde_json::Value,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let Some(session) = &mut inner.session else {
            return Err(StoreError::NoActiveSession);
        };
        if session.is_submitted() {
            drop(inner);
            warn!(module = key.as_str(), "section update ignored on submitted session");
            self.bus.emit(&SessionEvent::MutationIgnored {
                operation: "update_section",
            });
            return Ok(());
        }

        let target = session
            .sections
            .entry(key)
            .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
        shallow_merge(target, patch);
        session.progress = atria_progress::compute_progress(session);
        session.last_updated = jiff::Timestamp::now();

        let overall = session.progress.overall;
        let snapshot = session.clone();
        let crossed = atria_progress::crossed_thresholds(inner.celebrated, overall);
        if let Some(&top) = crossed.last() {
            inner.celebrated = top;
        }
        drop(inner);

        self.bus.emit(&SessionEvent::Updated {
            session: snapshot.clone(),
        });
        for threshold in crossed {
            self.bus.emit(&SessionEvent::ThresholdCrossed { threshold });
        }
        self.writer.schedule(snapshot);
        Ok(())
    }

    /// Transition to `submitted`, freezing all further mutation. The final
    /// state is flushed immediately rather than debounced.
    pub fn mark_submitted(&self) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let Some(session) = &mut inner.session else {
            return Err(StoreError::NoActiveSession);
        };
        if session.is_submitted() {
            return Ok(());
        }
        session.status = SessionStatus::Submitted;
        session.last_updated = jiff::Timestamp::now();
        let snapshot = session.clone();
        drop(inner);

        info!(session_id = %snapshot.session_id, "session submitted");
        self.bus.emit(&SessionEvent::Updated {
            session: snapshot.clone(),
        });
        self.writer.flush(&snapshot);
        Ok(())
    }

    /// Reset to the empty state. Any pending write-through is cancelled
    /// first so a late timer cannot resurrect the record, then the
    /// persisted record is removed. Idempotent: a second call finds no
    /// active session and removes nothing.
    pub fn clear(&self) {
        self.writer.cancel();
        let removed = {
            let mut inner = self.lock();
            inner.celebrated = 0;
            inner.session.take()
        };

        if let Some(session) = removed {
            if let Err(e) = self.repo.remove(&session.session_id) {
                warn!(session_id = %session.session_id, error = %e, "failed to remove persisted session");
                self.bus.emit(&SessionEvent::PersistFailed {
                    message: e.to_string(),
                });
            }
            info!(session_id = %session.session_id, "session cleared");
            self.bus.emit(&SessionEvent::Cleared);
        }
    }

    /// Install a loaded session as the active one (draft recovery).
    /// Progress is recomputed and the celebration watermark seeded from it,
    /// so thresholds fire at most once per session across resumes.
    pub fn adopt(&self, mut session: Session) {
        session.progress = atria_progress::compute_progress(&session);
        self.writer.cancel();

        let snapshot = {
            let mut inner = self.lock();
            inner.celebrated = atria_progress::watermark_for(session.progress.overall);
            inner
                .generator
                .register_known_ids([session.session_id.clone()]);
            inner.session = Some(session.clone());
            session
        };

        info!(session_id = %snapshot.session_id, "session adopted");
        self.bus.emit(&SessionEvent::Updated { session: snapshot });
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn shallow_merge(target: &mut serde_json::Value, patch: serde_json::Value) {
    if let serde_json::Value::Object(fields) = patch {
        if let serde_json::Value::Object(existing) = target {
            for (k, v) in fields {
                existing.insert(k, v);
            }
            return;
        }
        *target = serde_json::Value::Object(fields);
    } else {
        *target = patch;
    }
}
