//! Debounced write-through.
//!
//! Every scheduled save captures a snapshot and a fresh sequence number; a
//! timer task writes only if its sequence is still current at execution
//! time. Stale tasks (superseded by a later mutation or a cancel) drop
//! without writing, which both coalesces bursts into a single trailing
//! write and keeps writes in logical order regardless of completion order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::warn;

use atria_core::models::session::Session;

use crate::repository::SessionRepository;
use crate::state::{EventBus, SessionEvent};

pub(crate) struct DebouncedWriter {
    repo: Arc<SessionRepository>,
    bus: EventBus,
    delay: Duration,
    seq: Arc<AtomicU64>,
    handle: Handle,
}

impl DebouncedWriter {
    /// Captures the ambient Tokio runtime handle; must be constructed
    /// inside a runtime.
    pub(crate) fn new(repo: Arc<SessionRepository>, bus: EventBus, delay: Duration) -> Self {
        Self {
            repo,
            bus,
            delay,
            seq: Arc::new(AtomicU64::new(0)),
            handle: Handle::current(),
        }
    }

    /// Schedule a trailing write of this snapshot. Any pending write is
    /// superseded; after a burst, exactly the latest state lands.
    pub(crate) fn schedule(&self, session: Session) {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.seq);
        let repo = Arc::clone(&self.repo);
        let bus = self.bus.clone();
        let delay = self.delay;

        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if current.load(Ordering::SeqCst) != seq {
                return;
            }
            persist(&repo, &bus, &session);
        });
    }

    /// Write immediately, superseding any pending task. Used for terminal
    /// transitions that should not sit out a debounce window.
    pub(crate) fn flush(&self, session: &Session) {
        self.seq.fetch_add(1, Ordering::SeqCst);
        persist(&self.repo, &self.bus, session);
    }

    /// Invalidate any pending write so a late timer cannot resurrect
    /// cleared data.
    pub(crate) fn cancel(&self) {
        self.seq.fetch_add(1, Ordering::SeqCst);
    }
}

fn persist(repo: &SessionRepository, bus: &EventBus, session: &Session) {
    if let Err(e) = repo.save(session) {
        warn!(session_id = %session.session_id, error = %e, "write-through failed");
        bus.emit(&SessionEvent::PersistFailed {
            message: e.to_string(),
        });
    }
}
