use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;

use atria_core::models::clinician::ClinicianInfo;
use atria_core::models::section::ModuleKey;
use atria_core::models::session::Session;
use atria_core::models::session_id::SessionId;
use atria_session::error::RecoveryError;
use atria_session::recovery::{IntakeOutcome, RecoveryFlow, RecoveryState};
use atria_session::repository::SessionRepository;
use atria_session::state::{SessionEvent, SessionStore, StoreConfig};
use atria_session::store::MemoryStore;

fn clinician(email: &str) -> ClinicianInfo {
    ClinicianInfo {
        clinician_name: "Dana Reyes".to_string(),
        clinician_email: email.to_string(),
        clinic_name: "Harbour Clinic".to_string(),
        child_name: "Sam".to_string(),
        ..ClinicianInfo::default()
    }
}

fn engine() -> (Arc<SessionRepository>, Arc<SessionStore>, RecoveryFlow) {
    let repo = Arc::new(SessionRepository::new(Arc::new(MemoryStore::new())));
    let store = Arc::new(SessionStore::new(
        Arc::clone(&repo),
        StoreConfig {
            debounce: Duration::from_millis(250),
        },
    ));
    store.register_known_ids(repo.known_ids().unwrap());
    let flow = RecoveryFlow::new(Arc::clone(&repo), Arc::clone(&store));
    (repo, store, flow)
}

fn seed_draft(repo: &SessionRepository, id: &str, email: &str) -> SessionId {
    let session_id = SessionId::parse(id).unwrap();
    let mut session = Session::new(session_id.clone(), clinician(email));
    session.sections.insert(
        ModuleKey::Narrative,
        json!({
            "clinical_observations": "Engaged throughout.",
            "strengths": "Visual memory.",
            "priority_areas": "Expressive language.",
            "recommendations": "SLT referral.",
        }),
    );
    session.sections.insert(
        ModuleKey::SensoryProfile,
        json!({ "ratings": { "auditory": 4.0 } }),
    );
    repo.save(&session).unwrap();
    session_id
}

#[tokio::test]
async fn fresh_clinician_starts_a_new_session() {
    let (_, store, mut flow) = engine();
    flow.begin();
    assert_eq!(flow.state(), RecoveryState::AwaitingClinicianInfo);

    let outcome = flow
        .submit_clinician_info(clinician("dana@clinic.example"))
        .unwrap();
    let IntakeOutcome::Started { session_id } = outcome else {
        panic!("expected a new session");
    };
    assert_eq!(flow.state(), RecoveryState::DraftActive);
    assert_eq!(store.snapshot().unwrap().session_id, session_id);
}

#[tokio::test]
async fn existing_draft_defers_the_resume_choice() {
    let (repo, store, mut flow) = engine();
    let existing = seed_draft(&repo, "DAN-SAM-500", "dana@clinic.example");

    flow.begin();
    let outcome = flow
        .submit_clinician_info(clinician("dana@clinic.example"))
        .unwrap();
    let IntakeOutcome::ExistingDraft {
        session_id,
        overall_progress,
        ..
    } = outcome
    else {
        panic!("expected the existing draft to surface");
    };
    assert_eq!(session_id, existing);
    assert_eq!(overall_progress, 50.0);
    // The choice is still pending; nothing is active yet.
    assert!(store.snapshot().is_none());

    let resumed = flow.resume_existing().unwrap();
    assert_eq!(resumed, existing);
    assert_eq!(flow.state(), RecoveryState::DraftActive);
    assert_eq!(store.snapshot().unwrap().session_id, existing);
    assert_eq!(store.snapshot().unwrap().progress.overall, 50.0);
}

#[tokio::test]
async fn starting_new_orphans_the_old_draft() {
    let (repo, store, mut flow) = engine();
    let existing = seed_draft(&repo, "DAN-SAM-500", "dana@clinic.example");
    store.register_known_ids(repo.known_ids().unwrap());

    flow.begin();
    flow.submit_clinician_info(clinician("dana@clinic.example"))
        .unwrap();
    let fresh = flow.start_new().unwrap();

    assert_ne!(fresh, existing);
    assert_eq!(store.snapshot().unwrap().session_id, fresh);
    // Orphaned, not deleted.
    assert!(repo.load(&existing).unwrap().is_some());
}

#[tokio::test]
async fn resume_decision_without_a_pending_draft_errors() {
    let (_, _, mut flow) = engine();
    assert!(matches!(
        flow.resume_existing(),
        Err(RecoveryError::NoPendingDraft)
    ));
    assert!(matches!(flow.start_new(), Err(RecoveryError::NoPendingDraft)));
}

#[tokio::test]
async fn malformed_identifier_is_rejected_before_lookup() {
    let (_, store, mut flow) = engine();
    let err = flow.enter_session_id("not-an-id").unwrap_err();
    assert!(matches!(err, RecoveryError::InvalidIdentifier(_)));
    assert!(store.snapshot().is_none());
    assert_eq!(flow.state(), RecoveryState::NoSession);
}

#[tokio::test]
async fn well_formed_but_unknown_identifier_is_not_found() {
    let (_, store, mut flow) = engine();
    let err = flow.enter_session_id("ABC-DEF-123").unwrap_err();
    assert!(matches!(err, RecoveryError::NotFound(_)));
    assert!(store.snapshot().is_none());
    assert_eq!(flow.state(), RecoveryState::NoSession);
}

#[tokio::test]
async fn entering_a_known_identifier_resumes_the_draft() {
    let (repo, store, mut flow) = engine();
    let existing = seed_draft(&repo, "DAN-SAM-500", "dana@clinic.example");

    let resumed = flow.enter_session_id("dan-sam-500").unwrap();
    assert_eq!(resumed, existing);
    assert_eq!(flow.state(), RecoveryState::DraftActive);
    assert_eq!(store.snapshot().unwrap().session_id, existing);
}

#[tokio::test]
async fn submitted_sessions_resume_as_terminal() {
    let (repo, store, mut flow) = engine();
    seed_draft(&repo, "DAN-SAM-500", "dana@clinic.example");

    flow.enter_session_id("DAN-SAM-500").unwrap();
    flow.mark_submitted().unwrap();
    assert_eq!(flow.state(), RecoveryState::Submitted);

    // Re-entering the same identifier lands in the terminal state and the
    // session stays frozen.
    let mut flow2 = RecoveryFlow::new(Arc::clone(&repo), Arc::clone(&store));
    flow2.enter_session_id("DAN-SAM-500").unwrap();
    assert_eq!(flow2.state(), RecoveryState::Submitted);
    store
        .update_section(ModuleKey::Narrative, json!({ "strengths": "late edit" }))
        .unwrap();
    assert_eq!(
        store.snapshot().unwrap().sections[&ModuleKey::Narrative]["strengths"],
        "Visual memory."
    );
}

#[tokio::test]
async fn resuming_does_not_refire_celebration_thresholds() {
    let (repo, store, mut flow) = engine();
    seed_draft(&repo, "DAN-SAM-500", "dana@clinic.example");

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    store.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

    // The draft sits at 50.0; adopting must not replay 25/50.
    flow.enter_session_id("DAN-SAM-500").unwrap();
    store
        .update_section(
            ModuleKey::Narrative,
            json!({ "asc_status": "confirmed" }),
        )
        .unwrap();

    let crossed: Vec<u8> = events
        .lock()
        .unwrap()
        .iter()
        .filter_map(|e| match e {
            SessionEvent::ThresholdCrossed { threshold } => Some(*threshold),
            _ => None,
        })
        .collect();
    assert!(crossed.is_empty(), "unexpected threshold signals: {crossed:?}");
}

#[tokio::test]
async fn discard_clears_everything_and_restarts_the_flow() {
    let (repo, store, mut flow) = engine();
    flow.begin();
    let IntakeOutcome::Started { session_id } = flow
        .submit_clinician_info(clinician("dana@clinic.example"))
        .unwrap()
    else {
        panic!("expected a new session");
    };

    flow.discard();
    assert_eq!(flow.state(), RecoveryState::NoSession);
    assert!(store.snapshot().is_none());
    assert!(repo.load(&session_id).unwrap().is_none());
}
