pub mod clinician;
pub mod milestone;
pub mod progress;
pub mod section;
pub mod session;
pub mod session_id;
