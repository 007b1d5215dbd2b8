use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::clinician::ClinicianInfo;
use super::progress::ProgressReport;
use super::section::ModuleKey;
use super::session_id::SessionId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SessionStatus {
    #[default]
    Draft,
    Submitted,
}

/// One clinician's assessment session: the aggregate root. The persisted
/// record shape is exactly the serialized fields below minus `progress`,
/// which is skipped and recomputed on load.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Session {
    pub session_id: SessionId,
    pub clinician: ClinicianInfo,
    #[serde(default)]
    pub sections: BTreeMap<ModuleKey, serde_json::Value>,
    pub status: SessionStatus,
    pub last_updated: jiff::Timestamp,
    #[serde(skip)]
    #[ts(skip)]
    pub progress: ProgressReport,
}

impl Session {
    pub fn new(session_id: SessionId, clinician: ClinicianInfo) -> Self {
        Self {
            session_id,
            clinician,
            sections: BTreeMap::new(),
            status: SessionStatus::Draft,
            last_updated: jiff::Timestamp::now(),
            progress: ProgressReport::default(),
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.status == SessionStatus::Submitted
    }

    pub fn section(&self, key: ModuleKey) -> Option<&serde_json::Value> {
        self.sections.get(&key)
    }
}
