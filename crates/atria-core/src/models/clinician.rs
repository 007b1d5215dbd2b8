use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Clinician and subject details captured at session creation. May be
/// amended while a session is active, but the required fields can never be
/// cleared (amendments are validated the same way as creation).
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClinicianInfo {
    pub clinician_name: String,
    pub clinician_email: String,
    pub clinic_name: String,
    #[serde(default)]
    pub child_name: String,
    #[serde(default)]
    pub child_age_months: Option<u32>,
    #[serde(default)]
    pub child_gender: Option<String>,
}

impl ClinicianInfo {
    /// The first required field that is blank after trimming, if any.
    pub fn missing_required_field(&self) -> Option<&'static str> {
        if self.clinician_name.trim().is_empty() {
            Some("clinician_name")
        } else if self.clinician_email.trim().is_empty() {
            Some("clinician_email")
        } else if self.clinic_name.trim().is_empty() {
            Some("clinic_name")
        } else {
            None
        }
    }
}
