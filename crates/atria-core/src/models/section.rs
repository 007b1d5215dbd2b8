use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::milestone::Milestone;

/// The six independently-edited assessment modules of a session. Section
/// payloads are stored opaquely; these keys name them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ModuleKey {
    SensoryProfile,
    SocialCommunication,
    BehaviorInterests,
    Milestones,
    AssessmentLog,
    Narrative,
}

impl ModuleKey {
    pub const ALL: [ModuleKey; 6] = [
        ModuleKey::SensoryProfile,
        ModuleKey::SocialCommunication,
        ModuleKey::BehaviorInterests,
        ModuleKey::Milestones,
        ModuleKey::AssessmentLog,
        ModuleKey::Narrative,
    ];

    /// The five modules that carry completion weight of their own (the
    /// narrative section is scored field-by-field instead).
    pub const ASSESSMENT_MODULES: [ModuleKey; 5] = [
        ModuleKey::SensoryProfile,
        ModuleKey::SocialCommunication,
        ModuleKey::BehaviorInterests,
        ModuleKey::Milestones,
        ModuleKey::AssessmentLog,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKey::SensoryProfile => "sensory_profile",
            ModuleKey::SocialCommunication => "social_communication",
            ModuleKey::BehaviorInterests => "behavior_interests",
            ModuleKey::Milestones => "milestones",
            ModuleKey::AssessmentLog => "assessment_log",
            ModuleKey::Narrative => "narrative",
        }
    }
}

/// Diagnostic status dropdowns. `NotSpecified` is the untouched sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DiagnosticStatus {
    #[default]
    NotSpecified,
    Suspected,
    Confirmed,
    RuledOut,
}

/// Typed view of the free-text/status section. Every field defaults so a
/// partial payload written by one sub-form still parses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct NarrativeSection {
    pub clinical_observations: String,
    pub strengths: String,
    pub priority_areas: String,
    pub recommendations: String,
    pub asc_status: DiagnosticStatus,
    pub adhd_status: DiagnosticStatus,
    pub referrals: BTreeMap<String, bool>,
}

/// Typed view of a domain-rating module. Sub-forms record only ratings the
/// user has changed, so any entry is a non-default data point.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct RatingSection {
    pub ratings: BTreeMap<String, f64>,
}

/// Typed view of the milestone-timeline module.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct MilestoneSection {
    pub milestones: Vec<Milestone>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LogEntry {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub date: Option<jiff::civil::Date>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Typed view of the assessment-log module.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct LogSection {
    pub entries: Vec<LogEntry>,
}
