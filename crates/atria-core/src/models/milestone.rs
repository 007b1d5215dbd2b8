use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MilestoneCategory {
    Communication,
    Motor,
    Social,
    Concerns,
}

/// Derived from the gap between expected and actual age at placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MilestoneStatus {
    OnTrack,
    EmergingConcern,
    Delayed,
}

/// One entry on the developmental timeline. Catalog entries carry slug ids;
/// user-added custom entries carry uuid strings. Milestones are mutated by
/// placement (assigning an actual age) or deletion, never automatically.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub category: MilestoneCategory,
    pub expected_age_months: u32,
    #[serde(default)]
    pub actual_age_months: Option<u32>,
}

impl Milestone {
    /// A milestone is placed once the clinician has assigned an actual age.
    pub fn placed(&self) -> bool {
        self.actual_age_months.is_some()
    }

    /// Status bands: at or before the expected age is on track, up to three
    /// months late is an emerging concern, anything later is delayed.
    pub fn status(&self) -> Option<MilestoneStatus> {
        let actual = self.actual_age_months?;
        Some(if actual <= self.expected_age_months {
            MilestoneStatus::OnTrack
        } else if actual - self.expected_age_months <= 3 {
            MilestoneStatus::EmergingConcern
        } else {
            MilestoneStatus::Delayed
        })
    }
}
