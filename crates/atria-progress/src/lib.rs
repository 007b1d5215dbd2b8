//! atria-progress
//!
//! Completion scoring and the developmental-milestone catalog. Pure
//! functions over session contents — no I/O, no stored totals. Scores are
//! computed on demand from the current sections so partial or duplicate
//! updates can never make the aggregate drift.

pub mod catalog;

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

use atria_core::models::progress::ProgressReport;
use atria_core::models::section::{
    DiagnosticStatus, LogSection, MilestoneSection, ModuleKey, NarrativeSection, RatingSection,
};
use atria_core::models::session::Session;

/// Each narrative free-text field contributes this when non-blank.
pub const TEXT_FIELD_WEIGHT: f64 = 10.0;
/// Each diagnostic status contributes this when moved off `not_specified`.
pub const STATUS_FIELD_WEIGHT: f64 = 2.5;
/// Contributed once when at least one referral flag is set.
pub const REFERRAL_WEIGHT: f64 = 5.0;
/// Each of the five assessment modules contributes this when touched.
pub const MODULE_WEIGHT: f64 = 10.0;

/// Celebration thresholds, fired at most once each per session.
pub const THRESHOLDS: [u8; 4] = [25, 50, 75, 100];

/// Compute the aggregate completion score for a session.
///
/// The weighting model is a fixed product requirement: four narrative text
/// fields at 10 points each, two diagnostic statuses at 2.5 each, 5 for any
/// referral, and 10 per touched assessment module. The weights sum to
/// exactly 100; the result is clamped defensively anyway.
pub fn compute_progress(session: &Session) -> ProgressReport {
    let narrative: NarrativeSection = view(session, ModuleKey::Narrative);

    let texts = [
        &narrative.clinical_observations,
        &narrative.strengths,
        &narrative.priority_areas,
        &narrative.recommendations,
    ];
    let filled_texts = texts.iter().filter(|t| !t.trim().is_empty()).count();

    let set_statuses = [narrative.asc_status, narrative.adhd_status]
        .iter()
        .filter(|s| **s != DiagnosticStatus::NotSpecified)
        .count();

    let referred = narrative.referrals.values().any(|set| *set);

    let mut overall = filled_texts as f64 * TEXT_FIELD_WEIGHT
        + set_statuses as f64 * STATUS_FIELD_WEIGHT
        + if referred { REFERRAL_WEIGHT } else { 0.0 };

    let mut per_module = BTreeMap::new();

    // Narrative sub-score: share of its seven checkpoints (4 texts, 2
    // statuses, referral).
    let checkpoints = filled_texts + set_statuses + usize::from(referred);
    per_module.insert(ModuleKey::Narrative, checkpoints as f64 / 7.0 * 100.0);

    for key in ModuleKey::ASSESSMENT_MODULES {
        let sub = module_subscore(session, key);
        if sub > 0.0 {
            overall += MODULE_WEIGHT;
        }
        per_module.insert(key, sub);
    }

    ProgressReport {
        overall: overall.clamp(0.0, 100.0),
        per_module,
    }
}

/// 0–100 sub-score for one assessment module. A module is touched once it
/// holds at least one non-default data point; the milestone timeline also
/// grades by fraction placed.
fn module_subscore(session: &Session, key: ModuleKey) -> f64 {
    match key {
        ModuleKey::Milestones => {
            let section: MilestoneSection = view(session, key);
            if section.milestones.is_empty() {
                return 0.0;
            }
            let placed = section.milestones.iter().filter(|m| m.placed()).count();
            placed as f64 / section.milestones.len() as f64 * 100.0
        }
        ModuleKey::AssessmentLog => {
            let section: LogSection = view(session, key);
            if section.entries.is_empty() { 0.0 } else { 100.0 }
        }
        ModuleKey::Narrative => 0.0,
        _ => {
            let section: RatingSection = view(session, key);
            if section.ratings.is_empty() { 0.0 } else { 100.0 }
        }
    }
}

/// Thresholds newly crossed when progress reaches `overall`, given the last
/// celebrated watermark. Strictly increasing; the caller advances the
/// watermark after signalling.
pub fn crossed_thresholds(watermark: u8, overall: f64) -> Vec<u8> {
    THRESHOLDS
        .iter()
        .copied()
        .filter(|t| *t > watermark && overall >= f64::from(*t))
        .collect()
}

/// The highest threshold at or below `overall`. Used to seed the watermark
/// when a draft is resumed, so thresholds fire at most once per session.
pub fn watermark_for(overall: f64) -> u8 {
    THRESHOLDS
        .iter()
        .copied()
        .filter(|t| overall >= f64::from(*t))
        .max()
        .unwrap_or(0)
}

/// Deserialize a module's typed view. Missing or malformed payloads read as
/// the default view, which scores as untouched.
fn view<T: Default + DeserializeOwned>(session: &Session, key: ModuleKey) -> T {
    session
        .section(key)
        .and_then(|value| serde_json::from_value(value.clone()).ok())
        .unwrap_or_default()
}
