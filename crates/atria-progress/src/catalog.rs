//! Fixed developmental-milestone catalog.
//!
//! Every new session starts from these entries, unplaced. Clinicians place
//! them on the timeline (assigning an actual age) and may add custom
//! entries, which carry uuid ids instead of catalog slugs.

use std::sync::LazyLock;

use atria_core::models::milestone::{Milestone, MilestoneCategory};
use atria_core::models::section::MilestoneSection;

pub fn entries() -> &'static [Milestone] {
    static CATALOG: LazyLock<Vec<Milestone>> = LazyLock::new(|| {
        use MilestoneCategory::*;

        let items = [
            ("social_smile", "Social smile", Social, 2),
            ("babbling", "Babbling", Communication, 6),
            ("sits_without_support", "Sits without support", Motor, 6),
            ("responds_to_name", "Responds to name", Social, 7),
            ("crawls", "Crawls", Motor, 9),
            ("joint_attention", "Joint attention (follows a point)", Social, 9),
            ("first_words", "First words", Communication, 12),
            ("waves_bye", "Waves bye-bye", Social, 12),
            ("walks_independently", "Walks independently", Motor, 13),
            ("points_to_request", "Points to request or show", Communication, 14),
            ("pretend_play", "Simple pretend play", Social, 18),
            ("two_word_phrases", "Two-word phrases", Communication, 24),
            ("kicks_ball", "Kicks a ball", Motor, 24),
            ("limited_eye_contact", "Limited eye contact", Concerns, 6),
            ("repetitive_movements", "Repetitive movements", Concerns, 12),
            (
                "loss_of_skills",
                "Loss of previously acquired skills",
                Concerns,
                18,
            ),
        ];

        items
            .iter()
            .map(|(id, title, category, months)| Milestone {
                id: (*id).to_string(),
                title: (*title).to_string(),
                category: *category,
                expected_age_months: *months,
                actual_age_months: None,
            })
            .collect()
    });
    &CATALOG
}

/// The milestone section a fresh session starts from: the full catalog,
/// nothing placed.
pub fn starter_section() -> MilestoneSection {
    MilestoneSection {
        milestones: entries().to_vec(),
    }
}
