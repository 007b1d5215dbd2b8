use atria_core::models::milestone::{Milestone, MilestoneCategory, MilestoneStatus};

fn milestone(expected: u32, actual: Option<u32>) -> Milestone {
    Milestone {
        id: "first_words".to_string(),
        title: "First words".to_string(),
        category: MilestoneCategory::Communication,
        expected_age_months: expected,
        actual_age_months: actual,
    }
}

#[test]
fn unplaced_milestone_has_no_status() {
    assert!(!milestone(12, None).placed());
    assert_eq!(milestone(12, None).status(), None);
}

#[test]
fn status_bands_from_expected_actual_gap() {
    assert_eq!(milestone(12, Some(10)).status(), Some(MilestoneStatus::OnTrack));
    assert_eq!(milestone(12, Some(12)).status(), Some(MilestoneStatus::OnTrack));
    assert_eq!(
        milestone(12, Some(15)).status(),
        Some(MilestoneStatus::EmergingConcern)
    );
    assert_eq!(milestone(12, Some(16)).status(), Some(MilestoneStatus::Delayed));
}
