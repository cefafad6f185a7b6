use super::common::*;
use crate::workflows::triage::allocation::{allocate, AllocationConstraints, DeferralReason};
use crate::workflows::triage::money::Money;
use crate::workflows::triage::report::assemble;

#[test]
fn funded_recommendation_carries_score_trail_and_action() {
    let result = allocate(
        &[scored(high_street())],
        5000.0,
        &AllocationConstraints::default(),
    )
    .expect("allocation succeeds");
    let recommendation = assemble(&result);

    let item = &recommendation.funded[0];
    assert_eq!(item.rank, 1);
    assert_eq!(item.priority_score, 89);
    assert_eq!(item.factors.len(), 4);
    assert!(!item.partial);
    assert_eq!(
        item.recommended_action,
        "Immediate repair required at High Street in a high-traffic area, 0.1 km from University."
    );
    assert_eq!(recommendation.summary.total_allocated, Money::from_major(2500));
    assert_eq!(recommendation.summary.budget_remaining, Money::from_major(2500));
}

#[test]
fn partial_awards_are_flagged_and_explained() {
    let result = allocate(
        &[
            scored(record("a", "High", 10, "High", 1000.0)),
            scored(record("b", "Medium", 50, "Medium", 1000.0)),
        ],
        1500.0,
        &AllocationConstraints::default(),
    )
    .expect("allocation succeeds");
    let recommendation = assemble(&result);

    let partial = &recommendation.funded[1];
    assert!(partial.partial);
    assert_eq!(partial.amount, Money::from_major(500));
    assert!(partial
        .recommended_action
        .ends_with("partially funded (500.00 of 1000.00), start a first-phase repair."));
}

#[test]
fn deferred_groups_follow_first_appearance_and_rank_order() {
    let constraints = AllocationConstraints {
        target_condition_score: Some(50),
        ..AllocationConstraints::default()
    };
    let result = allocate(
        &[
            scored(record("w", "Low", 20, "Low", 400.0)),
            scored(record("x", "Medium", 60, "High", 100.0)),
            scored(record("y", "High", 10, "High", 10_000.0)),
            scored(record("z", "Medium", 70, "Low", 100.0)),
        ],
        1000.0,
        &constraints,
    )
    .expect("allocation succeeds");
    let recommendation = assemble(&result);

    let reasons: Vec<DeferralReason> = recommendation
        .deferred
        .iter()
        .map(|group| group.reason)
        .collect();
    assert_eq!(
        reasons,
        vec![
            DeferralReason::ConditionAboveTarget,
            DeferralReason::InsufficientRemainingBudget,
        ]
    );

    let above_target: Vec<usize> = recommendation
        .deferred_for(DeferralReason::ConditionAboveTarget)
        .iter()
        .map(|entry| entry.rank)
        .collect();
    assert_eq!(above_target, vec![2, 4]);
    assert!(recommendation
        .deferred_for(DeferralReason::ProjectCapReached)
        .is_empty());

    assert_eq!(recommendation.summary.funded_count, 1);
    assert_eq!(recommendation.summary.deferred_count, 3);
    assert_eq!(recommendation.summary.total_requested, Money::from_major(10_600));
}

#[test]
fn deferral_reasons_serialize_as_labels() {
    let value = serde_json::to_value(DeferralReason::InsufficientRemainingBudget)
        .expect("serializes");
    assert_eq!(value, serde_json::json!("insufficient remaining budget"));
}
