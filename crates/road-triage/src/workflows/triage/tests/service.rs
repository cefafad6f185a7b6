use super::common::*;
use crate::workflows::triage::allocation::{AllocationConstraints, AllocationError};
use crate::workflows::triage::domain::DefectViolation;
use crate::workflows::triage::money::Money;
use crate::workflows::triage::scoring::{InvalidConfig, ScoringWeights};
use crate::workflows::triage::service::{AllocationRequest, TriageError, TriageService};
use std::sync::Arc;

#[test]
fn recommend_funds_in_rank_order_and_reports_partial_award() {
    let service = build_service(oxford_records());
    let report = service
        .recommend(AllocationRequest::new(5000.0))
        .expect("allocation succeeds");

    let ids: Vec<&str> = report
        .recommendation
        .funded
        .iter()
        .map(|item| item.defect_id.0.as_str())
        .collect();
    assert_eq!(ids, vec!["1", "2", "5"]);
    assert_eq!(report.recommendation.funded[2].amount, Money::from_major(1300));
    assert!(report.recommendation.funded[2].partial);
    assert_eq!(report.recommendation.summary.budget_remaining, Money::ZERO);
    assert!(report.rejected.is_empty());
}

#[test]
fn recommend_skips_malformed_records_and_reports_them() {
    let mut records = oxford_records();
    records.push(record("bad", "Critical", 40, "High", 100.0));
    records.push(record("1", "Low", 90, "Low", 10.0));
    let service = build_service(records);

    let report = service
        .recommend(AllocationRequest::new(10_000.0))
        .expect("allocation succeeds");

    assert_eq!(report.recommendation.summary.funded_count, 3);
    assert_eq!(report.rejected.len(), 2);
    assert!(matches!(
        report.rejected[0].violation,
        DefectViolation::UnknownSeverity { .. }
    ));
    assert_eq!(report.rejected[1].defect_id, "1");
    assert_eq!(
        report.rejected[1].violation,
        DefectViolation::DuplicateIdentifier
    );
}

#[test]
fn recommend_rejects_bad_budget_before_touching_records() {
    let service = build_service(vec![record("bad", "Critical", 40, "High", 100.0)]);
    match service.recommend(AllocationRequest::new(-10.0)) {
        Err(TriageError::Allocation(AllocationError::InvalidBudget { .. })) => {}
        other => panic!("expected invalid budget, got {other:?}"),
    }
}

#[test]
fn recommend_applies_request_weights_and_rejects_bad_ones() {
    let service = build_service(oxford_records());

    let mut request = AllocationRequest::new(1000.0);
    request.weights = Some(ScoringWeights {
        severity: 0.9,
        ..ScoringWeights::default()
    });
    match service.recommend(request) {
        Err(TriageError::InvalidConfig(InvalidConfig::WeightSum { .. })) => {}
        other => panic!("expected weight sum error, got {other:?}"),
    }

    let mut request = AllocationRequest::new(1300.0);
    request.weights = Some(ScoringWeights::new(0.0, 1.0, 0.0, 0.0).expect("valid weights"));
    let report = service.recommend(request).expect("allocation succeeds");
    assert_eq!(report.recommendation.funded[0].defect_id.0, "1");
    assert_eq!(report.recommendation.funded[0].priority_score, 65);
}

#[test]
fn recommend_honors_bounds_and_constraints() {
    let service = build_service(oxford_records());
    let mut request = AllocationRequest::new(10_000.0);
    request.bounds = Some(oxford_bounds());
    request.constraints = Some(AllocationConstraints {
        maximum_projects: Some(1),
        ..AllocationConstraints::default()
    });

    let report = service.recommend(request).expect("allocation succeeds");
    assert_eq!(report.recommendation.summary.funded_count, 1);
    assert_eq!(report.recommendation.summary.deferred_count, 1);
    assert_eq!(
        report.recommendation.summary.total_requested,
        Money::from_major(3700)
    );
}

#[test]
fn defects_lists_ranked_defects_within_bounds() {
    let service = build_service(oxford_records());
    let listing = service
        .defects(Some(oxford_bounds()))
        .expect("listing succeeds");
    let ids: Vec<&str> = listing
        .defects
        .iter()
        .map(|scored| scored.defect.id.0.as_str())
        .collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[test]
fn defect_lookup_scores_or_reports_missing() {
    let service = build_service(oxford_records());
    let scored = service.defect(" 2 ").expect("defect exists");
    assert_eq!(scored.score.value, 70);

    match service.defect("404") {
        Err(TriageError::NotFound(id)) => assert_eq!(id.0, "404"),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn unavailable_source_surfaces_as_source_error() {
    let service = TriageService::new(Arc::new(UnavailableSource), ScoringWeights::default())
        .expect("default weights are valid");
    assert!(matches!(
        service.recommend(AllocationRequest::new(100.0)),
        Err(TriageError::Source(_))
    ));
    assert!(matches!(service.analytics(), Err(TriageError::Source(_))));
}

#[test]
fn analytics_excludes_rejected_records() {
    let mut records = oxford_records();
    records.push(record("bad", "High", 140, "High", 100.0));
    let service = build_service(records);
    let analytics = service.analytics().expect("analytics succeeds");
    assert_eq!(analytics.total_defects, 3);
}

#[test]
fn bounded_requests_still_report_unplaceable_records() {
    let records = vec![
        high_street(),
        located(record("lost", "High", 40, "High", 100.0), f64::NAN, -1.25),
    ];
    let service = build_service(records);

    let mut request = AllocationRequest::new(5000.0);
    request.bounds = Some(oxford_bounds());
    let report = service.recommend(request).expect("allocation succeeds");

    assert_eq!(report.recommendation.summary.funded_count, 1);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].defect_id, "lost");
    assert!(matches!(
        report.rejected[0].violation,
        DefectViolation::InvalidLocation { .. }
    ));

    let listing = service
        .defects(Some(oxford_bounds()))
        .expect("listing succeeds");
    assert_eq!(listing.rejected.len(), 1);
}
