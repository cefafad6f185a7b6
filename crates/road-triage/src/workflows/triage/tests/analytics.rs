use super::common::*;
use crate::workflows::triage::analytics::{summarize, AnalyticsOptions};
use crate::workflows::triage::money::Money;

#[test]
fn summarizes_counts_costs_and_hotspots() {
    let defects: Vec<_> = oxford_records().into_iter().map(scored).collect();
    let analytics = summarize(&defects, &AnalyticsOptions::default());

    assert_eq!(analytics.total_defects, 3);
    assert_eq!(analytics.critical_count, 2);
    assert_eq!(analytics.average_repair_cost, Money::from_cents(216_667));

    let worst = &analytics.worst_affected_areas[0];
    assert_eq!(worst.defect_count, 2);
    assert_eq!(worst.score_density, 159);
    assert!((worst.severity - 79.5).abs() < 1e-9);
    assert!((worst.location.lat - 51.75125).abs() < 1e-9);

    assert_eq!(analytics.worst_affected_areas.len(), 2);
    assert_eq!(analytics.worst_affected_areas[1].score_density, 69);
}

#[test]
fn limits_hotspots_to_the_requested_count() {
    let defects: Vec<_> = oxford_records().into_iter().map(scored).collect();
    let options = AnalyticsOptions {
        top_locations: 1,
        ..AnalyticsOptions::default()
    };
    assert_eq!(summarize(&defects, &options).worst_affected_areas.len(), 1);
}

#[test]
fn empty_input_yields_zeroes() {
    let analytics = summarize(&[], &AnalyticsOptions::default());
    assert_eq!(analytics.total_defects, 0);
    assert_eq!(analytics.average_repair_cost, Money::ZERO);
    assert!(analytics.worst_affected_areas.is_empty());
}
