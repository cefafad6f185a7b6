use road_triage::workflows::triage::import::parse_defects;
use road_triage::workflows::triage::{
    AllocationConstraints, AnalyticsOptions, DeferralReason, InMemoryDefectSource, Money,
    TriageEngine,
};

fn oxford() -> Vec<road_triage::workflows::triage::DefectRecord> {
    let data = include_bytes!("../data/oxford_defects.csv");
    parse_defects(&data[..]).expect("oxford dataset parses")
}

#[test]
fn dataset_imports_every_row_with_details() {
    let records = oxford();
    assert_eq!(records.len(), 10);

    let banbury = records
        .iter()
        .find(|record| record.id == "5")
        .expect("Banbury Road present");
    assert_eq!(banbury.road_name.as_deref(), Some("Banbury Road"));
    assert_eq!(banbury.critical_infrastructure.len(), 3);
    let breakdown = banbury.cost_breakdown.expect("breakdown present");
    assert_eq!(breakdown.labor_cost, 1200.0);

    let (ranked, rejected) = TriageEngine::default().rank_records(records, false);
    assert!(rejected.is_empty());
    assert_eq!(ranked.len(), 10);
}

#[test]
fn ten_thousand_budget_funds_top_of_the_ranking() {
    let outcome = TriageEngine::default()
        .recommend(oxford(), 10_000.0, &AllocationConstraints::default())
        .expect("allocation succeeds");
    let recommendation = outcome.recommendation;

    let funded: Vec<String> = recommendation
        .funded
        .iter()
        .map(|item| item.defect_id.to_string())
        .collect();
    assert_eq!(funded, vec!["7", "1", "10", "2", "4"]);

    let cowley = &recommendation.funded[4];
    assert!(cowley.partial);
    assert_eq!(cowley.amount, Money::from_major(500));

    let insufficient: Vec<String> = recommendation
        .deferred_for(DeferralReason::InsufficientRemainingBudget)
        .iter()
        .map(|entry| entry.defect_id.to_string())
        .collect();
    assert_eq!(insufficient, vec!["5", "3"]);

    let exhausted: Vec<String> = recommendation
        .deferred_for(DeferralReason::BudgetExhausted)
        .iter()
        .map(|entry| entry.defect_id.to_string())
        .collect();
    assert_eq!(exhausted, vec!["8", "6", "9"]);

    assert_eq!(recommendation.summary.total_allocated, Money::from_major(10_000));
    assert_eq!(recommendation.summary.total_requested, Money::from_major(18_900));
}

#[test]
fn analytics_reports_critical_defects_and_hotspots() {
    let (analytics, rejected) =
        TriageEngine::default().analytics(oxford(), &AnalyticsOptions::default());

    assert!(rejected.is_empty());
    assert_eq!(analytics.total_defects, 10);
    assert_eq!(analytics.critical_count, 5);
    assert_eq!(analytics.average_repair_cost, Money::from_major(1890));
    assert_eq!(analytics.worst_affected_areas.len(), 5);
    assert_eq!(analytics.worst_affected_areas[0].defect_count, 4);
}

#[test]
fn csv_source_reads_from_disk() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/oxford_defects.csv");
    let source = InMemoryDefectSource::from_csv_path(path).expect("dataset loads");
    assert_eq!(source.len(), 10);
}
