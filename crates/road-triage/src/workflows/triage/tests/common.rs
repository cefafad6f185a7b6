use std::sync::Arc;

use crate::workflows::triage::domain::{
    BoundingBox, DefectRecord, GeoPoint, InfrastructureRecord, RawDistance,
};
use crate::workflows::triage::scoring::{ScoredDefect, ScoringModel, ScoringWeights};
use crate::workflows::triage::service::TriageService;
use crate::workflows::triage::source::{DefectSource, DefectSourceError, InMemoryDefectSource};

pub(super) fn record(
    id: &str,
    severity: &str,
    condition: i64,
    traffic: &str,
    cost: f64,
) -> DefectRecord {
    DefectRecord {
        id: id.to_string(),
        road_name: None,
        postcode: None,
        kind: Some("Pothole".to_string()),
        location: GeoPoint {
            lat: 51.7520,
            lng: -1.2577,
        },
        severity: severity.to_string(),
        condition,
        traffic_volume: traffic.to_string(),
        critical_infrastructure: Vec::new(),
        estimated_repair_cost: cost,
        cost_breakdown: None,
        reported_at: "2024-03-15".to_string(),
    }
}

pub(super) fn near(mut record: DefectRecord, kind: &str, km: f64) -> DefectRecord {
    record.critical_infrastructure.push(InfrastructureRecord {
        kind: kind.to_string(),
        distance: RawDistance::Kilometers(km),
    });
    record
}

pub(super) fn reported(mut record: DefectRecord, reported_at: &str) -> DefectRecord {
    record.reported_at = reported_at.to_string();
    record
}

pub(super) fn located(mut record: DefectRecord, lat: f64, lng: f64) -> DefectRecord {
    record.location = GeoPoint { lat, lng };
    record
}

pub(super) fn on_road(mut record: DefectRecord, road: &str) -> DefectRecord {
    record.road_name = Some(road.to_string());
    record
}

/// Scenario A defect: High severity, condition 35, High traffic, 0.1 km from a university.
pub(super) fn high_street() -> DefectRecord {
    on_road(
        near(record("1", "High", 35, "High", 2500.0), "University", 0.1),
        "High Street",
    )
}

pub(super) fn scored(record: DefectRecord) -> ScoredDefect {
    ScoringModel::default()
        .score_record(record)
        .expect("fixture record is valid")
}

pub(super) fn scored_with(weights: ScoringWeights, record: DefectRecord) -> ScoredDefect {
    ScoringModel::new(weights)
        .expect("fixture weights are valid")
        .score_record(record)
        .expect("fixture record is valid")
}

pub(super) fn oxford_records() -> Vec<DefectRecord> {
    vec![
        high_street(),
        on_road(
            located(
                reported(
                    near(record("2", "High", 40, "High", 1200.0), "School", 1.2),
                    "2024-03-16",
                ),
                51.7505,
                -1.2571,
            ),
            "St Aldate's",
        ),
        on_road(
            located(
                reported(
                    near(record("5", "Medium", 60, "High", 2800.0), "Hospital", 0.1),
                    "2024-03-19",
                ),
                51.7650,
                -1.2600,
            ),
            "Banbury Road",
        ),
    ]
}

pub(super) fn oxford_bounds() -> BoundingBox {
    BoundingBox {
        northeast: GeoPoint {
            lat: 51.7600,
            lng: -1.2500,
        },
        southwest: GeoPoint {
            lat: 51.7400,
            lng: -1.2700,
        },
    }
}

pub(super) fn build_service(records: Vec<DefectRecord>) -> Arc<TriageService<InMemoryDefectSource>> {
    Arc::new(
        TriageService::new(
            Arc::new(InMemoryDefectSource::new(records)),
            ScoringWeights::default(),
        )
        .expect("default weights are valid"),
    )
}

pub(super) struct UnavailableSource;

impl DefectSource for UnavailableSource {
    fn snapshot(&self, _bounds: Option<&BoundingBox>) -> Result<Vec<DefectRecord>, DefectSourceError> {
        Err(DefectSourceError::Unavailable("maintenance window".to_string()))
    }
}

pub(super) async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
