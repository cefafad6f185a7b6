use super::super::domain::{Defect, Severity, TrafficVolume};
use super::config::ScoringWeights;
use super::{FactorContribution, ScoreFactor};

/// Proximity stops contributing beyond this distance.
const PROXIMITY_HORIZON_KM: f64 = 1.0;

pub(crate) const fn severity_points(severity: Severity) -> f64 {
    match severity {
        Severity::High => 100.0,
        Severity::Medium => 60.0,
        Severity::Low => 20.0,
    }
}

pub(crate) const fn traffic_points(volume: TrafficVolume) -> f64 {
    match volume {
        TrafficVolume::High => 100.0,
        TrafficVolume::Medium => 55.0,
        TrafficVolume::Low => 15.0,
    }
}

pub(crate) fn condition_points(condition: u8) -> f64 {
    100.0 - f64::from(condition.min(100))
}

pub(crate) fn proximity_points(distance_km: Option<f64>) -> f64 {
    match distance_km {
        Some(distance) => (100.0 - 100.0 * distance.min(PROXIMITY_HORIZON_KM)).max(0.0),
        None => 0.0,
    }
}

/// Weighted contributions in a fixed order: severity, condition, traffic, proximity.
pub(crate) fn contributions(defect: &Defect, weights: &ScoringWeights) -> Vec<FactorContribution> {
    let nearest = defect.nearest_infrastructure();
    let proximity_note = match nearest {
        Some(facility) => format!("{} at {:.2} km", facility.kind, facility.distance_km),
        None => "no critical infrastructure listed".to_string(),
    };

    vec![
        contribution(
            ScoreFactor::Severity,
            severity_points(defect.severity),
            weights.severity,
            format!("{} severity", defect.severity.label()),
        ),
        contribution(
            ScoreFactor::Condition,
            condition_points(defect.condition),
            weights.condition,
            format!("condition score {}", defect.condition),
        ),
        contribution(
            ScoreFactor::Traffic,
            traffic_points(defect.traffic_volume),
            weights.traffic,
            format!("{} traffic volume", defect.traffic_volume.label()),
        ),
        contribution(
            ScoreFactor::Proximity,
            proximity_points(nearest.map(|facility| facility.distance_km)),
            weights.proximity,
            proximity_note,
        ),
    ]
}

fn contribution(factor: ScoreFactor, points: f64, weight: f64, notes: String) -> FactorContribution {
    FactorContribution {
        factor,
        points,
        weight,
        contribution: points * weight,
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proximity_fades_to_zero_at_one_kilometer() {
        assert_eq!(proximity_points(Some(0.0)), 100.0);
        assert!((proximity_points(Some(0.25)) - 75.0).abs() < 1e-9);
        assert_eq!(proximity_points(Some(1.0)), 0.0);
        assert_eq!(proximity_points(Some(4.2)), 0.0);
        assert_eq!(proximity_points(None), 0.0);
    }

    #[test]
    fn worse_condition_earns_more_points() {
        assert_eq!(condition_points(0), 100.0);
        assert_eq!(condition_points(35), 65.0);
        assert_eq!(condition_points(100), 0.0);
    }
}
