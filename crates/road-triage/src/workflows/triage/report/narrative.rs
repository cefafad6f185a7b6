use super::super::domain::{Severity, TrafficVolume};
use super::super::money::Money;
use super::super::scoring::ScoredDefect;

/// One-sentence action for a funded defect, suitable for an RFP summary line.
pub(crate) fn recommended_action(scored: &ScoredDefect, amount: Money) -> String {
    let defect = &scored.defect;
    let urgency = match (defect.severity, defect.traffic_volume) {
        (Severity::High, TrafficVolume::High) => "Immediate repair required",
        (Severity::High, _) => "Urgent repair recommended",
        (Severity::Medium, TrafficVolume::High) => "Prompt repair recommended",
        (Severity::Medium, _) => "Scheduled repair recommended",
        (Severity::Low, _) => "Routine maintenance repair",
    };

    let place = match &defect.details.road_name {
        Some(road) => format!(" at {road}"),
        None => String::new(),
    };

    let context = match defect.nearest_infrastructure() {
        Some(facility) if facility.distance_km < 1.0 => format!(
            " in a {}-traffic area, {:.1} km from {}",
            defect.traffic_volume.label().to_lowercase(),
            facility.distance_km,
            facility.kind
        ),
        _ => format!(
            " in a {}-traffic area",
            defect.traffic_volume.label().to_lowercase()
        ),
    };

    if amount < defect.estimated_repair_cost {
        format!(
            "{urgency}{place}{context}; partially funded ({amount} of {}), start a first-phase repair.",
            defect.estimated_repair_cost
        )
    } else {
        format!("{urgency}{place}{context}.")
    }
}
