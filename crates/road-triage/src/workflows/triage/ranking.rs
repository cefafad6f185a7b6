use std::cmp::Ordering;

use super::scoring::ScoredDefect;

/// Orders scored defects from most to least urgent.
///
/// Score descending, then (when `prioritize_traffic` is set) busier roads first, then worse
/// condition, then earlier reports, then identifier ascending. The final key makes the order
/// total, so repeated calls on the same input return the same sequence.
pub fn rank(mut defects: Vec<ScoredDefect>, prioritize_traffic: bool) -> Vec<ScoredDefect> {
    defects.sort_by(|a, b| compare(a, b, prioritize_traffic));
    defects
}

pub fn compare(a: &ScoredDefect, b: &ScoredDefect, prioritize_traffic: bool) -> Ordering {
    b.score
        .value
        .cmp(&a.score.value)
        .then_with(|| {
            if prioritize_traffic {
                b.defect.traffic_volume.cmp(&a.defect.traffic_volume)
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| a.defect.condition.cmp(&b.defect.condition))
        .then_with(|| a.defect.reported_at.cmp(&b.defect.reported_at))
        .then_with(|| a.defect.id.cmp(&b.defect.id))
}
