use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{GeoPoint, Severity};
use super::money::Money;
use super::scoring::ScoredDefect;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticsOptions {
    /// Grid cell edge, in degrees, used to bucket nearby defects.
    pub cell_size_degrees: f64,
    pub top_locations: usize,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            cell_size_degrees: 0.01,
            top_locations: 5,
        }
    }
}

/// Grid cell ranked by the summed priority of the defects inside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedArea {
    /// Centroid of the defects in the cell.
    pub location: GeoPoint,
    /// Mean priority score of the defects in the cell.
    pub severity: f64,
    pub defect_count: usize,
    pub score_density: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectAnalytics {
    pub total_defects: usize,
    pub critical_count: usize,
    pub average_repair_cost: Money,
    pub worst_affected_areas: Vec<AffectedArea>,
}

#[derive(Default)]
struct Cell {
    lat_sum: f64,
    lng_sum: f64,
    score_sum: u32,
    count: usize,
}

pub fn summarize(defects: &[ScoredDefect], options: &AnalyticsOptions) -> DefectAnalytics {
    let total_defects = defects.len();
    let critical_count = defects
        .iter()
        .filter(|scored| scored.defect.severity == Severity::High)
        .count();
    let total_cost: Money = defects
        .iter()
        .map(|scored| scored.defect.estimated_repair_cost)
        .sum();

    DefectAnalytics {
        total_defects,
        critical_count,
        average_repair_cost: Money::average(total_cost, total_defects),
        worst_affected_areas: worst_affected_areas(defects, options),
    }
}

fn worst_affected_areas(defects: &[ScoredDefect], options: &AnalyticsOptions) -> Vec<AffectedArea> {
    let cell_size = if options.cell_size_degrees.is_finite() && options.cell_size_degrees > 0.0 {
        options.cell_size_degrees
    } else {
        AnalyticsOptions::default().cell_size_degrees
    };

    let mut cells: BTreeMap<(i64, i64), Cell> = BTreeMap::new();
    for scored in defects {
        let location = scored.defect.location;
        let key = (
            (location.lat / cell_size).floor() as i64,
            (location.lng / cell_size).floor() as i64,
        );
        let cell = cells.entry(key).or_default();
        cell.lat_sum += location.lat;
        cell.lng_sum += location.lng;
        cell.score_sum += u32::from(scored.score.value);
        cell.count += 1;
    }

    let mut ranked: Vec<(&(i64, i64), &Cell)> = cells.iter().collect();
    ranked.sort_by(|(key_a, a), (key_b, b)| {
        b.score_sum
            .cmp(&a.score_sum)
            .then_with(|| b.count.cmp(&a.count))
            .then_with(|| key_a.cmp(key_b))
    });

    ranked
        .into_iter()
        .take(options.top_locations)
        .map(|(_, cell)| {
            let count = cell.count as f64;
            AffectedArea {
                location: GeoPoint {
                    lat: cell.lat_sum / count,
                    lng: cell.lng_sum / count,
                },
                severity: f64::from(cell.score_sum) / count,
                defect_count: cell.count,
                score_density: cell.score_sum,
            }
        })
        .collect()
}
