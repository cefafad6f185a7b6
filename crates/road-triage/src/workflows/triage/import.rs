//! CSV loading for defect exports.
//!
//! Expected header: `id,road_name,postcode,type,latitude,longitude,severity,condition,
//! traffic_volume,estimated_repair_cost,reported_at,critical_infrastructure` plus optional
//! `labor_cost,material_cost,equipment_cost`. Infrastructure is written as
//! `University:0.1km;Tourist Area:0.2km`.
//!
//! Rows are only parsed here. Range and enum checks happen during validation so a bad value
//! rejects its own defect instead of the whole file.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{CostBreakdownRecord, DefectRecord, GeoPoint, InfrastructureRecord, RawDistance};
use super::source::{DefectSourceError, InMemoryDefectSource};

pub fn parse_defects<R: Read>(reader: R) -> Result<Vec<DefectRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<DefectRow>()
        .map(|row| row.map(DefectRow::into_record))
        .collect()
}

pub fn load_defects<P: AsRef<Path>>(path: P) -> Result<Vec<DefectRecord>, DefectSourceError> {
    let file = File::open(path)?;
    Ok(parse_defects(file)?)
}

impl InMemoryDefectSource {
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, DefectSourceError> {
        Ok(Self::new(load_defects(path)?))
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, DefectSourceError> {
        Ok(Self::new(parse_defects(reader)?))
    }
}

#[derive(Debug, Deserialize)]
struct DefectRow {
    id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    road_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    postcode: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "empty_string_as_none")]
    kind: Option<String>,
    latitude: f64,
    longitude: f64,
    severity: String,
    condition: i64,
    traffic_volume: String,
    estimated_repair_cost: f64,
    reported_at: String,
    #[serde(default)]
    critical_infrastructure: String,
    #[serde(default)]
    labor_cost: Option<f64>,
    #[serde(default)]
    material_cost: Option<f64>,
    #[serde(default)]
    equipment_cost: Option<f64>,
}

impl DefectRow {
    fn into_record(self) -> DefectRecord {
        let cost_breakdown = if self.labor_cost.is_some()
            || self.material_cost.is_some()
            || self.equipment_cost.is_some()
        {
            Some(CostBreakdownRecord {
                labor_cost: self.labor_cost.unwrap_or_default(),
                material_cost: self.material_cost.unwrap_or_default(),
                equipment_cost: self.equipment_cost.unwrap_or_default(),
            })
        } else {
            None
        };

        DefectRecord {
            id: self.id,
            road_name: self.road_name,
            postcode: self.postcode,
            kind: self.kind,
            location: GeoPoint {
                lat: self.latitude,
                lng: self.longitude,
            },
            severity: self.severity,
            condition: self.condition,
            traffic_volume: self.traffic_volume,
            critical_infrastructure: parse_infrastructure(&self.critical_infrastructure),
            estimated_repair_cost: self.estimated_repair_cost,
            cost_breakdown,
            reported_at: self.reported_at,
        }
    }
}

fn parse_infrastructure(raw: &str) -> Vec<InfrastructureRecord> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.rsplit_once(':') {
            Some((kind, distance)) => InfrastructureRecord {
                kind: kind.trim().to_string(),
                distance: RawDistance::Text(distance.trim().to_string()),
            },
            None => InfrastructureRecord {
                kind: entry.to_string(),
                distance: RawDistance::Text(String::new()),
            },
        })
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
id,road_name,postcode,type,latitude,longitude,severity,condition,traffic_volume,estimated_repair_cost,reported_at,critical_infrastructure
1,High Street,OX1 4AH,Pothole,51.7520,-1.2577,High,35,High,2500,2024-03-15,University:0.1km;Tourist Area:0.2km
2,,,,51.7505,-1.2571,Severe,40,High,1200,2024-03-16,
";

    #[test]
    fn parses_rows_and_infrastructure_lists() {
        let records = parse_defects(SAMPLE.as_bytes()).expect("csv parses");
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.road_name.as_deref(), Some("High Street"));
        assert_eq!(first.critical_infrastructure.len(), 2);
        assert_eq!(first.critical_infrastructure[1].kind, "Tourist Area");
        assert_eq!(
            first.critical_infrastructure[0].distance.kilometers(),
            Some(0.1)
        );
        assert!(first.cost_breakdown.is_none());
    }

    #[test]
    fn leaves_enum_checks_to_validation() {
        let records = parse_defects(SAMPLE.as_bytes()).expect("csv parses");
        let second = &records[1];
        assert_eq!(second.severity, "Severe");
        assert!(second.road_name.is_none());
        assert!(second.critical_infrastructure.is_empty());
    }
}
