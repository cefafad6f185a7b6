use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::money::Money;

/// Stable identifier of a reported defect.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DefectId(pub String);

impl fmt::Display for DefectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Geographic filter described by its north-east and south-west corners.
///
/// A south-west longitude greater than the north-east longitude describes a box that crosses
/// the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(alias = "ne")]
    pub northeast: GeoPoint,
    #[serde(alias = "sw")]
    pub southwest: GeoPoint,
}

impl BoundingBox {
    pub fn contains(&self, point: GeoPoint) -> bool {
        let within_lat = point.lat >= self.southwest.lat && point.lat <= self.northeast.lat;
        let within_lng = if self.southwest.lng <= self.northeast.lng {
            point.lng >= self.southwest.lng && point.lng <= self.northeast.lng
        } else {
            point.lng >= self.southwest.lng || point.lng <= self.northeast.lng
        };
        within_lat && within_lng
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim();
        [Self::High, Self::Medium, Self::Low]
            .into_iter()
            .find(|severity| severity.label().eq_ignore_ascii_case(value))
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// Traffic category. Variants are declared low to high so the derived ordering ranks busier
/// roads above quieter ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrafficVolume {
    Low,
    Medium,
    High,
}

impl TrafficVolume {
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim();
        [Self::Low, Self::Medium, Self::High]
            .into_iter()
            .find(|volume| volume.label().eq_ignore_ascii_case(value))
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Distance as reported: either kilometers or free text such as `"0.2km"` or `"350m"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDistance {
    Kilometers(f64),
    Text(String),
}

impl RawDistance {
    pub fn kilometers(&self) -> Option<f64> {
        let km = match self {
            RawDistance::Kilometers(value) => *value,
            RawDistance::Text(text) => {
                let text = text.trim().to_ascii_lowercase();
                if let Some(value) = text.strip_suffix("km") {
                    value.trim().parse::<f64>().ok()?
                } else if let Some(value) = text.strip_suffix('m') {
                    value.trim().parse::<f64>().ok()? / 1000.0
                } else {
                    text.parse::<f64>().ok()?
                }
            }
        };
        (km.is_finite() && km >= 0.0).then_some(km)
    }
}

impl fmt::Display for RawDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawDistance::Kilometers(value) => write!(f, "{value}"),
            RawDistance::Text(text) => f.write_str(text),
        }
    }
}

/// Nearby facility as reported by the defect source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfrastructureRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub distance: RawDistance,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdownRecord {
    #[serde(default)]
    pub labor_cost: f64,
    #[serde(default)]
    pub material_cost: f64,
    #[serde(default)]
    pub equipment_cost: f64,
}

/// Defect observation exactly as a source supplies it, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub location: GeoPoint,
    pub severity: String,
    pub condition: i64,
    pub traffic_volume: String,
    #[serde(default)]
    pub critical_infrastructure: Vec<InfrastructureRecord>,
    pub estimated_repair_cost: f64,
    #[serde(
        default,
        alias = "budgetAllocation",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost_breakdown: Option<CostBreakdownRecord>,
    #[serde(alias = "reportDate")]
    pub reported_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalInfrastructure {
    #[serde(rename = "type")]
    pub kind: String,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub labor_cost: Money,
    pub material_cost: Money,
    pub equipment_cost: Money,
}

/// Descriptive fields carried through to reports; scoring never reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_breakdown: Option<CostBreakdown>,
}

/// Validated, immutable defect observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Defect {
    pub id: DefectId,
    pub location: GeoPoint,
    pub severity: Severity,
    pub condition: u8,
    pub traffic_volume: TrafficVolume,
    pub critical_infrastructure: Vec<CriticalInfrastructure>,
    pub estimated_repair_cost: Money,
    pub reported_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: DefectDetails,
}

impl Defect {
    /// Closest listed facility, if any.
    pub fn nearest_infrastructure(&self) -> Option<&CriticalInfrastructure> {
        self.critical_infrastructure
            .iter()
            .min_by(|a, b| a.distance_km.total_cmp(&b.distance_km))
    }
}

/// A single record rejected during validation.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("defect '{defect_id}' rejected: {violation}")]
pub struct InvalidDefect {
    pub defect_id: String,
    pub violation: DefectViolation,
}

#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DefectViolation {
    #[error("identifier is empty")]
    MissingIdentifier,
    #[error("identifier already used by an earlier record")]
    DuplicateIdentifier,
    #[error("unknown severity '{value}'")]
    UnknownSeverity { value: String },
    #[error("unknown traffic volume '{value}'")]
    UnknownTrafficVolume { value: String },
    #[error("condition score {value} outside 0-100")]
    ConditionOutOfRange { value: i64 },
    #[error("location ({lat}, {lng}) is not a valid coordinate")]
    InvalidLocation { lat: f64, lng: f64 },
    #[error("estimated repair cost {value} is not a non-negative amount")]
    InvalidRepairCost { value: f64 },
    #[error("cost breakdown contains a negative or non-finite amount")]
    InvalidCostBreakdown,
    #[error("infrastructure '{infrastructure}' has unreadable distance '{value}'")]
    InvalidDistance {
        infrastructure: String,
        value: String,
    },
    #[error("report timestamp '{value}' is neither RFC 3339 nor YYYY-MM-DD")]
    InvalidTimestamp { value: String },
}

impl TryFrom<DefectRecord> for Defect {
    type Error = InvalidDefect;

    fn try_from(record: DefectRecord) -> Result<Self, Self::Error> {
        let reject = |violation| InvalidDefect {
            defect_id: record.id.clone(),
            violation,
        };

        let id = record.id.trim();
        if id.is_empty() {
            return Err(reject(DefectViolation::MissingIdentifier));
        }

        let severity = Severity::parse(&record.severity).ok_or_else(|| {
            reject(DefectViolation::UnknownSeverity {
                value: record.severity.clone(),
            })
        })?;

        let traffic_volume = TrafficVolume::parse(&record.traffic_volume).ok_or_else(|| {
            reject(DefectViolation::UnknownTrafficVolume {
                value: record.traffic_volume.clone(),
            })
        })?;

        let condition = u8::try_from(record.condition)
            .ok()
            .filter(|value| *value <= 100)
            .ok_or_else(|| {
                reject(DefectViolation::ConditionOutOfRange {
                    value: record.condition,
                })
            })?;

        if !record.location.is_valid() {
            return Err(reject(DefectViolation::InvalidLocation {
                lat: record.location.lat,
                lng: record.location.lng,
            }));
        }

        let estimated_repair_cost =
            Money::try_from_major(record.estimated_repair_cost).ok_or_else(|| {
                reject(DefectViolation::InvalidRepairCost {
                    value: record.estimated_repair_cost,
                })
            })?;

        let cost_breakdown = record
            .cost_breakdown
            .map(|breakdown| {
                Some(CostBreakdown {
                    labor_cost: Money::try_from_major(breakdown.labor_cost)?,
                    material_cost: Money::try_from_major(breakdown.material_cost)?,
                    equipment_cost: Money::try_from_major(breakdown.equipment_cost)?,
                })
            })
            .map(|parsed| parsed.ok_or_else(|| reject(DefectViolation::InvalidCostBreakdown)))
            .transpose()?;

        let mut critical_infrastructure = Vec::with_capacity(record.critical_infrastructure.len());
        for entry in &record.critical_infrastructure {
            let distance_km = entry.distance.kilometers().ok_or_else(|| {
                reject(DefectViolation::InvalidDistance {
                    infrastructure: entry.kind.clone(),
                    value: entry.distance.to_string(),
                })
            })?;
            critical_infrastructure.push(CriticalInfrastructure {
                kind: entry.kind.trim().to_string(),
                distance_km,
            });
        }

        let reported_at = parse_timestamp(&record.reported_at).ok_or_else(|| {
            reject(DefectViolation::InvalidTimestamp {
                value: record.reported_at.clone(),
            })
        })?;

        Ok(Defect {
            id: DefectId(id.to_string()),
            location: record.location,
            severity,
            condition,
            traffic_volume,
            critical_infrastructure,
            estimated_repair_cost,
            reported_at,
            details: DefectDetails {
                road_name: record.road_name.clone(),
                postcode: record.postcode.clone(),
                kind: record.kind.clone(),
                cost_breakdown,
            },
        })
    }
}

/// Validates a batch, keeping the first record for each identifier.
///
/// Returns the accepted defects in input order alongside every rejection.
pub fn validate_records(records: Vec<DefectRecord>) -> (Vec<Defect>, Vec<InvalidDefect>) {
    let mut seen = HashSet::new();
    let mut accepted = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for record in records {
        match Defect::try_from(record) {
            Ok(defect) if seen.insert(defect.id.clone()) => accepted.push(defect),
            Ok(defect) => rejected.push(InvalidDefect {
                defect_id: defect.id.0,
                violation: DefectViolation::DuplicateIdentifier,
            }),
            Err(invalid) => rejected.push(invalid),
        }
    }

    (accepted, rejected)
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight))
}
