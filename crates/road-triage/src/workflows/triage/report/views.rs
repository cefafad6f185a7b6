use serde::Serialize;

use super::super::allocation::DeferralReason;
use super::super::domain::{DefectDetails, DefectId, GeoPoint, Severity, TrafficVolume};
use super::super::money::Money;
use super::super::scoring::FactorContribution;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundedRecommendation {
    pub rank: usize,
    pub defect_id: DefectId,
    pub location: GeoPoint,
    pub severity: Severity,
    pub traffic_volume: TrafficVolume,
    pub condition: u8,
    pub priority_score: u8,
    pub factors: Vec<FactorContribution>,
    pub estimated_repair_cost: Money,
    pub amount: Money,
    pub partial: bool,
    pub recommended_action: String,
    #[serde(flatten)]
    pub details: DefectDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeferredEntry {
    pub rank: usize,
    pub defect_id: DefectId,
    pub severity: Severity,
    pub condition: u8,
    pub priority_score: u8,
    pub estimated_repair_cost: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road_name: Option<String>,
}

/// Deferred defects sharing one reason, in rank order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeferredGroup {
    pub reason: DeferralReason,
    pub defects: Vec<DeferredEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSummary {
    pub budget: Money,
    pub total_allocated: Money,
    pub total_requested: Money,
    pub budget_remaining: Money,
    pub funded_count: usize,
    pub deferred_count: usize,
}

/// Caller-facing report of one allocation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub funded: Vec<FundedRecommendation>,
    pub deferred: Vec<DeferredGroup>,
    pub summary: RecommendationSummary,
}

impl Recommendation {
    pub fn deferred_for(&self, reason: DeferralReason) -> &[DeferredEntry] {
        self.deferred
            .iter()
            .find(|group| group.reason == reason)
            .map(|group| group.defects.as_slice())
            .unwrap_or(&[])
    }
}
