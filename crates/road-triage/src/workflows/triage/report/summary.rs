use super::super::allocation::{AllocationResult, DeferralReason, Disposition};
use super::narrative::recommended_action;
use super::views::{
    DeferredEntry, DeferredGroup, FundedRecommendation, Recommendation, RecommendationSummary,
};

/// Packages a solver result for callers.
///
/// Funded defects keep their funding order. Deferred defects are grouped by reason, with groups
/// ordered by the rank of their first member.
pub fn assemble(result: &AllocationResult) -> Recommendation {
    let mut funded = Vec::new();
    let mut deferred: Vec<DeferredGroup> = Vec::new();

    for entry in &result.entries {
        let scored = &entry.defect;
        let defect = &scored.defect;

        match entry.disposition {
            Disposition::Funded { amount } => funded.push(FundedRecommendation {
                rank: entry.rank,
                defect_id: defect.id.clone(),
                location: defect.location,
                severity: defect.severity,
                traffic_volume: defect.traffic_volume,
                condition: defect.condition,
                priority_score: scored.score.value,
                factors: scored.score.factors.clone(),
                estimated_repair_cost: defect.estimated_repair_cost,
                amount,
                partial: amount < defect.estimated_repair_cost,
                recommended_action: recommended_action(scored, amount),
                details: defect.details.clone(),
            }),
            Disposition::Deferred { reason } => {
                let member = DeferredEntry {
                    rank: entry.rank,
                    defect_id: defect.id.clone(),
                    severity: defect.severity,
                    condition: defect.condition,
                    priority_score: scored.score.value,
                    estimated_repair_cost: defect.estimated_repair_cost,
                    road_name: defect.details.road_name.clone(),
                };
                group_for(&mut deferred, reason).defects.push(member);
            }
        }
    }

    let total_allocated = funded.iter().map(|item| item.amount).sum();
    let summary = RecommendationSummary {
        budget: result.budget,
        total_allocated,
        total_requested: result.totals.total_requested,
        budget_remaining: result.budget.saturating_sub(total_allocated),
        funded_count: funded.len(),
        deferred_count: deferred.iter().map(|group| group.defects.len()).sum(),
    };

    Recommendation {
        funded,
        deferred,
        summary,
    }
}

fn group_for(groups: &mut Vec<DeferredGroup>, reason: DeferralReason) -> &mut DeferredGroup {
    let index = match groups.iter().position(|group| group.reason == reason) {
        Some(index) => index,
        None => {
            groups.push(DeferredGroup {
                reason,
                defects: Vec::new(),
            });
            groups.len() - 1
        }
    };
    &mut groups[index]
}
