//! Rank-greedy budget allocation.
//!
//! The solver walks defects in rank order and decides each one with a single rule, so every
//! disposition can be traced back to the rule that produced it. It is a knapsack approximation
//! running in one pass, not an optimal-subset search.

mod constraints;
mod policy;

pub use constraints::{AllocationConstraints, ConstraintViolation};
pub use policy::{DeferralReason, Disposition};

use serde::Serialize;

use super::money::Money;
use super::scoring::ScoredDefect;
use constraints::Limits;
use policy::Ledger;

/// Runs the solver over `ranked`, which must already be in rank order.
///
/// Fails before any allocation work when the budget or constraints are malformed.
pub fn allocate(
    ranked: &[ScoredDefect],
    available_budget: f64,
    constraints: &AllocationConstraints,
) -> Result<AllocationResult, AllocationError> {
    let (budget, limits) = check_request(available_budget, constraints)?;

    let mut ledger = Ledger::new(budget, limits);
    let mut total_requested = Money::ZERO;
    let entries: Vec<AllocationEntry> = ranked
        .iter()
        .enumerate()
        .map(|(index, scored)| {
            total_requested = total_requested.saturating_add(scored.defect.estimated_repair_cost);
            AllocationEntry {
                rank: index + 1,
                disposition: ledger.decide(&scored.defect),
                defect: scored.clone(),
            }
        })
        .collect();

    let total_allocated = ledger.spent();
    let totals = AllocationTotals {
        funded_count: ledger.funded_count(),
        deferred_count: entries.len() - ledger.funded_count(),
        total_allocated,
        total_requested,
        budget_remaining: budget.saturating_sub(total_allocated),
    };

    Ok(AllocationResult {
        budget,
        entries,
        totals,
    })
}

/// Validates the request-level inputs without looking at any defect.
pub(crate) fn check_request(
    available_budget: f64,
    constraints: &AllocationConstraints,
) -> Result<(Money, Limits), AllocationError> {
    let budget = Money::try_from_major(available_budget).ok_or(AllocationError::InvalidBudget {
        value: available_budget,
    })?;
    let limits = constraints.limits()?;
    Ok((budget, limits))
}

/// One defect's disposition, in rank order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationEntry {
    pub rank: usize,
    pub defect: ScoredDefect,
    pub disposition: Disposition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationTotals {
    pub funded_count: usize,
    pub deferred_count: usize,
    pub total_allocated: Money,
    pub total_requested: Money,
    pub budget_remaining: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    pub budget: Money,
    pub entries: Vec<AllocationEntry>,
    pub totals: AllocationTotals,
}

impl AllocationResult {
    pub fn disposition_of(&self, defect_id: &str) -> Option<&Disposition> {
        self.entries
            .iter()
            .find(|entry| entry.defect.defect.id.0 == defect_id)
            .map(|entry| &entry.disposition)
    }
}

/// Request-level allocation failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AllocationError {
    #[error("available budget must be a non-negative finite amount, got {value}")]
    InvalidBudget { value: f64 },
    #[error("invalid constraints: {0}")]
    InvalidConstraints(#[from] ConstraintViolation),
}
