use serde::Serialize;

use super::super::domain::{Defect, Severity};
use super::super::money::Money;
use super::constraints::Limits;

/// A partial award must cover at least this share of the defect's repair cost.
pub(crate) const PARTIAL_FUNDING_MIN_PERCENT: u64 = 20;

/// Outcome assigned to a single defect by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Disposition {
    Funded { amount: Money },
    Deferred { reason: DeferralReason },
}

impl Disposition {
    pub fn funded_amount(&self) -> Option<Money> {
        match self {
            Disposition::Funded { amount } => Some(*amount),
            Disposition::Deferred { .. } => None,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Disposition::Funded { amount } => format!("funded {amount}"),
            Disposition::Deferred { reason } => format!("deferred: {}", reason.label()),
        }
    }
}

/// Why a defect was not funded in this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeferralReason {
    #[serde(rename = "project cap reached")]
    ProjectCapReached,
    #[serde(rename = "condition above target")]
    ConditionAboveTarget,
    #[serde(rename = "budget exhausted")]
    BudgetExhausted,
    #[serde(rename = "insufficient remaining budget")]
    InsufficientRemainingBudget,
}

impl DeferralReason {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ProjectCapReached => "project cap reached",
            Self::ConditionAboveTarget => "condition above target",
            Self::BudgetExhausted => "budget exhausted",
            Self::InsufficientRemainingBudget => "insufficient remaining budget",
        }
    }
}

/// Running state of one greedy pass over the ranked defects.
pub(crate) struct Ledger {
    budget: Money,
    limits: Limits,
    spent: Money,
    funded_count: usize,
    exhausted: bool,
}

impl Ledger {
    pub(crate) fn new(budget: Money, limits: Limits) -> Self {
        Self {
            budget,
            limits,
            spent: Money::ZERO,
            funded_count: 0,
            exhausted: false,
        }
    }

    pub(crate) fn spent(&self) -> Money {
        self.spent
    }

    pub(crate) fn funded_count(&self) -> usize {
        self.funded_count
    }

    /// Decides the next defect in rank order and records any spend.
    ///
    /// Rules apply in order: project cap, budget exhaustion, condition target, then full or
    /// partial funding.
    pub(crate) fn decide(&mut self, defect: &Defect) -> Disposition {
        if let Some(cap) = self.limits.maximum_projects {
            if self.funded_count >= cap {
                return deferred(DeferralReason::ProjectCapReached);
            }
        }

        if self.exhausted {
            return deferred(DeferralReason::BudgetExhausted);
        }

        if let Some(target) = self.limits.target_condition {
            if defect.condition >= target && defect.severity != Severity::High {
                return deferred(DeferralReason::ConditionAboveTarget);
            }
        }

        let need = defect.estimated_repair_cost;
        let remaining = self.budget.saturating_sub(self.spent);

        if need <= remaining {
            self.spent = self.spent.saturating_add(need);
            self.funded_count += 1;
            return Disposition::Funded { amount: need };
        }

        if remaining.covers_percent_of(need, PARTIAL_FUNDING_MIN_PERCENT) {
            self.spent = self.budget;
            self.funded_count += 1;
            self.exhausted = true;
            return Disposition::Funded { amount: remaining };
        }

        deferred(DeferralReason::InsufficientRemainingBudget)
    }
}

fn deferred(reason: DeferralReason) -> Disposition {
    Disposition::Deferred { reason }
}
