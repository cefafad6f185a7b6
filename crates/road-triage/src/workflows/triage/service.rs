use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::allocation::{AllocationConstraints, AllocationError};
use super::analytics::{AnalyticsOptions, DefectAnalytics};
use super::domain::{BoundingBox, DefectId, InvalidDefect};
use super::engine::TriageEngine;
use super::report::Recommendation;
use super::scoring::{InvalidConfig, ScoredDefect, ScoringWeights};
use super::source::{DefectSource, DefectSourceError};

/// Allocation request as received from callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRequest {
    pub available_budget: f64,
    #[serde(default)]
    pub constraints: Option<AllocationConstraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundingBox>,
    /// Per-request override of the configured scoring weights.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<ScoringWeights>,
}

impl AllocationRequest {
    pub fn new(available_budget: f64) -> Self {
        Self {
            available_budget,
            constraints: None,
            bounds: None,
            weights: None,
        }
    }
}

/// Recommendation plus the records rejected while building it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationReport {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub rejected: Vec<InvalidDefect>,
}

/// Scored defects in rank order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectListing {
    pub defects: Vec<ScoredDefect>,
    pub rejected: Vec<InvalidDefect>,
}

/// Service composing a defect source with the triage engine.
pub struct TriageService<S> {
    source: Arc<S>,
    engine: TriageEngine,
    analytics: AnalyticsOptions,
}

impl<S> TriageService<S>
where
    S: DefectSource + 'static,
{
    pub fn new(source: Arc<S>, weights: ScoringWeights) -> Result<Self, TriageError> {
        Ok(Self {
            source,
            engine: TriageEngine::new(weights)?,
            analytics: AnalyticsOptions::default(),
        })
    }

    pub fn with_analytics_options(mut self, options: AnalyticsOptions) -> Self {
        self.analytics = options;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        self.engine.model().weights()
    }

    /// Scores, ranks, and funds the current defect snapshot against the requested budget.
    pub fn recommend(&self, request: AllocationRequest) -> Result<AllocationReport, TriageError> {
        let AllocationRequest {
            available_budget,
            constraints,
            bounds,
            weights,
        } = request;
        let constraints = constraints.unwrap_or_default();

        let engine = match weights {
            Some(weights) => TriageEngine::new(weights)?,
            None => self.engine.clone(),
        };

        let records = self.source.snapshot(bounds.as_ref())?;
        debug!(
            records = records.len(),
            available_budget,
            ?constraints,
            "running budget allocation"
        );

        let outcome = engine.recommend(records, available_budget, &constraints)?;
        if !outcome.rejected.is_empty() {
            warn!(
                rejected = outcome.rejected.len(),
                "defect records rejected during allocation"
            );
        }

        let summary = &outcome.recommendation.summary;
        info!(
            funded = summary.funded_count,
            deferred = summary.deferred_count,
            allocated = %summary.total_allocated,
            remaining = %summary.budget_remaining,
            "budget allocation complete"
        );

        Ok(AllocationReport {
            recommendation: outcome.recommendation,
            rejected: outcome.rejected,
        })
    }

    /// Lists defects in rank order, optionally restricted to a bounding box.
    pub fn defects(&self, bounds: Option<BoundingBox>) -> Result<DefectListing, TriageError> {
        let records = self.source.snapshot(bounds.as_ref())?;
        let (defects, rejected) = self.engine.rank_records(records, false);
        Ok(DefectListing { defects, rejected })
    }

    /// Looks up a single defect and scores it.
    pub fn defect(&self, defect_id: &str) -> Result<ScoredDefect, TriageError> {
        let record = self
            .source
            .find(defect_id)?
            .ok_or_else(|| TriageError::NotFound(DefectId(defect_id.trim().to_string())))?;
        let scored = self.engine.model().score_record(record)?;
        Ok(scored)
    }

    pub fn analytics(&self) -> Result<DefectAnalytics, TriageError> {
        let records = self.source.snapshot(None)?;
        let (analytics, rejected) = self.engine.analytics(records, &self.analytics);
        if !rejected.is_empty() {
            warn!(
                rejected = rejected.len(),
                "defect records excluded from analytics"
            );
        }
        Ok(analytics)
    }
}

/// Error raised by the triage service.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("invalid scoring configuration: {0}")]
    InvalidConfig(#[from] InvalidConfig),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    InvalidDefect(#[from] InvalidDefect),
    #[error("defect '{0}' not found")]
    NotFound(DefectId),
    #[error(transparent)]
    Source(#[from] DefectSourceError),
}
