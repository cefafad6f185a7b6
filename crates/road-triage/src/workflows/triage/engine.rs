use super::allocation::{allocate, check_request, AllocationConstraints, AllocationError};
use super::analytics::{summarize, AnalyticsOptions, DefectAnalytics};
use super::domain::{validate_records, DefectRecord, InvalidDefect};
use super::ranking::rank;
use super::report::{assemble, Recommendation};
use super::scoring::{InvalidConfig, ScoredDefect, ScoringModel, ScoringWeights};

/// Stateless pipeline: validate, score, rank, allocate, assemble.
#[derive(Debug, Clone, Default)]
pub struct TriageEngine {
    model: ScoringModel,
}

/// Best-effort recommendation plus the records that could not be considered.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutcome {
    pub recommendation: Recommendation,
    pub rejected: Vec<InvalidDefect>,
}

impl TriageEngine {
    pub fn new(weights: ScoringWeights) -> Result<Self, InvalidConfig> {
        Ok(Self {
            model: ScoringModel::new(weights)?,
        })
    }

    pub fn model(&self) -> &ScoringModel {
        &self.model
    }

    /// Validates and scores `records`, returning them in rank order with any rejections.
    pub fn rank_records(
        &self,
        records: Vec<DefectRecord>,
        prioritize_traffic: bool,
    ) -> (Vec<ScoredDefect>, Vec<InvalidDefect>) {
        let (defects, rejected) = validate_records(records);
        let scored = defects
            .into_iter()
            .map(|defect| self.model.attach(defect))
            .collect();
        (rank(scored, prioritize_traffic), rejected)
    }

    /// Runs the full pipeline.
    ///
    /// Budget and constraint errors are raised before any record is scored. Malformed records
    /// are dropped from the run and reported in [`EngineOutcome::rejected`].
    pub fn recommend(
        &self,
        records: Vec<DefectRecord>,
        available_budget: f64,
        constraints: &AllocationConstraints,
    ) -> Result<EngineOutcome, AllocationError> {
        check_request(available_budget, constraints)?;

        let (ranked, rejected) = self.rank_records(records, constraints.prioritize_traffic);
        let result = allocate(&ranked, available_budget, constraints)?;

        Ok(EngineOutcome {
            recommendation: assemble(&result),
            rejected,
        })
    }

    pub fn analytics(
        &self,
        records: Vec<DefectRecord>,
        options: &AnalyticsOptions,
    ) -> (DefectAnalytics, Vec<InvalidDefect>) {
        let (ranked, rejected) = self.rank_records(records, false);
        (summarize(&ranked, options), rejected)
    }
}
