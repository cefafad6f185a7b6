mod config;
pub(crate) mod rules;

pub use config::{InvalidConfig, ScoringWeights};

use super::domain::{Defect, DefectRecord, InvalidDefect};
use serde::Serialize;

/// Stateless scorer applying a validated weight set to defects.
#[derive(Debug, Clone, Default)]
pub struct ScoringModel {
    weights: ScoringWeights,
}

impl ScoringModel {
    pub fn new(weights: ScoringWeights) -> Result<Self, InvalidConfig> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(&self, defect: &Defect) -> PriorityScore {
        let factors = rules::contributions(defect, &self.weights);
        let total: f64 = factors.iter().map(|factor| factor.contribution).sum();
        let value = total.round().clamp(0.0, 100.0) as u8;

        PriorityScore { value, factors }
    }

    /// Validates a raw record and scores it.
    pub fn score_record(&self, record: DefectRecord) -> Result<ScoredDefect, InvalidDefect> {
        let defect = Defect::try_from(record)?;
        Ok(self.attach(defect))
    }

    pub fn attach(&self, defect: Defect) -> ScoredDefect {
        let score = self.score(&defect);
        ScoredDefect { defect, score }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Severity,
    Condition,
    Traffic,
    Proximity,
}

/// One factor's share of a priority score, kept for audits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorContribution {
    pub factor: ScoreFactor,
    pub points: f64,
    pub weight: f64,
    pub contribution: f64,
    pub notes: String,
}

/// Integer urgency in `0..=100` with the factor trail that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityScore {
    pub value: u8,
    pub factors: Vec<FactorContribution>,
}

/// A defect paired with the score computed from its current attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDefect {
    #[serde(flatten)]
    pub defect: Defect,
    #[serde(rename = "priorityScore")]
    pub score: PriorityScore,
}
