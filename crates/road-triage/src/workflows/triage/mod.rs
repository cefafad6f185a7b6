//! Defect prioritization and repair-budget allocation.
//!
//! Every stage is a pure function over the records handed to it: scoring turns a validated
//! [`Defect`] into a [`PriorityScore`], ranking orders the scored set, the allocation solver
//! walks that order against a budget, and the report module assembles the outcome for callers.
//! [`TriageService`] wires the stages to a [`DefectSource`] snapshot.

pub mod allocation;
pub mod analytics;
pub mod domain;
mod engine;
pub mod import;
pub mod money;
pub mod ranking;
pub mod report;
pub mod router;
pub mod scoring;
pub mod service;
pub mod source;

#[cfg(test)]
mod tests;

pub use allocation::{
    allocate, AllocationConstraints, AllocationEntry, AllocationError, AllocationResult,
    AllocationTotals, ConstraintViolation, DeferralReason, Disposition,
};
pub use analytics::{AffectedArea, AnalyticsOptions, DefectAnalytics};
pub use domain::{
    BoundingBox, CostBreakdown, CriticalInfrastructure, Defect, DefectDetails, DefectId,
    DefectRecord, DefectViolation, GeoPoint, InfrastructureRecord, InvalidDefect, RawDistance,
    Severity, TrafficVolume,
};
pub use engine::{EngineOutcome, TriageEngine};
pub use money::Money;
pub use ranking::rank;
pub use report::{
    assemble, DeferredEntry, DeferredGroup, FundedRecommendation, Recommendation,
    RecommendationSummary,
};
pub use router::triage_router;
pub use scoring::{
    FactorContribution, InvalidConfig, PriorityScore, ScoreFactor, ScoredDefect, ScoringModel,
    ScoringWeights,
};
pub use service::{
    AllocationReport, AllocationRequest, DefectListing, TriageError, TriageService,
};
pub use source::{DefectSource, DefectSourceError, InMemoryDefectSource};
