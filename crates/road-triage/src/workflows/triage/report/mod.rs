mod narrative;
mod summary;
pub mod views;

pub use summary::assemble;
pub use views::{
    DeferredEntry, DeferredGroup, FundedRecommendation, Recommendation, RecommendationSummary,
};
