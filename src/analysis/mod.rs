//! Check-in Analysis
//!
//! Orchestration above the per-answer scorers: concurrent per-question
//! analysis, per-domain aggregation, deep-dive decisions, trends across
//! stored check-ins, and recommendation text.

mod analyzer;
pub(crate) mod batch;
mod deep_dive;
mod engine;
mod recommendations;
mod trend;

pub use analyzer::{PerQuestionAnalyzer, QuestionAnalysis};
pub use batch::BatchAggregator;
pub use engine::{CheckinEngine, CheckinReport, DomainReport};
pub use recommendations::RecommendationGenerator;
pub use trend::TrendAnalyzer;
