//! Heuristic Scoring
//!
//! Pure, synchronous scorers over normalized answer text:
//!
//! - [`PatternScorer`]: frequency-weighted tier average
//! - [`DomainAdjuster`]: bounded per-domain correction
//! - [`RedFlagDetector`]: crisis phrase presence
//! - [`EmotionClassifier`] and [`IntensityClassifier`]
//!
//! [`StressAssessor`] composes them into a [`crate::types::StressAssessment`].

mod builder;
mod domain;
mod emotion;
mod intensity;
mod pattern;
mod red_flag;

pub use builder::StressAssessor;
pub use domain::{DomainAdjuster, DomainSignal};
pub use emotion::EmotionClassifier;
pub use intensity::IntensityClassifier;
pub use pattern::PatternScorer;
pub use red_flag::RedFlagDetector;
