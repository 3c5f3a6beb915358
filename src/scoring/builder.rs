//! Per-answer stress assessment.

use tracing::debug;

use super::domain::DomainAdjuster;
use super::emotion::EmotionClassifier;
use super::intensity::IntensityClassifier;
use super::pattern::PatternScorer;
use super::red_flag::RedFlagDetector;
use crate::constants::scoring::{
    CONFIDENCE_DIVISOR, RED_FLAG_CONFIDENCE_BONUS, STRESSFUL_DOMAIN_SCORE, STRESSFUL_SENTIMENT,
};
use crate::lexicon::{SharedLexicon, normalize_text};
use crate::types::{Response, Result, StressAssessment, clamp_unit};

/// Composes the heuristic scorers into one [`StressAssessment`]
///
/// Holds only compiled, read-only tables; `assess` is a pure function of
/// the response and safe to share across threads.
#[derive(Debug, Clone)]
pub struct StressAssessor {
    patterns: PatternScorer,
    domains: DomainAdjuster,
    red_flags: RedFlagDetector,
    emotions: EmotionClassifier,
    intensity: IntensityClassifier,
}

impl StressAssessor {
    pub fn new(lexicon: SharedLexicon) -> Result<Self> {
        Ok(Self {
            patterns: PatternScorer::new(&lexicon)?,
            domains: DomainAdjuster::new(&lexicon)?,
            red_flags: RedFlagDetector::new(&lexicon)?,
            emotions: EmotionClassifier::new(&lexicon)?,
            intensity: IntensityClassifier::new(&lexicon)?,
        })
    }

    pub fn assess(&self, response: &Response) -> StressAssessment {
        let text = normalize_text(&response.combined_text());
        let answer = normalize_text(&response.answer_text);

        let pattern_score = self.patterns.score(&text);
        let domain = self.domains.adjust(&response.domain, &text);
        let sentiment_score = clamp_unit(pattern_score + domain.adjustment);

        let red_flags = self.red_flags.detect(&text);
        let is_flagged = !red_flags.is_empty();

        let emotion = self.emotions.classify(&text);
        let intensity = self.intensity.classify(&answer, emotion);

        let is_stressful = sentiment_score > STRESSFUL_SENTIMENT
            || is_flagged
            || domain.stress_score > STRESSFUL_DOMAIN_SCORE;

        let flag_bonus = if is_flagged {
            RED_FLAG_CONFIDENCE_BONUS
        } else {
            0.0
        };
        let confidence_score =
            clamp_unit((sentiment_score + flag_bonus + domain.stress_score) / CONFIDENCE_DIVISOR);

        debug!(
            question_id = %response.question_id,
            pattern_score,
            adjustment = domain.adjustment,
            sentiment_score,
            %emotion,
            %intensity,
            is_flagged,
            is_stressful,
            "Assessed answer"
        );

        StressAssessment {
            sentiment_score,
            emotion,
            intensity,
            is_stressful,
            is_flagged,
            domain_stress_score: domain.stress_score,
            confidence_score,
            red_flags,
            domain_keywords: domain.keywords,
        }
    }
}
