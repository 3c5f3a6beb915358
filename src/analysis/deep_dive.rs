//! Deep-dive trigger and the payload handed to the follow-up flow.

use crate::constants::batch::{DEEP_DIVE_AVERAGE, DEEP_DIVE_FLAGGED_PCT};
use crate::types::{
    BatchSummary, DeepDiveDecision, DeepDivePayload, DeepDivePriority, FlaggedQuestion, Protocol,
    StressLevel,
};

impl DeepDiveDecision {
    /// Empty batches never need a deep dive
    pub fn from_summary(summary: &BatchSummary) -> Self {
        let any_escalated = summary
            .individual_results
            .iter()
            .any(|r| r.protocol.protocol == Protocol::Escalate);

        let needs_deep_dive = !summary.is_empty()
            && (summary.average_sentiment_score > DEEP_DIVE_AVERAGE
                || summary.percent(summary.flagged_count) > DEEP_DIVE_FLAGGED_PCT
                || any_escalated);

        let priority = if any_escalated || summary.overall_stress_level == StressLevel::High {
            DeepDivePriority::High
        } else {
            DeepDivePriority::Medium
        };

        Self {
            needs_deep_dive,
            flagged_questions: summary
                .stressful_answers()
                .map(|a| a.response.clone())
                .collect(),
            priority,
        }
    }
}

impl DeepDivePayload {
    pub fn from_summary(summary: &BatchSummary, decision: &DeepDiveDecision) -> Self {
        Self {
            flagged_questions: summary
                .stressful_answers()
                .map(|a| FlaggedQuestion {
                    id: a.response.question_id.clone(),
                    text: a.response.question_text.clone(),
                    selected_option: a.response.answer_text.clone(),
                    stress_score: a.assessment.sentiment_score,
                    emotion: a.assessment.emotion,
                    intensity: a.assessment.intensity,
                })
                .collect(),
            domain_needs_review: decision.needs_deep_dive,
            total_answers: summary.total_answers,
        }
    }
}
