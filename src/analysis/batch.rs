//! Batch Aggregation
//!
//! Folds the per-answer results of one domain/check-in into a
//! [`BatchSummary`]. Must only run after every answer in the batch has been
//! analyzed.

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::constants::batch::{
    ESCALATE_AVERAGE, ESCALATE_PCT, HIGH_LEVEL_AVERAGE, HIGH_LEVEL_STRESS_PCT, MODERATE_LEVEL_AVERAGE,
    MODERATE_LEVEL_STRESS_PCT, MONITOR_AVERAGE, MONITOR_PCT,
};
use crate::types::{AssessedAnswer, BatchSummary, Protocol, StressLevel};

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchAggregator;

impl BatchAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(&self, results: Vec<AssessedAnswer>) -> BatchSummary {
        if results.is_empty() {
            return BatchSummary::empty();
        }

        let total = results.len();
        let mut high_stress_count = 0;
        let mut flagged_count = 0;
        let mut escalated_count = 0;
        let mut sentiment_sum = 0.0;
        let mut domains_needing_attention = BTreeSet::new();
        let mut emotion_distribution = BTreeMap::new();
        let mut intensity_distribution = BTreeMap::new();

        for result in &results {
            let assessment = &result.assessment;
            sentiment_sum += assessment.sentiment_score;

            if assessment.is_stressful {
                high_stress_count += 1;
                domains_needing_attention.insert(result.response.domain.clone());
            }
            if assessment.is_flagged {
                flagged_count += 1;
            }
            if result.protocol.protocol == Protocol::Escalate {
                escalated_count += 1;
            }

            *emotion_distribution.entry(assessment.emotion).or_insert(0) += 1;
            *intensity_distribution.entry(assessment.intensity).or_insert(0) += 1;
        }

        let average = sentiment_sum / total as f64;
        let stress_pct = percent(high_stress_count, total);
        let escalated_pct = percent(escalated_count, total);

        let overall_stress_level = Self::level(average, stress_pct, high_stress_count);
        let mcp_protocol = Self::protocol(average, escalated_pct);

        debug!(
            total,
            high_stress_count,
            escalated_count,
            average,
            level = %overall_stress_level,
            protocol = %mcp_protocol,
            "Batch aggregated"
        );

        BatchSummary {
            individual_results: results,
            total_answers: total,
            high_stress_count,
            flagged_count,
            escalated_count,
            average_sentiment_score: average,
            overall_stress_level,
            domains_needing_attention,
            mcp_protocol,
            emotion_distribution,
            intensity_distribution,
        }
    }

    /// No stressful answer means low, whatever the average
    fn level(average: f64, stress_pct: f64, stressful: usize) -> StressLevel {
        if stressful == 0 {
            StressLevel::Low
        } else if average > HIGH_LEVEL_AVERAGE || stress_pct > HIGH_LEVEL_STRESS_PCT {
            StressLevel::High
        } else if average > MODERATE_LEVEL_AVERAGE || stress_pct > MODERATE_LEVEL_STRESS_PCT {
            StressLevel::Moderate
        } else {
            StressLevel::Low
        }
    }

    fn protocol(average: f64, escalated_pct: f64) -> Protocol {
        if average > ESCALATE_AVERAGE || escalated_pct > ESCALATE_PCT {
            Protocol::Escalate
        } else if average > MONITOR_AVERAGE || escalated_pct > MONITOR_PCT {
            Protocol::Monitor
        } else {
            Protocol::Support
        }
    }
}

fn percent(count: usize, total: usize) -> f64 {
    count as f64 / total as f64 * 100.0
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::lexicon::LexiconStore;
    use crate::protocol::ProtocolClassifier;
    use crate::scoring::StressAssessor;
    use crate::types::{Domain, Emotion, Intensity, Response};
    use proptest::prelude::*;

    /// Assess real text through the heuristic pipeline
    pub(crate) fn assessed(answer: &str, domain: Domain) -> AssessedAnswer {
        let assessor = StressAssessor::new(LexiconStore::builtin().shared()).unwrap();
        let response = Response::new("q", "How have things been lately?", answer, domain);
        let assessment = assessor.assess(&response);
        let protocol = ProtocolClassifier::new().classify(&assessment);
        AssessedAnswer {
            response,
            assessment,
            protocol,
        }
    }

    fn rarely(id: usize) -> AssessedAnswer {
        let assessor = StressAssessor::new(LexiconStore::builtin().shared()).unwrap();
        let response = Response::new(
            format!("q{}", id),
            "How often do you feel overwhelmed?",
            "Rarely",
            Domain::PersonalLife,
        );
        let assessment = assessor.assess(&response);
        let protocol = ProtocolClassifier::new().classify(&assessment);
        AssessedAnswer {
            response,
            assessment,
            protocol,
        }
    }

    #[test]
    fn test_no_stressful_answers_is_low_support() {
        let results: Vec<_> = (0..5).map(rarely).collect();
        assert!(results.iter().all(|r| !r.assessment.is_stressful));

        let summary = BatchAggregator::new().aggregate(results);
        assert_eq!(summary.total_answers, 5);
        assert_eq!(summary.high_stress_count, 0);
        assert_eq!(summary.overall_stress_level, StressLevel::Low);
        assert_eq!(summary.mcp_protocol, Protocol::Support);
        assert!(summary.domains_needing_attention.is_empty());
    }

    #[test]
    fn test_three_of_five_escalated_escalates_batch() {
        let mut results: Vec<_> = (0..2).map(rarely).collect();
        for _ in 0..3 {
            results.push(assessed(
                "I feel completely burned out and can't take it anymore",
                Domain::WorkCareer,
            ));
        }

        let summary = BatchAggregator::new().aggregate(results);
        assert_eq!(summary.escalated_count, 3);
        assert_eq!(summary.flagged_count, 3);
        assert_eq!(summary.mcp_protocol, Protocol::Escalate);
        assert_eq!(summary.overall_stress_level, StressLevel::High);
        assert!(summary.domains_needing_attention.contains(&Domain::WorkCareer));
        assert!(!summary.domains_needing_attention.contains(&Domain::PersonalLife));
    }

    #[test]
    fn test_empty_batch_is_no_data() {
        let summary = BatchAggregator::new().aggregate(Vec::new());
        assert!(summary.is_empty());
        assert_eq!(summary.average_sentiment_score, 0.0);
        assert_eq!(summary.overall_stress_level, StressLevel::Low);
        assert_eq!(summary.mcp_protocol, Protocol::Support);
    }

    #[test]
    fn test_distributions_are_counted() {
        let results = vec![rarely(0), rarely(1)];
        let summary = BatchAggregator::new().aggregate(results);
        assert_eq!(summary.intensity_distribution.get(&Intensity::Low), Some(&2));
        assert_eq!(
            summary.emotion_distribution.values().sum::<usize>(),
            summary.total_answers
        );
        assert!(summary.emotion_distribution.contains_key(&Emotion::Overwhelmed));
    }

    #[test]
    fn test_level_bands() {
        assert_eq!(BatchAggregator::level(0.75, 10.0, 1), StressLevel::High);
        assert_eq!(BatchAggregator::level(0.3, 50.0, 3), StressLevel::High);
        assert_eq!(BatchAggregator::level(0.55, 10.0, 1), StressLevel::Moderate);
        assert_eq!(BatchAggregator::level(0.3, 25.0, 1), StressLevel::Moderate);
        assert_eq!(BatchAggregator::level(0.3, 20.0, 1), StressLevel::Low);
        assert_eq!(BatchAggregator::level(0.58, 0.0, 0), StressLevel::Low);
    }

    #[test]
    fn test_protocol_bands() {
        assert_eq!(BatchAggregator::protocol(0.85, 0.0), Protocol::Escalate);
        assert_eq!(BatchAggregator::protocol(0.2, 31.0), Protocol::Escalate);
        assert_eq!(BatchAggregator::protocol(0.65, 0.0), Protocol::Monitor);
        assert_eq!(BatchAggregator::protocol(0.2, 20.0), Protocol::Monitor);
        assert_eq!(BatchAggregator::protocol(0.6, 10.0), Protocol::Support);
    }

    proptest! {
        #[test]
        fn prop_calm_batches_stay_low(count in 1usize..12) {
            let summary = BatchAggregator::new().aggregate((0..count).map(rarely).collect());
            prop_assert_eq!(summary.overall_stress_level, StressLevel::Low);
            prop_assert_eq!(summary.mcp_protocol, Protocol::Support);
        }
    }
}
