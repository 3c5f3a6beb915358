//! Escalation Protocol
//!
//! Maps one [`StressAssessment`] to a Support/Monitor/Escalate tier.
//! Tiers are evaluated top-down and recomputed fresh per assessment.

use crate::constants::protocol::{ESCALATE_SENTIMENT, MONITOR_SENTIMENT};
use crate::types::{Intensity, McpAssessment, Protocol, StressAssessment, Urgency};

const SUPPORT_ACTIONS: &[&str] = &[
    "Keep up regular sleep, movement and meal routines",
    "Take short breaks during demanding days",
    "Check in again at your next scheduled survey",
];

const MONITOR_ACTIONS: &[&str] = &[
    "Schedule a follow-up check-in within the next week",
    "Try a structured coping strategy such as paced breathing or journaling",
    "Identify one stressor you can reduce or delegate",
    "Reach out to someone you trust about how you are feeling",
];

const ESCALATE_ACTIONS: &[&str] = &[
    "Refer to a licensed mental health professional",
    "Complete a safety assessment as soon as possible",
    "Share immediate crisis contact information (call or text 988 in the US, or local emergency services)",
    "Arrange a same-day follow-up contact",
];

/// Stateless tier classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtocolClassifier;

impl ProtocolClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, assessment: &StressAssessment) -> McpAssessment {
        let protocol = Self::tier(assessment);
        let (urgency, actions) = match protocol {
            Protocol::Escalate => (Urgency::High, ESCALATE_ACTIONS),
            Protocol::Monitor => (Urgency::Medium, MONITOR_ACTIONS),
            Protocol::Support => (Urgency::Low, SUPPORT_ACTIONS),
        };

        McpAssessment {
            protocol,
            urgency,
            recommended_actions: actions.iter().map(|a| a.to_string()).collect(),
            follow_up_needed: assessment.sentiment_score > MONITOR_SENTIMENT,
        }
    }

    /// First matching tier wins
    pub fn tier(assessment: &StressAssessment) -> Protocol {
        if assessment.sentiment_score > ESCALATE_SENTIMENT || assessment.is_flagged {
            Protocol::Escalate
        } else if assessment.sentiment_score > MONITOR_SENTIMENT
            || assessment.intensity == Intensity::High
        {
            Protocol::Monitor
        } else {
            Protocol::Support
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::LexiconStore;
    use crate::scoring::StressAssessor;
    use crate::types::{Domain, Emotion, Response};
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn assessment(sentiment: f64, flagged: bool, intensity: Intensity) -> StressAssessment {
        StressAssessment {
            sentiment_score: sentiment,
            emotion: Emotion::Neutral,
            intensity,
            is_stressful: sentiment > 0.6 || flagged,
            is_flagged: flagged,
            domain_stress_score: 0.0,
            confidence_score: 0.0,
            red_flags: BTreeSet::new(),
            domain_keywords: BTreeSet::new(),
        }
    }

    #[test]
    fn test_tiers() {
        let c = ProtocolClassifier::new();
        assert_eq!(
            c.classify(&assessment(0.85, false, Intensity::Low)).protocol,
            Protocol::Escalate
        );
        assert_eq!(
            c.classify(&assessment(0.1, true, Intensity::Low)).protocol,
            Protocol::Escalate
        );
        assert_eq!(
            c.classify(&assessment(0.7, false, Intensity::Low)).protocol,
            Protocol::Monitor
        );
        assert_eq!(
            c.classify(&assessment(0.2, false, Intensity::High)).protocol,
            Protocol::Monitor
        );
        assert_eq!(
            c.classify(&assessment(0.6, false, Intensity::Moderate)).protocol,
            Protocol::Support
        );
    }

    #[test]
    fn test_urgency_actions_and_follow_up() {
        let c = ProtocolClassifier::new();
        let escalate = c.classify(&assessment(0.9, false, Intensity::High));
        assert_eq!(escalate.urgency, Urgency::High);
        assert!(escalate.follow_up_needed);
        assert!(escalate.recommended_actions[0].contains("professional"));

        let monitor = c.classify(&assessment(0.3, false, Intensity::High));
        assert_eq!(monitor.urgency, Urgency::Medium);
        assert!(!monitor.follow_up_needed);

        let support = c.classify(&assessment(0.3, false, Intensity::Low));
        assert_eq!(support.urgency, Urgency::Low);
        assert_eq!(support.recommended_actions.len(), SUPPORT_ACTIONS.len());
    }

    #[test]
    fn test_scenario_burned_out_escalates() {
        let assessor = StressAssessor::new(LexiconStore::builtin().shared()).unwrap();
        for domain in [Domain::WorkCareer, Domain::FinancialStress, Domain::parse("misc")] {
            let response = Response::new(
                "q",
                "How are things?",
                "I feel completely burned out and can't take it anymore",
                domain,
            );
            let mcp = ProtocolClassifier::new().classify(&assessor.assess(&response));
            assert_eq!(mcp.protocol, Protocol::Escalate);
        }
    }

    proptest! {
        #[test]
        fn prop_escalate_implies_monitor_condition(
            sentiment in 0.0f64..=1.0,
            flagged in any::<bool>(),
            intensity in prop_oneof![Just(Intensity::Low), Just(Intensity::Moderate), Just(Intensity::High)],
        ) {
            let a = assessment(sentiment, flagged, intensity);
            if ProtocolClassifier::tier(&a) == Protocol::Escalate {
                prop_assert!(a.is_flagged || a.sentiment_score > 0.6);
            }
        }
    }
}
