//! Assessment Types
//!
//! Per-answer outputs of the heuristic pipeline and the escalation protocol.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Dominant emotion, in tie-break order (first declared wins)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Overwhelmed,
    Anxious,
    Frustrated,
    Sad,
    Stressed,
    Confused,
    Neutral,
    Positive,
}

impl Emotion {
    pub const ALL: [Emotion; 8] = [
        Emotion::Overwhelmed,
        Emotion::Anxious,
        Emotion::Frustrated,
        Emotion::Sad,
        Emotion::Stressed,
        Emotion::Confused,
        Emotion::Neutral,
        Emotion::Positive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Overwhelmed => "overwhelmed",
            Emotion::Anxious => "anxious",
            Emotion::Frustrated => "frustrated",
            Emotion::Sad => "sad",
            Emotion::Stressed => "stressed",
            Emotion::Confused => "confused",
            Emotion::Neutral => "neutral",
            Emotion::Positive => "positive",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str() == lower)
            .ok_or_else(|| format!("Unknown emotion: {}", s))
    }
}

/// Answer intensity from frequency cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Moderate,
    High,
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intensity::Low => write!(f, "low"),
            Intensity::Moderate => write!(f, "moderate"),
            Intensity::High => write!(f, "high"),
        }
    }
}

/// Heuristic stress assessment of one answer. Pure function of its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressAssessment {
    /// Pattern score plus domain adjustment, in [0, 1]
    pub sentiment_score: f64,
    pub emotion: Emotion,
    pub intensity: Intensity,
    pub is_stressful: bool,
    /// Any red-flag phrase present
    pub is_flagged: bool,
    /// Raw domain intensifier weight, floored at 0
    pub domain_stress_score: f64,
    pub confidence_score: f64,
    pub red_flags: BTreeSet<String>,
    pub domain_keywords: BTreeSet<String>,
}

/// Escalation tier, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Protocol {
    Support,
    Monitor,
    Escalate,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Support => "Support",
            Protocol::Monitor => "Monitor",
            Protocol::Escalate => "Escalate",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "support" => Ok(Protocol::Support),
            "monitor" => Ok(Protocol::Monitor),
            "escalate" => Ok(Protocol::Escalate),
            _ => Err(format!("Unknown protocol: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Urgency::Low => write!(f, "low"),
            Urgency::Medium => write!(f, "medium"),
            Urgency::High => write!(f, "high"),
        }
    }
}

/// Escalation protocol attached to one assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpAssessment {
    pub protocol: Protocol,
    pub urgency: Urgency,
    pub recommended_actions: Vec<String>,
    pub follow_up_needed: bool,
}

/// Batch-level stress band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    Low,
    Moderate,
    High,
}

impl fmt::Display for StressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StressLevel::Low => write!(f, "low"),
            StressLevel::Moderate => write!(f, "moderate"),
            StressLevel::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for StressLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(StressLevel::Low),
            "moderate" => Ok(StressLevel::Moderate),
            "high" => Ok(StressLevel::High),
            _ => Err(format!("Unknown stress level: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotion_round_trip_through_str() {
        assert_eq!("Anxious".parse::<Emotion>().unwrap(), Emotion::Anxious);
        assert!("ecstatic".parse::<Emotion>().is_err());
    }

    #[test]
    fn test_protocol_ordering() {
        assert!(Protocol::Escalate > Protocol::Monitor);
        assert!(Protocol::Monitor > Protocol::Support);
        assert_eq!("escalate".parse::<Protocol>().unwrap(), Protocol::Escalate);
    }

    #[test]
    fn test_assessment_serializes_camel_case() {
        let assessment = StressAssessment {
            sentiment_score: 0.5,
            emotion: Emotion::Neutral,
            intensity: Intensity::Moderate,
            is_stressful: false,
            is_flagged: false,
            domain_stress_score: 0.0,
            confidence_score: 0.33,
            red_flags: BTreeSet::new(),
            domain_keywords: BTreeSet::new(),
        };
        let json = serde_json::to_value(&assessment).unwrap();
        assert_eq!(json["sentimentScore"], 0.5);
        assert_eq!(json["emotion"], "neutral");
        assert_eq!(json["isStressful"], false);
    }
}
