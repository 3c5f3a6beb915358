//! Batch, Deep-Dive and Trend Types
//!
//! Everything here is an append-only fact: built once, read afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

use super::assessment::{Emotion, Intensity, McpAssessment, Protocol, StressAssessment, StressLevel};
use super::domain::Domain;
use super::response::Response;

/// One answer with its heuristic assessment and protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessedAnswer {
    pub response: Response,
    pub assessment: StressAssessment,
    pub protocol: McpAssessment,
}

/// Aggregate of every assessed answer in one domain/check-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub individual_results: Vec<AssessedAnswer>,
    pub total_answers: usize,
    pub high_stress_count: usize,
    pub flagged_count: usize,
    pub escalated_count: usize,
    pub average_sentiment_score: f64,
    pub overall_stress_level: StressLevel,
    pub domains_needing_attention: BTreeSet<Domain>,
    pub mcp_protocol: Protocol,
    pub emotion_distribution: BTreeMap<Emotion, usize>,
    pub intensity_distribution: BTreeMap<Intensity, usize>,
}

impl BatchSummary {
    /// The no-data state for an empty batch
    pub fn empty() -> Self {
        Self {
            individual_results: Vec::new(),
            total_answers: 0,
            high_stress_count: 0,
            flagged_count: 0,
            escalated_count: 0,
            average_sentiment_score: 0.0,
            overall_stress_level: StressLevel::Low,
            domains_needing_attention: BTreeSet::new(),
            mcp_protocol: Protocol::Support,
            emotion_distribution: BTreeMap::new(),
            intensity_distribution: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_answers == 0
    }

    /// Share of answers matching a count, in percent
    pub fn percent(&self, count: usize) -> f64 {
        if self.total_answers == 0 {
            0.0
        } else {
            count as f64 / self.total_answers as f64 * 100.0
        }
    }

    /// Stressful answers in input order
    pub fn stressful_answers(&self) -> impl Iterator<Item = &AssessedAnswer> {
        self.individual_results
            .iter()
            .filter(|a| a.assessment.is_stressful)
    }
}

/// Deep-dive follow-up priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeepDivePriority {
    High,
    Medium,
}

impl fmt::Display for DeepDivePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeepDivePriority::High => write!(f, "high"),
            DeepDivePriority::Medium => write!(f, "medium"),
        }
    }
}

/// Whether a check-in warrants the follow-up flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepDiveDecision {
    pub needs_deep_dive: bool,
    pub flagged_questions: Vec<Response>,
    pub priority: DeepDivePriority,
}

/// A flagged question as handed to the follow-up UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlaggedQuestion {
    pub id: String,
    pub text: String,
    pub selected_option: String,
    pub stress_score: f64,
    pub emotion: Emotion,
    pub intensity: Intensity,
}

/// Wire payload for the deep-dive collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepDivePayload {
    pub flagged_questions: Vec<FlaggedQuestion>,
    pub domain_needs_review: bool,
    pub total_answers: usize,
}

/// Direction of stress between two check-ins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Worsening,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Improving => write!(f, "improving"),
            Trend::Worsening => write!(f, "worsening"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

/// Persisted per-domain summary of one check-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinSnapshot {
    pub checkin_id: Uuid,
    pub user_id: String,
    pub domain: Domain,
    pub recorded_at: DateTime<Utc>,
    pub average_sentiment: f64,
    pub high_stress_count: usize,
    pub total_answers: usize,
    pub overall_level: StressLevel,
    pub protocol: Protocol,
}

impl CheckinSnapshot {
    pub fn from_summary(
        user_id: impl Into<String>,
        domain: Domain,
        summary: &BatchSummary,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            checkin_id: Uuid::new_v4(),
            user_id: user_id.into(),
            domain,
            recorded_at,
            average_sentiment: summary.average_sentiment_score,
            high_stress_count: summary.high_stress_count,
            total_answers: summary.total_answers,
            overall_level: summary.overall_stress_level,
            protocol: summary.mcp_protocol,
        }
    }
}

/// Trend of one user/domain across check-ins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendRecord {
    pub domain: Domain,
    pub trend: Trend,
    /// Current average minus previous average
    pub average_delta: f64,
    pub current_level: StressLevel,
    pub current_protocol: Protocol,
    pub protocol_changed: bool,
    pub checkin_count: usize,
}
