//! Trend Analysis
//!
//! Compares the two most recent check-ins of one user/domain, and folds
//! domain trends into one overall direction by majority vote.

use std::collections::HashMap;

use crate::constants::trend::{MIN_CHECKINS, STABLE_DELTA};
use crate::types::{CheckinSnapshot, Trend, TrendRecord};

#[derive(Debug, Clone, Copy, Default)]
pub struct TrendAnalyzer;

impl TrendAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// `None` until the domain has at least two check-ins
    pub fn analyze_domain(&self, history: &[CheckinSnapshot]) -> Option<TrendRecord> {
        if history.len() < MIN_CHECKINS {
            return None;
        }

        let mut ordered: Vec<&CheckinSnapshot> = history.iter().collect();
        ordered.sort_by_key(|s| s.recorded_at);

        let [.., previous, current] = ordered.as_slice() else {
            return None;
        };

        let delta = current.average_sentiment - previous.average_sentiment;

        Some(TrendRecord {
            domain: current.domain.clone(),
            trend: Self::classify(delta),
            average_delta: delta,
            current_level: current.overall_level,
            current_protocol: current.protocol,
            protocol_changed: current.protocol != previous.protocol,
            checkin_count: ordered.len(),
        })
    }

    fn classify(delta: f64) -> Trend {
        if delta.abs() < STABLE_DELTA {
            Trend::Stable
        } else if delta < 0.0 {
            Trend::Improving
        } else {
            Trend::Worsening
        }
    }

    /// Majority vote; a tie or no records is stable
    pub fn overall_trend(&self, records: &[TrendRecord]) -> Trend {
        let mut votes: HashMap<Trend, usize> = HashMap::new();
        for record in records {
            *votes.entry(record.trend).or_default() += 1;
        }

        let Some(&top) = votes.values().max() else {
            return Trend::Stable;
        };

        let mut leaders = votes.iter().filter(|(_, count)| **count == top);
        match (leaders.next(), leaders.next()) {
            (Some((trend, _)), None) => *trend,
            _ => Trend::Stable,
        }
    }
}
