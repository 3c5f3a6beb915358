//! Weighted pattern tiers.

use crate::lexicon::{LexiconStore, PatternMatcher};
use crate::types::Result;

/// Frequency-weighted average of tier weights over every pattern hit
///
/// A text with no hits scores 0.
#[derive(Debug, Clone)]
pub struct PatternScorer {
    tiers: Vec<(f64, PatternMatcher)>,
}

impl PatternScorer {
    pub fn new(lexicon: &LexiconStore) -> Result<Self> {
        let tiers = lexicon
            .pattern_tiers
            .iter()
            .map(|tier| Ok((tier.weight, PatternMatcher::new(&tier.patterns)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { tiers })
    }

    /// Score normalized text
    pub fn score(&self, text: &str) -> f64 {
        let mut weighted = 0.0;
        let mut total = 0usize;

        for (weight, matcher) in &self.tiers {
            let hits = matcher.count(text);
            weighted += weight * hits as f64;
            total += hits;
        }

        if total == 0 {
            0.0
        } else {
            weighted / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> PatternScorer {
        PatternScorer::new(&LexiconStore::builtin()).unwrap()
    }

    #[test]
    fn test_no_match_scores_zero() {
        assert_eq!(scorer().score("the weather is mild today"), 0.0);
    }

    #[test]
    fn test_single_tier_scores_its_weight() {
        assert!((scorer().score("i feel overwhelmed") - 0.9).abs() < 1e-9);
        assert!((scorer().score("rarely") - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_mixed_tiers_average_by_frequency() {
        // overwhelmed (0.9), often (0.6), rarely (0.3)
        let score = scorer().score("how often do you feel overwhelmed? rarely");
        assert!((score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_average_not_sum() {
        let score = scorer().score("never never never always");
        assert!((score - 0.9).abs() < 1e-9);
    }
}
