//! Domain-specific correction of the sentiment score.

use std::collections::{BTreeSet, HashMap};

use tracing::warn;

use crate::constants::scoring::MAX_DOMAIN_ADJUSTMENT;
use crate::lexicon::{LexiconStore, PhraseMatcher};
use crate::types::{Domain, Result};

/// Outcome of matching one text against a domain table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainSignal {
    /// Bounded correction added to the pattern score
    pub adjustment: f64,
    /// Raw matched intensifier weight, floored at 0
    pub stress_score: f64,
    /// Topic keywords and intensifier phrases that matched
    pub keywords: BTreeSet<String>,
}

#[derive(Debug, Clone)]
struct CompiledDomain {
    keywords: PhraseMatcher,
    phrases: PhraseMatcher,
    weights: Vec<f64>,
}

/// Applies per-domain intensifier tables
#[derive(Debug, Clone)]
pub struct DomainAdjuster {
    domains: HashMap<String, CompiledDomain>,
}

impl DomainAdjuster {
    pub fn new(lexicon: &LexiconStore) -> Result<Self> {
        let mut domains = HashMap::with_capacity(lexicon.domains.len());
        for (key, table) in &lexicon.domains {
            let phrases: Vec<&str> = table.adjustments.iter().map(|a| a.phrase.as_str()).collect();
            domains.insert(
                key.clone(),
                CompiledDomain {
                    keywords: PhraseMatcher::new(&table.keywords)?,
                    phrases: PhraseMatcher::new(&phrases)?,
                    weights: table.adjustments.iter().map(|a| a.weight).collect(),
                },
            );
        }
        Ok(Self { domains })
    }

    /// Match normalized text against the domain's tables
    ///
    /// Unknown domains (and known domains missing from a custom lexicon)
    /// contribute nothing.
    pub fn adjust(&self, domain: &Domain, text: &str) -> DomainSignal {
        let compiled = match domain {
            Domain::Unknown(label) => {
                warn!(domain = %label, "Unknown domain, no domain adjustment applied");
                None
            }
            known => {
                let found = self.domains.get(known.key());
                if found.is_none() {
                    warn!(domain = %known, "No lexicon table for domain");
                }
                found
            }
        };

        let Some(compiled) = compiled else {
            return DomainSignal::default();
        };

        let mut keywords: BTreeSet<String> = compiled
            .keywords
            .matched(text)
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut raw = 0.0;
        let matched_phrases = compiled.phrases.matched_indices(text);
        for index in matched_phrases {
            raw += compiled.weights[index];
            keywords.insert(compiled.phrases.phrase(index).to_string());
        }

        DomainSignal {
            adjustment: raw.clamp(-MAX_DOMAIN_ADJUSTMENT, MAX_DOMAIN_ADJUSTMENT),
            stress_score: raw.max(0.0),
            keywords,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::normalize_text;

    fn adjuster() -> DomainAdjuster {
        DomainAdjuster::new(&LexiconStore::builtin()).unwrap()
    }

    #[test]
    fn test_work_intensifiers() {
        let signal = adjuster().adjust(&Domain::WorkCareer, "my boss is toxic");
        assert!((signal.adjustment - 0.2).abs() < 1e-9);
        assert!((signal.stress_score - 0.2).abs() < 1e-9);
        assert!(signal.keywords.contains("boss"));
        assert!(signal.keywords.contains("toxic"));
    }

    #[test]
    fn test_adjustment_is_bounded_but_stress_score_is_not() {
        let text = normalize_text("A toxic, hostile office and I'm overworked");
        let signal = adjuster().adjust(&Domain::WorkCareer, &text);
        assert!((signal.adjustment - 0.2).abs() < 1e-9);
        assert!((signal.stress_score - 0.55).abs() < 1e-9);
    }

    #[test]
    fn test_negative_weights_soften() {
        let signal = adjuster().adjust(&Domain::WorkCareer, "we have flexible hours");
        assert!((signal.adjustment + 0.05).abs() < 1e-9);
        assert_eq!(signal.stress_score, 0.0);
    }

    #[test]
    fn test_domain_tables_do_not_leak() {
        let signal = adjuster().adjust(&Domain::Health, "my boss is toxic");
        assert_eq!(signal, DomainSignal::default());
    }

    #[test]
    fn test_unknown_domain_applies_nothing() {
        let signal = adjuster().adjust(&Domain::parse("Hobbies"), "toxic hostile overworked");
        assert_eq!(signal.adjustment, 0.0);
        assert_eq!(signal.stress_score, 0.0);
        assert!(signal.keywords.is_empty());
    }
}
