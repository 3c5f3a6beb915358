//! Lexicon Store
//!
//! Immutable tables of red-flag phrases, weighted stress patterns, emotion
//! keywords, frequency cues and per-domain keyword/adjustment tables.
//!
//! The store is plain data. It is built once (from [`LexiconStore::builtin`]
//! or a TOML file) and injected into the scorers, so tests can swap in an
//! alternate lexicon without touching process-wide state.

mod builtin;
mod matcher;

pub use matcher::{PatternMatcher, PhraseMatcher, normalize_text};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::types::{Domain, Emotion, Result, StressError};

/// Shared lexicon handle
pub type SharedLexicon = Arc<LexiconStore>;

/// Complete lexicon used by the heuristic pipeline
///
/// Sections missing from a TOML file fall back to the built-in tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconStore {
    /// Crisis and burnout phrases
    pub red_flags: Vec<String>,
    /// Emotions that imply high intensity when no frequency cue is present
    pub high_intensity_emotions: Vec<Emotion>,
    pub pattern_tiers: PatternTiers,
    /// Keywords per emotion; ties resolve in [`Emotion`] declaration order
    pub emotions: BTreeMap<Emotion, Vec<String>>,
    pub intensity_cues: IntensityCues,
    /// Keyed by [`Domain::key`]
    pub domains: BTreeMap<String, DomainLexicon>,
}

/// Weighted pattern tiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternTiers {
    pub high: PatternTier,
    pub moderate: PatternTier,
    pub low: PatternTier,
}

impl PatternTiers {
    pub fn iter(&self) -> impl Iterator<Item = &PatternTier> {
        [&self.high, &self.moderate, &self.low].into_iter()
    }
}

/// One tier: a weight and the regular expressions that earn it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternTier {
    pub weight: f64,
    pub patterns: Vec<String>,
}

/// Frequency-adverb phrases by intensity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntensityCues {
    pub high: Vec<String>,
    pub moderate: Vec<String>,
    pub low: Vec<String>,
}

/// Domain topic keywords and intensifier adjustments
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainLexicon {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub adjustments: Vec<Adjustment>,
}

/// Intensifier phrase with its additive weight (negative weights soften)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adjustment {
    pub phrase: String,
    pub weight: f64,
}

impl Adjustment {
    pub fn new(phrase: impl Into<String>, weight: f64) -> Self {
        Self {
            phrase: phrase.into(),
            weight,
        }
    }
}

impl Default for LexiconStore {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LexiconStore {
    /// The built-in lexicon
    pub fn builtin() -> Self {
        builtin::lexicon()
    }

    /// Load an alternate lexicon from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let lexicon: Self = toml::from_str(content)
            .map_err(|e| StressError::Config(format!("Invalid lexicon: {}", e)))?;
        lexicon.validate()?;
        Ok(lexicon)
    }

    /// Tables for a domain, if the domain is known to this lexicon
    pub fn domain(&self, domain: &Domain) -> Option<&DomainLexicon> {
        if !domain.is_known() {
            return None;
        }
        self.domains.get(domain.key())
    }

    /// Check weights are usable
    pub fn validate(&self) -> Result<()> {
        for tier in self.pattern_tiers.iter() {
            if !(0.0..=1.0).contains(&tier.weight) {
                return Err(StressError::Config(format!(
                    "Pattern tier weight must be between 0.0 and 1.0, got {}",
                    tier.weight
                )));
            }
        }
        Ok(())
    }

    pub fn shared(self) -> SharedLexicon {
        Arc::new(self)
    }
}
