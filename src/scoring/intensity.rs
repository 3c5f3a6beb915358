//! Answer intensity from frequency cues.

use std::collections::BTreeSet;

use crate::lexicon::{LexiconStore, PhraseMatcher};
use crate::types::{Emotion, Intensity, Result};

#[derive(Debug, Clone)]
pub struct IntensityClassifier {
    high: PhraseMatcher,
    moderate: PhraseMatcher,
    low: PhraseMatcher,
    high_intensity_emotions: BTreeSet<Emotion>,
}

impl IntensityClassifier {
    pub fn new(lexicon: &LexiconStore) -> Result<Self> {
        let cues = &lexicon.intensity_cues;
        Ok(Self {
            high: PhraseMatcher::new(&cues.high)?,
            moderate: PhraseMatcher::new(&cues.moderate)?,
            low: PhraseMatcher::new(&cues.low)?,
            high_intensity_emotions: lexicon.high_intensity_emotions.iter().copied().collect(),
        })
    }

    /// Classify normalized answer text
    ///
    /// Cue tiers are checked high first so "very often" never reads as
    /// "often". Without any cue, high-intensity emotions fall back to high.
    pub fn classify(&self, answer: &str, emotion: Emotion) -> Intensity {
        if self.high.any(answer) {
            Intensity::High
        } else if self.moderate.any(answer) {
            Intensity::Moderate
        } else if self.low.any(answer) {
            Intensity::Low
        } else if self.high_intensity_emotions.contains(&emotion) {
            Intensity::High
        } else {
            Intensity::Moderate
        }
    }
}
