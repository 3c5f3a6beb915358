//! Dominant emotion by keyword frequency.

use crate::lexicon::{LexiconStore, PhraseMatcher};
use crate::types::{Emotion, Result};

/// Counts keyword occurrences per emotion and picks the highest
///
/// Ties go to the emotion declared first in [`Emotion`]; no hits at all
/// yields [`Emotion::Neutral`].
#[derive(Debug, Clone)]
pub struct EmotionClassifier {
    categories: Vec<(Emotion, PhraseMatcher)>,
}

impl EmotionClassifier {
    pub fn new(lexicon: &LexiconStore) -> Result<Self> {
        // BTreeMap iteration follows the Emotion declaration order
        let categories = lexicon
            .emotions
            .iter()
            .map(|(emotion, keywords)| Ok((*emotion, PhraseMatcher::new(keywords)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { categories })
    }

    pub fn classify(&self, text: &str) -> Emotion {
        let mut best = Emotion::Neutral;
        let mut best_count = 0;

        for (emotion, matcher) in &self.categories {
            let count = matcher.count(text);
            if count > best_count {
                best = *emotion;
                best_count = count;
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> EmotionClassifier {
        EmotionClassifier::new(&LexiconStore::builtin()).unwrap()
    }

    #[test]
    fn test_highest_count_wins() {
        let emotion = classifier().classify("worried and anxious, a bit frustrated");
        assert_eq!(emotion, Emotion::Anxious);
    }

    #[test]
    fn test_tie_goes_to_first_declared() {
        // one overwhelmed keyword, one sad keyword
        assert_eq!(classifier().classify("drained and lonely"), Emotion::Overwhelmed);
        // one stressed keyword, one positive keyword
        assert_eq!(classifier().classify("pressure but calm"), Emotion::Stressed);
    }

    #[test]
    fn test_defaults_to_neutral() {
        assert_eq!(classifier().classify("the train was late"), Emotion::Neutral);
    }

    #[test]
    fn test_drained_is_overwhelmed() {
        let text = "over the past two weeks, how often have you felt emotionally drained by your work? very often";
        assert_eq!(classifier().classify(text), Emotion::Overwhelmed);
    }
}
