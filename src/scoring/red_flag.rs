//! Crisis and burnout phrase detection.

use std::collections::BTreeSet;

use crate::lexicon::{LexiconStore, PhraseMatcher};
use crate::types::Result;

#[derive(Debug, Clone)]
pub struct RedFlagDetector {
    matcher: PhraseMatcher,
}

impl RedFlagDetector {
    pub fn new(lexicon: &LexiconStore) -> Result<Self> {
        Ok(Self {
            matcher: PhraseMatcher::new(&lexicon.red_flags)?,
        })
    }

    pub fn is_flagged(&self, text: &str) -> bool {
        self.matcher.any(text)
    }

    /// Every red-flag phrase present in normalized text
    pub fn detect(&self, text: &str) -> BTreeSet<String> {
        self.matcher
            .matched(text)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
