//! Compiled phrase and pattern matchers over normalized text.

use regex::{Regex, RegexBuilder};

use crate::types::{Result, StressError};

/// Lower-case, fold typographic apostrophes and collapse whitespace
pub fn normalize_text(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{02BC}' | '`' => '\'',
            other => other,
        })
        .collect::<String>()
        .to_lowercase();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Word-bounded literal phrase list
///
/// Apostrophes are optional (`can't` also matches `cant`) and inner
/// whitespace matches any run of whitespace.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    entries: Vec<(String, Regex)>,
}

impl PhraseMatcher {
    pub fn new<S: AsRef<str>>(phrases: &[S]) -> Result<Self> {
        let entries = phrases
            .iter()
            .map(|p| {
                let phrase = normalize_text(p.as_ref());
                let regex = compile(&phrase_pattern(&phrase))?;
                Ok((phrase, regex))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// True if any phrase occurs
    pub fn any(&self, text: &str) -> bool {
        self.entries.iter().any(|(_, re)| re.is_match(text))
    }

    /// Phrases that occur at least once, in declaration order
    pub fn matched(&self, text: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(phrase, _)| phrase.as_str())
            .collect()
    }

    /// Indices of phrases that occur at least once
    pub fn matched_indices(&self, text: &str) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, (_, re))| re.is_match(text))
            .map(|(i, _)| i)
            .collect()
    }

    /// Normalized phrase at `index`
    pub fn phrase(&self, index: usize) -> &str {
        &self.entries[index].0
    }

    /// Total occurrences of all phrases
    pub fn count(&self, text: &str) -> usize {
        self.entries
            .iter()
            .map(|(_, re)| re.find_iter(text).count())
            .sum()
    }
}

/// Raw regular-expression list, counted by occurrences
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    patterns: Vec<Regex>,
}

impl PatternMatcher {
    pub fn new<S: AsRef<str>>(sources: &[S]) -> Result<Self> {
        let patterns = sources
            .iter()
            .map(|s| compile(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Total occurrences across all patterns
    pub fn count(&self, text: &str) -> usize {
        self.patterns.iter().map(|re| re.find_iter(text).count()).sum()
    }
}

fn phrase_pattern(phrase: &str) -> String {
    let escaped = regex::escape(phrase)
        .replace('\'', "'?")
        .replace(' ', r"\s+");
    format!(r"\b{}\b", escaped)
}

fn compile(source: &str) -> Result<Regex> {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .map_err(|e| StressError::Config(format!("Invalid lexicon pattern '{}': {}", source, e)))
}
