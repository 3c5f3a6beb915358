//! Built-in lexicon tables.

use std::collections::BTreeMap;

use super::{Adjustment, DomainLexicon, IntensityCues, LexiconStore, PatternTier, PatternTiers};
use crate::constants::scoring;
use crate::types::Emotion;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn adjustments(items: &[(&str, f64)]) -> Vec<Adjustment> {
    items
        .iter()
        .map(|(phrase, weight)| Adjustment::new(*phrase, *weight))
        .collect()
}

pub(super) fn lexicon() -> LexiconStore {
    LexiconStore {
        red_flags: strings(&[
            "burnout",
            "burned out",
            "burnt out",
            "worthless",
            "hopeless",
            "isolated",
            "can't take it",
            "giving up",
            "panic",
            "can't go on",
            "no way out",
            "breaking point",
            "hurt myself",
            "end it all",
        ]),
        high_intensity_emotions: vec![Emotion::Overwhelmed, Emotion::Anxious, Emotion::Frustrated],
        pattern_tiers: pattern_tiers(),
        emotions: emotions(),
        intensity_cues: IntensityCues {
            high: strings(&[
                "very often",
                "always",
                "constantly",
                "never",
                "not at all",
                "completely",
                "extremely",
                "all the time",
            ]),
            moderate: strings(&[
                "often",
                "sometimes",
                "frequently",
                "mostly",
                "somewhat",
                "fairly",
            ]),
            low: strings(&[
                "rarely",
                "occasionally",
                "slightly",
                "a bit",
                "a little",
                "hardly ever",
                "seldom",
            ]),
        },
        domains: domains(),
    }
}

fn pattern_tiers() -> PatternTiers {
    PatternTiers {
        high: PatternTier {
            weight: scoring::HIGH_TIER_WEIGHT,
            patterns: strings(&[
                r"\boverwhelm(ed|ing)?\b",
                r"\bcan'?t take it\b",
                r"\bnever\b",
                r"\balways\b",
                r"\bvery often\b",
                r"\bnot at all\b",
                r"\bexhausted\b",
                r"\bdrained\b",
                r"\bconstantly\b",
                r"\bunbearable\b",
            ]),
        },
        moderate: PatternTier {
            weight: scoring::MODERATE_TIER_WEIGHT,
            patterns: strings(&[
                r"\boften\b",
                r"\bsometimes\b",
                r"\bstress(ed|ful)?\b",
                r"\bfrustrat(ed|ing)\b",
                r"\bpressure\b",
                r"\bworr(ied|y)\b",
                r"\banxious\b",
                r"\btired\b",
            ]),
        },
        low: PatternTier {
            weight: scoring::LOW_TIER_WEIGHT,
            patterns: strings(&[
                r"\brarely\b",
                r"\boccasionally\b",
                r"\bmanag(ing|eable)\b",
                r"\bcoping\b",
                r"\bsupport(ed|ive)?\b",
                r"\bhardly ever\b",
            ]),
        },
    }
}

fn emotions() -> BTreeMap<Emotion, Vec<String>> {
    BTreeMap::from([
        (
            Emotion::Overwhelmed,
            strings(&[
                "overwhelmed",
                "drained",
                "exhausted",
                "too much",
                "burned out",
                "burnt out",
                "can't cope",
                "swamped",
            ]),
        ),
        (
            Emotion::Anxious,
            strings(&[
                "anxious", "anxiety", "worried", "worry", "nervous", "panic", "uneasy", "on edge",
            ]),
        ),
        (
            Emotion::Frustrated,
            strings(&[
                "frustrated",
                "frustrating",
                "annoyed",
                "irritated",
                "angry",
                "fed up",
                "unfair",
            ]),
        ),
        (
            Emotion::Sad,
            strings(&[
                "sad", "depressed", "lonely", "unhappy", "hopeless", "empty", "isolated", "down",
            ]),
        ),
        (
            Emotion::Stressed,
            strings(&[
                "stressed",
                "stress",
                "stressful",
                "pressure",
                "tense",
                "deadline",
                "strained",
            ]),
        ),
        (
            Emotion::Confused,
            strings(&["confused", "unsure", "uncertain", "lost", "don't know", "unclear"]),
        ),
        (
            Emotion::Neutral,
            strings(&["okay", "fine", "normal", "average", "neither"]),
        ),
        (
            Emotion::Positive,
            strings(&[
                "good",
                "great",
                "happy",
                "calm",
                "relaxed",
                "confident",
                "content",
                "supported",
            ]),
        ),
    ])
}

fn domains() -> BTreeMap<String, DomainLexicon> {
    BTreeMap::from([
        (
            "work".to_string(),
            DomainLexicon {
                keywords: strings(&[
                    "work",
                    "job",
                    "boss",
                    "manager",
                    "deadline",
                    "workload",
                    "career",
                    "colleague",
                    "coworker",
                    "office",
                    "overtime",
                    "promotion",
                ]),
                adjustments: adjustments(&[
                    ("toxic", 0.20),
                    ("hostile", 0.20),
                    ("overworked", 0.15),
                    ("burnout", 0.15),
                    ("micromanaged", 0.10),
                    ("underappreciated", 0.10),
                    ("supportive team", -0.10),
                    ("flexible hours", -0.05),
                ]),
            },
        ),
        (
            "personal".to_string(),
            DomainLexicon {
                keywords: strings(&[
                    "family",
                    "partner",
                    "friends",
                    "relationship",
                    "home",
                    "children",
                    "kids",
                    "parents",
                    "marriage",
                ]),
                adjustments: adjustments(&[
                    ("abusive", 0.20),
                    ("toxic relationship", 0.20),
                    ("lonely", 0.15),
                    ("betrayed", 0.15),
                    ("conflict", 0.10),
                    ("arguing", 0.10),
                    ("neglected", 0.10),
                    ("close friends", -0.10),
                ]),
            },
        ),
        (
            "financial".to_string(),
            DomainLexicon {
                keywords: strings(&[
                    "money", "debt", "bills", "rent", "mortgage", "salary", "savings", "expenses",
                    "loan", "budget",
                ]),
                adjustments: adjustments(&[
                    ("bankrupt", 0.20),
                    ("eviction", 0.20),
                    ("drowning in debt", 0.15),
                    ("can't afford", 0.15),
                    ("overdue", 0.10),
                    ("paycheck to paycheck", 0.10),
                    ("emergency fund", -0.10),
                    ("debt-free", -0.10),
                ]),
            },
        ),
        (
            "health".to_string(),
            DomainLexicon {
                keywords: strings(&[
                    "sleep",
                    "pain",
                    "illness",
                    "doctor",
                    "energy",
                    "diet",
                    "exercise",
                    "symptoms",
                    "medication",
                ]),
                adjustments: adjustments(&[
                    ("chronic pain", 0.20),
                    ("insomnia", 0.15),
                    ("can't sleep", 0.15),
                    ("sick", 0.10),
                    ("fatigue", 0.10),
                    ("exercising regularly", -0.10),
                    ("sleeping well", -0.10),
                ]),
            },
        ),
        (
            "self_worth".to_string(),
            DomainLexicon {
                keywords: strings(&[
                    "confidence",
                    "self-esteem",
                    "identity",
                    "worth",
                    "purpose",
                    "value",
                    "failure",
                    "comparison",
                ]),
                adjustments: adjustments(&[
                    ("i'm a failure", 0.20),
                    ("not good enough", 0.20),
                    ("impostor", 0.15),
                    ("ashamed", 0.15),
                    ("compare myself", 0.10),
                    ("insecure", 0.10),
                    ("proud of myself", -0.10),
                ]),
            },
        ),
    ])
}
