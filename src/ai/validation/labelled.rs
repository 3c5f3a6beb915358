//! Fallback for models that answer in `key: value` prose instead of JSON.

use regex::Regex;
use std::sync::LazyLock;

static SCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\W*(?:stress[ _]?)?score\W*[:=]\s*([01](?:\.\d+)?|\.\d+)")
        .expect("valid regex")
});

static EMOTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\W*emotion\W*[:=]\s*([a-z]+)").expect("valid regex")
});

static STRESSFUL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\W*(?:is[ _]?)?stressful\W*[:=]\s*(true|false|yes|no)")
        .expect("valid regex")
});

static RATIONALE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\W*(?:rationale|reason)\W*[:=]\s*(.+)$")
        .expect("valid regex")
});

/// Fields recovered from labelled text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelledFields {
    pub score: Option<f64>,
    pub emotion: Option<String>,
    pub is_stressful: Option<bool>,
    pub rationale: Option<String>,
}

/// Pull `score:`, `emotion:`, `stressful:` and `rationale:` lines out of text
///
/// Returns `None` when no score line is present.
pub fn parse_labelled(text: &str) -> Option<LabelledFields> {
    let score = SCORE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())?;

    let capture = |re: &Regex| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
    };

    Some(LabelledFields {
        score: Some(score),
        emotion: capture(&EMOTION).map(|e| e.to_lowercase()),
        is_stressful: capture(&STRESSFUL)
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "yes")),
        rationale: capture(&RATIONALE),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_labelled_lines() {
        let text = "Assessment\nScore: 0.72\nEmotion: Anxious\nStressful: yes\nRationale: frequent worry about deadlines";
        let fields = parse_labelled(text).unwrap();
        assert_eq!(fields.score, Some(0.72));
        assert_eq!(fields.emotion.as_deref(), Some("anxious"));
        assert_eq!(fields.is_stressful, Some(true));
        assert_eq!(
            fields.rationale.as_deref(),
            Some("frequent worry about deadlines")
        );
    }

    #[test]
    fn test_stress_score_label_and_bullets() {
        let fields = parse_labelled("- stress_score = 0.4\n- emotion = sad").unwrap();
        assert_eq!(fields.score, Some(0.4));
        assert_eq!(fields.emotion.as_deref(), Some("sad"));
        assert_eq!(fields.is_stressful, None);
    }

    #[test]
    fn test_missing_score_is_none() {
        assert!(parse_labelled("Emotion: calm").is_none());
        assert!(parse_labelled("I'd rather not say").is_none());
    }
}
