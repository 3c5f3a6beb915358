//! JSON Repair
//!
//! Salvages JSON from model output. Handles:
//! - Markdown code fences (```json ... ```)
//! - Trailing commas
//! - Missing closing braces/brackets and unterminated strings
//! - JSON embedded in explanatory text

use serde_json::Value;
use tracing::debug;

use crate::types::AdvisoryError;

/// Extract and parse JSON from a model response
pub fn extract_json_from_response(content: &str) -> Result<Value, AdvisoryError> {
    JsonRepairer::new().parse_or_repair(content).map(|(value, _)| value)
}

/// JSON repair strategies, applied from least to most invasive
#[derive(Debug, Clone, Default)]
pub struct JsonRepairer;

impl JsonRepairer {
    pub fn new() -> Self {
        Self
    }

    /// Parse JSON, attempting repair if the initial parse fails
    ///
    /// Returns (value, was_repaired).
    pub fn parse_or_repair(&self, raw: &str) -> Result<(Value, bool), AdvisoryError> {
        let cleaned = Self::preprocess(raw);

        if let Ok(value) = serde_json::from_str::<Value>(&cleaned) {
            return Ok((value, false));
        }

        // Embedded object first, so prose around a complete object is dropped
        // before bracket balancing can make things worse.
        let candidates = [
            Self::extract_embedded(&cleaned),
            Some(Self::balance(&Self::strip_trailing_commas(&cleaned))),
            Self::extract_embedded(&cleaned)
                .or_else(|| cleaned.find('{').map(|i| cleaned[i..].to_string()))
                .map(|s| Self::balance(&Self::strip_trailing_commas(&s))),
        ];

        for candidate in candidates.into_iter().flatten() {
            if let Ok(value) = serde_json::from_str::<Value>(&candidate) {
                debug!("Repaired malformed JSON in advisory response");
                return Ok((value, true));
            }
        }

        Err(AdvisoryError::parse(format!(
            "No JSON found in response: {}",
            cleaned.chars().take(120).collect::<String>()
        )))
    }

    fn preprocess(raw: &str) -> String {
        let mut s = raw.trim().trim_start_matches('\u{feff}').trim();

        if s.starts_with("```") {
            s = s.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
        }
        s = s.trim_end();
        if let Some(stripped) = s.strip_suffix("```") {
            s = stripped;
        }

        s.trim().to_string()
    }

    /// Drop commas directly before a closing bracket
    fn strip_trailing_commas(s: &str) -> String {
        let chars: Vec<char> = s.chars().collect();
        let mut out = String::with_capacity(s.len());
        let mut in_string = false;
        let mut escape = false;

        for (i, &ch) in chars.iter().enumerate() {
            if in_string {
                match ch {
                    _ if escape => escape = false,
                    '\\' => escape = true,
                    '"' => in_string = false,
                    _ => {}
                }
                out.push(ch);
                continue;
            }

            if ch == '"' {
                in_string = true;
            } else if ch == ',' {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if matches!(next, Some('}') | Some(']')) {
                    continue;
                }
            }
            out.push(ch);
        }

        out
    }

    /// Close an unterminated string and any open brackets, innermost first
    fn balance(s: &str) -> String {
        let mut open = Vec::new();
        let mut in_string = false;
        let mut escape = false;

        for ch in s.chars() {
            if in_string {
                match ch {
                    _ if escape => escape = false,
                    '\\' => escape = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                '"' => in_string = true,
                '{' => open.push('}'),
                '[' => open.push(']'),
                '}' | ']' => {
                    open.pop();
                }
                _ => {}
            }
        }

        let mut out = s.trim_end().to_string();
        if in_string {
            out.push('"');
        }
        while let Some(closer) = open.pop() {
            out.push(closer);
        }
        out
    }

    /// First complete `{...}` object in mixed content
    fn extract_embedded(s: &str) -> Option<String> {
        let start = s.find('{')?;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escape = false;

        for (i, ch) in s[start..].char_indices() {
            if in_string {
                match ch {
                    _ if escape => escape = false,
                    '\\' => escape = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(s[start..start + i + 1].to_string());
                    }
                }
                _ => {}
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_json() {
        let (value, repaired) = JsonRepairer::new()
            .parse_or_repair(r#"{"stress_score": 0.5}"#)
            .unwrap();
        assert!(!repaired);
        assert_eq!(value["stress_score"], 0.5);
    }

    #[test]
    fn test_strip_code_fences() {
        let input = "```json\n{\"emotion\": \"anxious\"}\n```";
        let value = extract_json_from_response(input).unwrap();
        assert_eq!(value["emotion"], "anxious");
    }

    #[test]
    fn test_fix_trailing_comma() {
        let input = r#"{"emotion": "sad", "stress_score": 0.4,}"#;
        let (value, repaired) = JsonRepairer::new().parse_or_repair(input).unwrap();
        assert!(repaired);
        assert_eq!(value["emotion"], "sad");
    }

    #[test]
    fn test_comma_inside_string_is_kept() {
        let input = r#"{"rationale": "tired, }", "x": 1,}"#;
        let value = extract_json_from_response(input).unwrap();
        assert_eq!(value["rationale"], "tired, }");
    }

    #[test]
    fn test_balance_brackets() {
        let input = r#"{"stress_score": 0.7, "flags": ["panic""#;
        let (value, repaired) = JsonRepairer::new().parse_or_repair(input).unwrap();
        assert!(repaired);
        assert!(value["flags"].is_array());
    }

    #[test]
    fn test_extract_from_mixed() {
        let input = "Here's my assessment:\n{\"stress_score\": 0.2}\nTake care!";
        let (value, repaired) = JsonRepairer::new().parse_or_repair(input).unwrap();
        assert!(repaired);
        assert_eq!(value["stress_score"], 0.2);
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let err = extract_json_from_response("I cannot help with that.").unwrap_err();
        assert_eq!(err.category, crate::types::ErrorCategory::ParseError);
    }
}
