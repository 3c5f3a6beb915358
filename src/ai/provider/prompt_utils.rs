//! Prompt helpers shared by providers without native schema support.

use serde_json::Value;

/// Append JSON schema instructions to a prompt
///
/// Returns the prompt unchanged if the schema is null.
pub fn build_schema_prompt(user_prompt: &str, schema: &Value) -> String {
    if schema.is_null() {
        return user_prompt.to_string();
    }

    let schema_str = serde_json::to_string_pretty(schema).unwrap_or_default();
    format!(
        "{}\n\n---\n\nRespond with a single JSON object matching this schema:\n```json\n{}\n```\n\nRespond ONLY with JSON, no explanation.",
        user_prompt, schema_str
    )
}

/// System message asking for a bare JSON reply
pub fn system_message(schema: &Value) -> String {
    const ROLE: &str = "You are a careful wellbeing screening assistant.";
    if schema.is_null() {
        return format!("{} Always respond with valid JSON.", ROLE);
    }
    build_schema_prompt(ROLE, schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_schema_keeps_prompt() {
        let prompt = "Rate this answer";
        assert_eq!(build_schema_prompt(prompt, &Value::Null), prompt);
    }

    #[test]
    fn test_schema_is_embedded() {
        let schema = json!({"type": "object", "properties": {"stress_score": {"type": "number"}}});
        let result = build_schema_prompt("Rate this answer", &schema);
        assert!(result.starts_with("Rate this answer"));
        assert!(result.contains("stress_score"));
        assert!(system_message(&schema).contains("wellbeing"));
    }
}
