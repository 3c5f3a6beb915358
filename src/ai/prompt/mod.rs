//! Prompt Builder
//!
//! Structured prompt construction for the advisory cross-check. The prompt
//! carries only the survey answer itself, never the heuristic result, so the
//! advisory score stays independent.

use serde_json::{Value, json};

use crate::types::{Emotion, Response};

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Role definition with expertise area
    Role { expertise: String, task: String },
    /// Numbered objectives
    Objectives(Vec<String>),
    /// Ordered key-value context
    Context(Vec<(String, String)>),
    /// Hard constraints on the answer
    Rules(Vec<String>),
    /// Raw text section with optional header
    Text {
        header: Option<String>,
        content: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(mut self, expertise: &str, task: &str) -> Self {
        self.sections.push(PromptSection::Role {
            expertise: expertise.to_string(),
            task: task.to_string(),
        });
        self
    }

    pub fn objectives(mut self, objectives: Vec<&str>) -> Self {
        self.sections.push(PromptSection::Objectives(
            objectives.into_iter().map(String::from).collect(),
        ));
        self
    }

    /// Add a context item, appending to the existing context section
    pub fn context_item(mut self, key: &str, value: &str) -> Self {
        let item = (key.to_string(), value.to_string());
        let existing = self.sections.iter_mut().find_map(|s| match s {
            PromptSection::Context(items) => Some(items),
            _ => None,
        });
        match existing {
            Some(items) => items.push(item),
            None => self.sections.push(PromptSection::Context(vec![item])),
        }
        self
    }

    pub fn rules(mut self, rules: Vec<&str>) -> Self {
        self.sections.push(PromptSection::Rules(
            rules.into_iter().map(String::from).collect(),
        ));
        self
    }

    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: Some(header.to_string()),
            content: content.to_string(),
        });
        self
    }

    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Role { expertise, task } => {
                    prompt.push_str("<ROLE>\n");
                    prompt.push_str(&format!("You are a {} {}.\n", expertise, task));
                    prompt.push_str("</ROLE>\n\n");
                }
                PromptSection::Objectives(objectives) => {
                    prompt.push_str("<OBJECTIVES>\n");
                    for (i, obj) in objectives.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, obj));
                    }
                    prompt.push_str("</OBJECTIVES>\n\n");
                }
                PromptSection::Context(items) => {
                    prompt.push_str("# Survey Answer\n\n");
                    for (key, value) in items {
                        prompt.push_str(&format!("**{}**: {}\n", key, value));
                    }
                    prompt.push('\n');
                }
                PromptSection::Rules(rules) => {
                    prompt.push_str("<RULES>\n");
                    for rule in rules {
                        prompt.push_str(&format!("- {}\n", rule));
                    }
                    prompt.push_str("</RULES>\n\n");
                }
                PromptSection::Text { header, content } => {
                    if let Some(h) = header {
                        prompt.push_str(&format!("# {}\n\n", h));
                    }
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

/// Prompt asking for an independent stress rating of one answer
pub fn advisory_prompt(response: &Response) -> String {
    PromptBuilder::new()
        .role(
            "careful wellbeing screening assistant",
            "rating stress signals in short survey answers",
        )
        .objectives(vec![
            "Rate how much stress the answer expresses, from 0.0 (none) to 1.0 (severe)",
            "Name the single dominant emotion",
            "Decide whether the answer should be treated as stressful",
            "Give a one-sentence rationale quoting the words that drove the rating",
        ])
        .context_item("Life area", response.domain.label())
        .context_item("Question", &response.question_text)
        .context_item("Answer", &response.answer_text)
        .rules(vec![
            "Judge only the text shown; do not infer a diagnosis",
            "Frequency words such as \"very often\" or \"always\" raise the rating",
            "Crisis language (hopelessness, giving up, self-harm) is always stressful",
        ])
        .section(
            "Emotions",
            &Emotion::ALL
                .iter()
                .map(|e| e.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        )
        .build()
}

/// JSON schema of the expected advisory reply
pub fn advisory_schema() -> Value {
    let emotions: Vec<&str> = Emotion::ALL.iter().map(|e| e.as_str()).collect();
    json!({
        "type": "object",
        "properties": {
            "stress_score": {"type": "number", "minimum": 0.0, "maximum": 1.0},
            "emotion": {"type": "string", "enum": emotions},
            "is_stressful": {"type": "boolean"},
            "rationale": {"type": "string"}
        },
        "required": ["stress_score", "emotion", "is_stressful"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Domain;

    #[test]
    fn test_basic_prompt() {
        let prompt = PromptBuilder::new()
            .role("screening assistant", "for surveys")
            .objectives(vec!["Rate stress", "Name emotion"])
            .build();

        assert!(prompt.contains("<ROLE>"));
        assert!(prompt.contains("1. Rate stress"));
        assert!(prompt.contains("2. Name emotion"));
    }

    #[test]
    fn test_context_items_keep_order() {
        let prompt = PromptBuilder::new()
            .context_item("Question", "How often?")
            .context_item("Answer", "Rarely")
            .build();

        let q = prompt.find("**Question**: How often?").unwrap();
        let a = prompt.find("**Answer**: Rarely").unwrap();
        assert!(q < a);
        assert_eq!(prompt.matches("# Survey Answer").count(), 1);
    }

    #[test]
    fn test_advisory_prompt_carries_answer_only() {
        let response = Response::new("q1", "How often do you feel drained?", "Always", Domain::Health);
        let prompt = advisory_prompt(&response);
        assert!(prompt.contains("How often do you feel drained?"));
        assert!(prompt.contains("**Answer**: Always"));
        assert!(prompt.contains("**Life area**: Health"));
        assert!(prompt.contains("overwhelmed, anxious"));
    }

    #[test]
    fn test_schema_lists_emotions() {
        let schema = advisory_schema();
        assert_eq!(schema["properties"]["emotion"]["enum"][7], "positive");
        assert_eq!(schema["required"][0], "stress_score");
    }
}
