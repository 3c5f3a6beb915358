//! Survey Responses
//!
//! [`SubmittedAnswer`] is the loosely-typed shape received from the survey
//! layer; [`Response`] is the validated, immutable form that enters scoring.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::Domain;
use super::error::{StressError, ValidationError};

/// Raw answer as submitted by the survey/chat collaborator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    #[serde(default, alias = "id")]
    pub question_id: Option<String>,
    #[serde(default, alias = "question")]
    pub question_text: Option<String>,
    #[serde(default, alias = "answer", alias = "selectedOption")]
    pub answer_text: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl SubmittedAnswer {
    pub fn new(
        question_id: impl Into<String>,
        question_text: impl Into<String>,
        answer_text: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            question_id: Some(question_id.into()),
            question_text: Some(question_text.into()),
            answer_text: Some(answer_text.into()),
            domain: Some(domain.into()),
            timestamp: None,
        }
    }
}

/// A validated survey answer. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub question_id: String,
    pub question_text: String,
    pub answer_text: String,
    pub domain: Domain,
    pub timestamp: DateTime<Utc>,
}

impl Response {
    /// Build a response directly, bypassing submission validation
    pub fn new(
        question_id: impl Into<String>,
        question_text: impl Into<String>,
        answer_text: impl Into<String>,
        domain: Domain,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            question_text: question_text.into(),
            answer_text: answer_text.into(),
            domain,
            timestamp: Utc::now(),
        }
    }

    /// Question and answer joined, the text the pattern scorer reads
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.question_text, self.answer_text)
    }
}

impl TryFrom<SubmittedAnswer> for Response {
    type Error = StressError;

    fn try_from(raw: SubmittedAnswer) -> Result<Self, Self::Error> {
        let question_id = required(raw.question_id, "questionId")?;
        let answer_text = required(raw.answer_text, "answerText")?;
        let domain = required(raw.domain, "domain")?;

        Ok(Self {
            question_id,
            question_text: raw.question_text.unwrap_or_default(),
            answer_text,
            domain: Domain::parse(&domain),
            timestamp: raw.timestamp.unwrap_or_else(Utc::now),
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::missing(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::error::ValidationErrorKind;

    #[test]
    fn test_valid_submission_converts() {
        let raw = SubmittedAnswer::new("q1", "How often?", "Sometimes", "work");
        let response = Response::try_from(raw).unwrap();
        assert_eq!(response.question_id, "q1");
        assert_eq!(response.domain, Domain::WorkCareer);
        assert_eq!(response.combined_text(), "How often? Sometimes");
    }

    #[test]
    fn test_missing_answer_is_rejected() {
        let mut raw = SubmittedAnswer::new("q1", "How often?", "", "work");
        raw.answer_text = Some("   ".to_string());
        match Response::try_from(raw) {
            Err(StressError::Validation(err)) => {
                assert_eq!(err.kind, ValidationErrorKind::MissingField);
                assert_eq!(err.field.as_deref(), Some("answerText"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_domain_and_id_are_rejected() {
        let raw = SubmittedAnswer {
            question_id: None,
            ..SubmittedAnswer::new("q1", "Q", "A", "work")
        };
        assert!(matches!(
            Response::try_from(raw),
            Err(StressError::Validation(_))
        ));

        let raw = SubmittedAnswer {
            domain: None,
            ..SubmittedAnswer::new("q1", "Q", "A", "work")
        };
        assert!(matches!(
            Response::try_from(raw),
            Err(StressError::Validation(_))
        ));
    }

    #[test]
    fn test_deserialize_camel_case_payload() {
        let json = r#"{"questionId":"q7","questionText":"Sleep ok?","answerText":"Rarely","domain":"Health"}"#;
        let raw: SubmittedAnswer = serde_json::from_str(json).unwrap();
        let response = Response::try_from(raw).unwrap();
        assert_eq!(response.domain, Domain::Health);
        assert_eq!(response.answer_text, "Rarely");
    }
}
