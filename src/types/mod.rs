pub mod assessment;
pub mod domain;
pub mod error;
pub mod response;
pub mod summary;

pub use assessment::{
    Emotion, Intensity, McpAssessment, Protocol, StressAssessment, StressLevel, Urgency,
};
pub use domain::Domain;
pub use error::{
    AdvisoryError, ErrorCategory, ErrorClassifier, Result, ResultExt, StressError,
    ValidationError, ValidationErrorKind,
};
pub use response::{Response, SubmittedAnswer};
pub use summary::{
    AssessedAnswer, BatchSummary, CheckinSnapshot, DeepDiveDecision, DeepDivePayload,
    DeepDivePriority, FlaggedQuestion, Trend, TrendRecord,
};

use std::fmt;

/// Type-safe wrapper for user identifiers
///
/// Prevents accidental mixing of user IDs with question IDs or domain labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Clamp a score into the unit interval
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_conversions() {
        let id = UserId::from("u-42");
        assert_eq!(id.as_str(), "u-42");
        assert_eq!(id.to_string(), "u-42");
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(1.4), 1.0);
        assert_eq!(clamp_unit(-0.2), 0.0);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        assert_eq!(clamp_unit(0.42), 0.42);
    }
}
