//! Unified Error Type System
//!
//! Centralized error types for the stress engine.
//!
//! ## Error Families
//!
//! - **Validation**: malformed survey input, rejected before scoring
//! - **Advisory**: language-model collaborator failures, always absorbed by the analyzer
//! - **Storage / Config / IO**: infrastructure failures surfaced to the caller
//!
//! Advisory failures carry an [`ErrorCategory`] so the retry policy can tell
//! a transient hiccup from a request that will never succeed.

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Advisory failure categories used for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited - wait then retry
    RateLimit,
    /// Authentication failed - don't retry
    Auth,
    /// Network/connectivity issues - retry with backoff
    Network,
    /// Service unavailable - don't hammer it
    Unavailable,
    /// Invalid request - don't retry
    BadRequest,
    /// Response could not be parsed - may succeed on a second sample
    ParseError,
    /// Temporary server issues - retry
    Transient,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Check if this category is worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimit | Self::Network | Self::Transient | Self::ParseError
        )
    }
}

// =============================================================================
// Advisory Error
// =============================================================================

/// Advisory-service error; the category drives the retry decision
#[derive(Debug, Clone)]
pub struct AdvisoryError {
    pub category: ErrorCategory,
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for AdvisoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for AdvisoryError {}

impl AdvisoryError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    /// Shorthand for an unparseable advisory payload
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::ParseError, message)
    }

    pub fn is_retryable(&self) -> bool {
        self.category.is_retryable()
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Classifies raw provider failures into categories
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an error message from any provider
    pub fn classify(message: &str, provider: &str) -> AdvisoryError {
        let lower = message.to_lowercase();

        if lower.contains("rate limit")
            || lower.contains("429")
            || lower.contains("too many requests")
            || lower.contains("quota exceeded")
        {
            return AdvisoryError::with_provider(ErrorCategory::RateLimit, message, provider);
        }

        if lower.contains("401")
            || lower.contains("403")
            || lower.contains("api key")
            || lower.contains("unauthorized")
        {
            return AdvisoryError::with_provider(ErrorCategory::Auth, message, provider);
        }

        if lower.contains("connection")
            || lower.contains("network")
            || lower.contains("dns")
            || lower.contains("timed out")
            || lower.contains("timeout")
            || lower.contains("unreachable")
        {
            return AdvisoryError::with_provider(ErrorCategory::Network, message, provider);
        }

        if lower.contains("503")
            || lower.contains("502")
            || lower.contains("service unavailable")
            || lower.contains("not found")
        {
            return AdvisoryError::with_provider(ErrorCategory::Unavailable, message, provider);
        }

        if lower.contains("400") || lower.contains("bad request") {
            return AdvisoryError::with_provider(ErrorCategory::BadRequest, message, provider);
        }

        if lower.contains("parse")
            || lower.contains("json")
            || lower.contains("unexpected token")
        {
            return AdvisoryError::with_provider(ErrorCategory::ParseError, message, provider);
        }

        if lower.contains("overloaded") || lower.contains("temporary") || lower.contains("500") {
            return AdvisoryError::with_provider(ErrorCategory::Transient, message, provider);
        }

        AdvisoryError::with_provider(ErrorCategory::Unknown, message, provider)
    }

    /// Classify an HTTP status code directly
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> AdvisoryError {
        match status {
            429 => AdvisoryError::with_provider(ErrorCategory::RateLimit, message, provider),
            401 | 403 => AdvisoryError::with_provider(ErrorCategory::Auth, message, provider),
            400 | 422 => AdvisoryError::with_provider(ErrorCategory::BadRequest, message, provider),
            404 => AdvisoryError::with_provider(ErrorCategory::Unavailable, message, provider),
            500 | 502 | 503 | 504 => {
                AdvisoryError::with_provider(ErrorCategory::Transient, message, provider)
            }
            _ => AdvisoryError::with_provider(ErrorCategory::Unknown, message, provider),
        }
    }

    /// Categorize any engine error raised on the advisory path
    pub fn classify_stress_error(err: &StressError, provider: &str) -> AdvisoryError {
        match err {
            StressError::Advisory(inner) => {
                let mut classified = inner.clone();
                if classified.provider.is_none() {
                    classified.provider = Some(provider.to_string());
                }
                classified
            }
            StressError::Timeout { .. } => {
                AdvisoryError::with_provider(ErrorCategory::Network, err.to_string(), provider)
            }
            StressError::Json(_) => {
                AdvisoryError::with_provider(ErrorCategory::ParseError, err.to_string(), provider)
            }
            StressError::Config(_) => {
                AdvisoryError::with_provider(ErrorCategory::BadRequest, err.to_string(), provider)
            }
            _ => Self::classify(&err.to_string(), provider),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Structured validation error for rejected survey input
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    /// Field that failed validation
    pub field: Option<String>,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "Validation failed for '{}': {}", field, self.message)
        } else {
            write!(f, "Validation failed: {}", self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            message: message.into(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Required field absent or blank
    pub fn missing(field: &str) -> Self {
        Self::new(ValidationErrorKind::MissingField, "required field is missing").with_field(field)
    }
}

/// Validation error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    MissingField,
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum StressError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Structured advisory-service error
    #[error("Advisory error: {0}")]
    Advisory(AdvisoryError),

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    #[error("{0}")]
    Validation(ValidationError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<AdvisoryError> for StressError {
    fn from(err: AdvisoryError) -> Self {
        StressError::Advisory(err)
    }
}

impl From<ValidationError> for StressError {
    fn from(err: ValidationError) -> Self {
        StressError::Validation(err)
    }
}

pub type Result<T> = std::result::Result<T, StressError>;

impl StressError {
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    pub fn advisory(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self::Advisory(AdvisoryError::new(category, message))
    }

    /// Check if a retry could plausibly succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Advisory(e) => e.is_retryable(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }
}

/// Context extension trait for storage-side errors
pub trait ResultExt<T> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T>;

    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| StressError::Storage(format!("{}: {}", context.into(), e)))
    }

    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| StressError::Storage(format!("{}: {}", f().into(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::RateLimit.to_string(), "RATE_LIMIT");
        assert_eq!(ErrorCategory::ParseError.to_string(), "PARSE_ERROR");
        assert_eq!(ErrorCategory::Auth.to_string(), "AUTH");
    }

    #[test]
    fn test_error_category_retryable() {
        assert!(ErrorCategory::RateLimit.is_retryable());
        assert!(ErrorCategory::Network.is_retryable());
        assert!(ErrorCategory::Transient.is_retryable());
        assert!(ErrorCategory::ParseError.is_retryable());
        assert!(!ErrorCategory::Auth.is_retryable());
        assert!(!ErrorCategory::BadRequest.is_retryable());
        assert!(!ErrorCategory::Unavailable.is_retryable());
    }

    #[test]
    fn test_classify_messages() {
        let err = ErrorClassifier::classify("Rate limit exceeded", "openai");
        assert_eq!(err.category, ErrorCategory::RateLimit);

        let err = ErrorClassifier::classify("Invalid API key provided", "openai");
        assert_eq!(err.category, ErrorCategory::Auth);

        let err = ErrorClassifier::classify("Connection refused", "ollama");
        assert_eq!(err.category, ErrorCategory::Network);
        assert!(err.is_retryable());

        let err = ErrorClassifier::classify("Something odd", "ollama");
        assert_eq!(err.category, ErrorCategory::Unknown);
    }

    #[test]
    fn test_classify_http_status() {
        assert_eq!(
            ErrorClassifier::classify_http_status(429, "slow down", "t").category,
            ErrorCategory::RateLimit
        );
        assert_eq!(
            ErrorClassifier::classify_http_status(401, "nope", "t").category,
            ErrorCategory::Auth
        );
        assert_eq!(
            ErrorClassifier::classify_http_status(503, "busy", "t").category,
            ErrorCategory::Transient
        );
    }

    #[test]
    fn test_classify_timeout_is_retryable() {
        let err = StressError::timeout("advisory request", Duration::from_secs(5));
        let classified = ErrorClassifier::classify_stress_error(&err, "openai");
        assert_eq!(classified.category, ErrorCategory::Network);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_display_formats() {
        let err = AdvisoryError::with_provider(ErrorCategory::Network, "down", "ollama");
        assert_eq!(err.to_string(), "[ollama:NETWORK] down");

        let err = ValidationError::missing("answerText");
        assert_eq!(
            err.to_string(),
            "Validation failed for 'answerText': required field is missing"
        );
    }
}
