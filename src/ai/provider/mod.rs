//! LLM Provider Abstraction
//!
//! Defines the LlmProvider trait used by the advisory cross-check.
//! Providers return the raw completion text; parsing is left to the caller
//! so garbled output can still be salvaged or rejected explicitly.

mod ollama;
mod openai;
mod prompt_utils;

pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::ai::validation::extract_json_from_response;
use crate::types::{Result, StressError};

// =============================================================================
// LLM Response
// =============================================================================

/// Raw completion text as returned by the model
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
}

impl LlmResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Parse the text as JSON, repairing common formatting damage
    pub fn json(&self) -> Option<Value> {
        extract_json_from_response(&self.text).ok()
    }
}

/// Shared LLM provider type for concurrent access across analyses.
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// Provider Configuration
// =============================================================================

/// Configuration for LLM providers
///
/// Note: API keys are never serialized to output and are redacted in debug
/// output. Each provider converts the key to SecretString internally.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider type: "openai", "ollama"
    pub provider: String,
    /// Model name (provider-specific)
    pub model: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Sampling temperature (0.0 = deterministic)
    pub temperature: f32,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

fn default_max_tokens() -> usize {
    512
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: None,
            timeout_secs: crate::constants::advisory::DEFAULT_TIMEOUT_SECS,
            temperature: 0.0,
            api_key: None,
            api_base: None,
            max_tokens: default_max_tokens(),
        }
    }
}

// =============================================================================
// LLM Provider Trait
// =============================================================================

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion, asking for JSON matching `schema` when it is
    /// not null
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<LlmResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

/// Create a shared provider from configuration
pub fn create_provider(config: &ProviderConfig) -> Result<SharedProvider> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiProvider::new(config.clone())?)),
        "ollama" => Ok(Arc::new(OllamaProvider::new(config.clone())?)),
        _ => Err(StressError::Config(format!(
            "Unknown provider: {}. Supported: openai, ollama",
            config.provider
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ProviderConfig {
            api_key: Some("sk-secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-secret"));
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let config = ProviderConfig {
            api_key: Some("sk-secret".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        let config = ProviderConfig {
            provider: "carrier-pigeon".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            create_provider(&config),
            Err(StressError::Config(_))
        ));
    }

    #[test]
    fn test_response_json_repairs_fences() {
        let response = LlmResponse::new("```json\n{\"stress_score\": 0.4}\n```");
        assert_eq!(response.json().unwrap()["stress_score"], 0.4);
        assert!(LlmResponse::new("no json here").json().is_none());
    }
}
