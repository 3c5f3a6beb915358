//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/stresslens/) and project (.stresslens/) level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ai::provider::ProviderConfig;
use crate::constants::{advisory, analysis};
use crate::types::{Result, StressError};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Per-question analysis settings
    pub analysis: AnalysisConfig,

    /// Advisory language-model cross-check
    pub advisory: AdvisoryConfig,

    /// Check-in history storage
    pub storage: StorageConfig,

    /// Alternate lexicon tables
    pub lexicon: LexiconConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            analysis: AnalysisConfig::default(),
            advisory: AdvisoryConfig::default(),
            storage: StorageConfig::default(),
            lexicon: LexiconConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `StressError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.batch_size == 0 {
            return Err(StressError::Config(
                "analysis.batch_size must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.advisory.temperature) {
            return Err(StressError::Config(format!(
                "advisory.temperature must be between 0.0 and 2.0, got {}",
                self.advisory.temperature
            )));
        }

        if self.advisory.timeout_secs == 0 {
            return Err(StressError::Config(
                "advisory.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if !matches!(self.advisory.provider.as_str(), "openai" | "ollama") {
            return Err(StressError::Config(format!(
                "advisory.provider must be 'openai' or 'ollama', got '{}'",
                self.advisory.provider
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Analysis Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Answers analyzed concurrently per group
    pub batch_size: usize,

    /// Pause between groups while the advisory service is enabled (ms)
    pub batch_pause_ms: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            batch_size: analysis::DEFAULT_BATCH_SIZE,
            batch_pause_ms: analysis::DEFAULT_BATCH_PAUSE_MS,
        }
    }
}

// =============================================================================
// Advisory Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    /// Off by default; the heuristic result is complete on its own
    pub enabled: bool,

    /// Provider name: "openai" or "ollama"
    pub provider: String,

    /// Model name (provider default when unset)
    pub model: Option<String>,

    /// Custom endpoint
    pub api_base: Option<String>,

    /// API key. Never serialized; falls back to the provider's env var.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    pub temperature: f32,

    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,

    /// Retries after the first attempt, retryable failures only
    pub max_retries: u8,

    /// Base backoff before a retry (ms)
    pub retry_delay_ms: u64,
}

impl std::fmt::Debug for AdvisoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisoryConfig")
            .field("enabled", &self.enabled)
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .finish()
    }
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: "ollama".to_string(),
            model: None,
            api_base: None,
            api_key: None,
            temperature: 0.0,
            timeout_secs: advisory::DEFAULT_TIMEOUT_SECS,
            max_retries: advisory::DEFAULT_MAX_RETRIES,
            retry_delay_ms: advisory::DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl AdvisoryConfig {
    /// Provider settings derived from this section
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            provider: self.provider.clone(),
            model: self.model.clone(),
            timeout_secs: self.timeout_secs,
            temperature: self.temperature,
            api_key: self.api_key.clone(),
            api_base: self.api_base.clone(),
            ..ProviderConfig::default()
        }
    }
}

// =============================================================================
// Storage Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file (relative to the working directory)
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(".stresslens/stresslens.db"),
        }
    }
}

// =============================================================================
// Lexicon Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    /// TOML file replacing the built-in lexicon
    pub path: Option<PathBuf>,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.analysis.batch_size, 3);
        assert!(!config.advisory.enabled);
        assert_eq!(config.advisory.max_retries, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.analysis.batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.advisory.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.advisory.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.advisory.provider = "claude".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_is_hidden() {
        let mut config = Config::default();
        config.advisory.api_key = Some("sk-live".to_string());
        assert!(!format!("{:?}", config).contains("sk-live"));
        assert!(!toml::to_string(&config).unwrap().contains("sk-live"));
        assert_eq!(
            config.advisory.provider_config().api_key.as_deref(),
            Some("sk-live")
        );
    }
}
