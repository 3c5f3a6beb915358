//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/stresslens/config.toml)
//! 3. Project config (.stresslens/config.toml)
//! 4. Environment variables (STRESSLENS_* prefix, `__` separates sections)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{Result, StressError};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // STRESSLENS_ADVISORY__ENABLED=true -> advisory.enabled
        figment = figment.merge(Env::prefixed("STRESSLENS_").split("__"));

        let config: Config = figment
            .extract()
            .map_err(|e| StressError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| StressError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Global config directory (~/.config/stresslens/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("stresslens"))
    }

    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    /// Project data directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(".stresslens")
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Create `.stresslens/config.toml` unless it already exists
    ///
    /// Returns the config file path and whether it was written.
    pub fn init_project(force: bool) -> Result<(PathBuf, bool)> {
        let project_dir = Self::project_dir();
        fs::create_dir_all(&project_dir)?;

        let config_path = Self::project_config_path();
        if config_path.exists() && !force {
            info!("Project config exists: {}", config_path.display());
            return Ok((config_path, false));
        }

        fs::write(&config_path, Self::default_project_config())?;
        info!("Created project config: {}", config_path.display());
        Ok((config_path, true))
    }

    /// Default project config content (TOML)
    fn default_project_config() -> String {
        r#"# StressLens Project Configuration
# Overrides ~/.config/stresslens/config.toml; STRESSLENS_* env vars override both.

version = "1.0"

[analysis]
batch_size = 3
batch_pause_ms = 500

# Optional language-model cross-check. Never overrides the heuristic result.
[advisory]
enabled = false
provider = "ollama"        # "ollama" or "openai" (OPENAI_API_KEY)
timeout_secs = 20
max_retries = 1
retry_delay_ms = 500

[storage]
database_path = ".stresslens/stresslens.db"

# [lexicon]
# path = "lexicon.toml"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn isolate(jail: &mut Jail) {
        let dir = jail.directory().display().to_string();
        jail.set_env("XDG_CONFIG_HOME", &dir);
        jail.set_env("HOME", &dir);
    }

    #[test]
    fn test_load_default_config() {
        Jail::expect_with(|jail| {
            isolate(jail);
            let config = ConfigLoader::load().map_err(|e| e.to_string())?;
            assert_eq!(config.version, "1.0");
            assert_eq!(config.analysis.batch_size, 3);
            Ok(())
        });
    }

    #[test]
    fn test_init_project_writes_loadable_config() {
        Jail::expect_with(|jail| {
            isolate(jail);
            let (path, written) = ConfigLoader::init_project(false).map_err(|e| e.to_string())?;
            assert!(written);
            assert!(path.exists());

            let (_, written) = ConfigLoader::init_project(false).map_err(|e| e.to_string())?;
            assert!(!written);

            let config = ConfigLoader::load_from_file(&path).map_err(|e| e.to_string())?;
            assert_eq!(config.advisory.provider, "ollama");
            assert_eq!(config.advisory.timeout_secs, 20);
            Ok(())
        });
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_dir(".stresslens")?;
            jail.create_file(
                ".stresslens/config.toml",
                "[analysis]\nbatch_size = 5\n[advisory]\nprovider = \"openai\"\n",
            )?;
            let config = ConfigLoader::load().map_err(|e| e.to_string())?;
            assert_eq!(config.analysis.batch_size, 5);
            assert_eq!(config.analysis.batch_pause_ms, 500);
            assert_eq!(config.advisory.provider, "openai");
            Ok(())
        });
    }

    #[test]
    fn test_env_override() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.set_env("STRESSLENS_ADVISORY__ENABLED", "true");
            jail.set_env("STRESSLENS_ANALYSIS__BATCH_SIZE", "7");
            let config = ConfigLoader::load().map_err(|e| e.to_string())?;
            assert!(config.advisory.enabled);
            assert_eq!(config.analysis.batch_size, 7);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.set_env("STRESSLENS_ANALYSIS__BATCH_SIZE", "0");
            assert!(matches!(ConfigLoader::load(), Err(StressError::Config(_))));
            Ok(())
        });
    }
}
