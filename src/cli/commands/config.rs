//! Config Command
//!
//! Manage StressLens configuration.
//!
//! Usage:
//!   stresslens config show [-f toml|json|yaml]
//!   stresslens config path
//!   stresslens config init [--force]

use clap::ValueEnum;

use crate::cli::ui::Output;
use crate::config::{Config, ConfigLoader};
use crate::types::{Result, StressError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ConfigFormat {
    #[default]
    Toml,
    Json,
    Yaml,
}

/// Show the merged effective configuration
pub fn show(format: ConfigFormat) -> Result<()> {
    let config = ConfigLoader::load()?;
    println!("{}", render(&config, format)?);
    Ok(())
}

/// Credentials are never part of the rendered output
pub fn render(config: &Config, format: ConfigFormat) -> Result<String> {
    Ok(match format {
        ConfigFormat::Toml => toml::to_string_pretty(config)
            .map_err(|e| StressError::Config(format!("Failed to render config: {}", e)))?,
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    })
}

/// Show configuration paths
pub fn path() -> Result<()> {
    let out = Output::new();

    match ConfigLoader::global_config_path() {
        Some(global) => out.field("Global", describe(&global)),
        None => out.field("Global", "(no home directory)"),
    }
    out.field("Project", describe(&ConfigLoader::project_config_path()));
    out.field("Env prefix", "STRESSLENS_");
    Ok(())
}

fn describe(path: &std::path::Path) -> String {
    let state = if path.exists() { "exists" } else { "not found" };
    format!("{} ({})", path.display(), state)
}

/// Initialize project configuration
pub fn init(force: bool) -> Result<()> {
    let out = Output::new();
    let (path, written) = ConfigLoader::init_project(force)?;

    if written {
        out.success("Initialized project configuration");
        out.field("Config", path.display());
    } else {
        out.warning(&format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    Ok(())
}
