//! CLI Common Utilities
//!
//! Shared configuration, storage and engine setup for command handlers.

use clap::ValueEnum;
use serde::Serialize;
use std::sync::Arc;

use crate::analysis::CheckinEngine;
use crate::config::{Config, ConfigLoader};
use crate::storage::{Database, SharedDatabase};
use crate::types::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Command execution context
///
/// Created via [`CommandContext::load`] for commands that need history, or
/// [`CommandContext::load_without_db`] for one-off assessments.
pub struct CommandContext {
    pub config: Config,
    pub db: Option<SharedDatabase>,
}

impl CommandContext {
    /// Load config and open (creating if needed) the history database
    pub fn load() -> Result<Self> {
        let config = ConfigLoader::load()?;
        let db = Database::open(&config.storage.database_path)?;
        db.initialize()?;
        Ok(Self {
            config,
            db: Some(Arc::new(db)),
        })
    }

    pub fn load_without_db() -> Result<Self> {
        Ok(Self {
            config: ConfigLoader::load()?,
            db: None,
        })
    }

    /// Engine wired to this context's store, if any
    pub fn engine(&self) -> Result<CheckinEngine> {
        let engine = CheckinEngine::from_config(&self.config)?;
        Ok(match &self.db {
            Some(db) => engine.with_store(Arc::clone(db)),
            None => engine,
        })
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
