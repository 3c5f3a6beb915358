//! Configuration Management
//!
//! Hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/stresslens/config.toml)
//! 3. Project config (.stresslens/config.toml)
//! 4. Environment variables (STRESSLENS_*)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
