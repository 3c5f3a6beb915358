//! StressLens - Stress Signal Classification & Escalation Engine
//!
//! Scores free-text wellbeing check-in answers for stress, emotion and red
//! flags, maps each answer to a Support/Monitor/Escalate protocol, and
//! aggregates batches into per-domain summaries, deep-dive decisions,
//! recommendations and check-in trends.
//!
//! ## Core Features
//!
//! - **Deterministic scoring**: lexicon-driven pattern, emotion, intensity
//!   and domain scoring with red flags that always escalate
//! - **Advisory cross-check**: optional language-model opinion, bounded by
//!   timeout and retries, that never overrides the heuristic result
//! - **Check-in history**: SQLite persistence with per-domain trends
//!
//! ## Quick Start
//!
//! ```ignore
//! use stresslens::{CheckinEngine, Config, SubmittedAnswer, UserId};
//!
//! let engine = CheckinEngine::from_config(&Config::default())?;
//! let report = engine
//!     .process(&UserId::from("u-1"), vec![SubmittedAnswer::new(
//!         "q1", "How is work?", "Always overwhelmed", "work",
//!     )])
//!     .await?;
//! println!("{}", report.overall_protocol());
//! ```
//!
//! ## Modules
//!
//! - [`scoring`]: per-answer stress assessment
//! - [`protocol`]: escalation tiers
//! - [`analysis`]: batch aggregation, deep dives, trends, recommendations
//! - [`ai`]: advisory provider abstraction and response parsing
//! - [`storage`]: SQLite check-in history with connection pooling
//! - [`config`]: layered configuration

pub mod ai;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod constants;
pub mod lexicon;
pub mod protocol;
pub mod scoring;
pub mod storage;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{ErrorCategory, Result, ResultExt, StressError};

// Domain Types
pub use types::{
    AssessedAnswer, BatchSummary, Domain, McpAssessment, Protocol, Response, StressAssessment,
    StressLevel, SubmittedAnswer, Trend, TrendRecord, UserId,
};

// Storage
pub use storage::{Database, PoolConfig, SharedDatabase};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use analysis::{BatchAggregator, CheckinEngine, CheckinReport, PerQuestionAnalyzer};
pub use lexicon::LexiconStore;
pub use protocol::ProtocolClassifier;
pub use scoring::StressAssessor;

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{AdvisoryOutcome, AdvisoryService, LlmProvider, create_provider};
