//! Global Constants
//!
//! Centralized thresholds for scoring, escalation and aggregation.
//! All magic numbers should be defined here with documentation.

/// Per-answer scoring constants
pub mod scoring {
    /// Weight of the high pattern tier
    pub const HIGH_TIER_WEIGHT: f64 = 0.9;

    /// Weight of the moderate pattern tier
    pub const MODERATE_TIER_WEIGHT: f64 = 0.6;

    /// Weight of the low pattern tier
    pub const LOW_TIER_WEIGHT: f64 = 0.3;

    /// Bound of the additive domain correction (applied as +/-)
    pub const MAX_DOMAIN_ADJUSTMENT: f64 = 0.2;

    /// Sentiment above this is stressful on its own
    pub const STRESSFUL_SENTIMENT: f64 = 0.6;

    /// Domain stress score above this is stressful on its own
    pub const STRESSFUL_DOMAIN_SCORE: f64 = 0.2;

    /// Confidence contribution of a red flag
    pub const RED_FLAG_CONFIDENCE_BONUS: f64 = 0.3;

    /// Divisor normalizing the confidence sum
    pub const CONFIDENCE_DIVISOR: f64 = 1.5;
}

/// Escalation protocol constants
pub mod protocol {
    /// Sentiment above this escalates
    pub const ESCALATE_SENTIMENT: f64 = 0.8;

    /// Sentiment above this is monitored (also the follow-up threshold)
    pub const MONITOR_SENTIMENT: f64 = 0.6;
}

/// Batch aggregation constants
pub mod batch {
    /// Average above this makes the batch level high
    pub const HIGH_LEVEL_AVERAGE: f64 = 0.7;

    /// Stressful share (percent) above this makes the batch level high
    pub const HIGH_LEVEL_STRESS_PCT: f64 = 40.0;

    /// Average above this makes the batch level moderate
    pub const MODERATE_LEVEL_AVERAGE: f64 = 0.5;

    /// Stressful share (percent) above this makes the batch level moderate
    pub const MODERATE_LEVEL_STRESS_PCT: f64 = 20.0;

    /// Average above this escalates the whole batch
    pub const ESCALATE_AVERAGE: f64 = 0.8;

    /// Escalated share (percent) above this escalates the whole batch
    pub const ESCALATE_PCT: f64 = 30.0;

    /// Average above this puts the batch under monitoring
    pub const MONITOR_AVERAGE: f64 = 0.6;

    /// Escalated share (percent) above this puts the batch under monitoring
    pub const MONITOR_PCT: f64 = 10.0;

    /// Average above this triggers a deep dive
    pub const DEEP_DIVE_AVERAGE: f64 = 0.6;

    /// Red-flagged share (percent) above this triggers a deep dive
    pub const DEEP_DIVE_FLAGGED_PCT: f64 = 25.0;
}

/// Trend analysis constants
pub mod trend {
    /// Average deltas smaller than this are stable
    pub const STABLE_DELTA: f64 = 0.1;

    /// Minimum check-ins needed to compute a trend
    pub const MIN_CHECKINS: usize = 2;
}

/// Recommendation constants
pub mod recommendations {
    /// Maximum recommendations returned
    pub const MAX_RECOMMENDATIONS: usize = 8;

    /// Maximum flagged questions quoted verbatim
    pub const MAX_FLAGGED_REFERENCES: usize = 2;

    /// Average above this selects the high-severity additions
    pub const HIGH_SEVERITY_AVERAGE: f64 = 0.7;

    /// Average above this selects the moderate-severity additions
    pub const MODERATE_SEVERITY_AVERAGE: f64 = 0.5;
}

/// Per-question analyzer constants
pub mod analysis {
    /// Answers analyzed concurrently per group
    pub const DEFAULT_BATCH_SIZE: usize = 3;

    /// Pause between groups while the advisory service is in use (milliseconds)
    pub const DEFAULT_BATCH_PAUSE_MS: u64 = 500;
}

/// Advisory service constants
pub mod advisory {
    /// Per-attempt request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

    /// Retries after the first attempt
    pub const DEFAULT_MAX_RETRIES: u8 = 1;

    /// Base backoff before a retry (milliseconds)
    pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

    /// Maximum backoff between retries (seconds)
    pub const MAX_RETRY_DELAY_SECS: u64 = 10;

    /// Advisory and heuristic scores further apart than this are logged
    pub const DISAGREEMENT_LOG_DELTA: f64 = 0.3;
}
