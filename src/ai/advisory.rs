//! Advisory Cross-Check
//!
//! Asks a language model for an independent stress rating of one answer.
//! The result is attached next to the heuristic assessment for display and
//! never changes the heuristic flag decision.
//!
//! Every call is bounded by a timeout and retried with exponential backoff
//! when the failure category is retryable. [`AdvisoryService::cross_check`]
//! never fails: errors become [`AdvisoryOutcome::Unavailable`].

use backon::{ExponentialBuilder, Retryable};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::prompt::{advisory_prompt, advisory_schema};
use super::provider::{LlmResponse, SharedProvider, create_provider};
use super::timeout::with_timeout;
use super::validation::parse_labelled;
use crate::config::AdvisoryConfig;
use crate::constants::advisory::{
    DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_SECS, DISAGREEMENT_LOG_DELTA,
    MAX_RETRY_DELAY_SECS,
};
use crate::constants::scoring::STRESSFUL_SENTIMENT;
use crate::types::{
    AdvisoryError, Emotion, ErrorClassifier, Response, Result, StressAssessment, StressError,
    clamp_unit,
};

/// Independent rating returned by the advisory model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryAssessment {
    pub stress_score: f64,
    pub emotion: Option<Emotion>,
    pub is_stressful: bool,
    pub rationale: Option<String>,
    pub provider: String,
    pub model: String,
}

/// Whether the advisory flag matches the heuristic one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Agreement {
    Agrees,
    Disagrees,
}

/// Advisory result as seen by callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AdvisoryOutcome {
    /// No advisory service configured
    NotRequested,
    /// The service was asked and failed; the heuristic result stands alone
    Unavailable { reason: String },
    Received {
        assessment: AdvisoryAssessment,
        agreement: Agreement,
    },
}

impl AdvisoryOutcome {
    pub fn assessment(&self) -> Option<&AdvisoryAssessment> {
        match self {
            AdvisoryOutcome::Received { assessment, .. } => Some(assessment),
            _ => None,
        }
    }

    pub fn is_received(&self) -> bool {
        matches!(self, AdvisoryOutcome::Received { .. })
    }
}

/// Timeout and retry wrapper around one provider
#[derive(Clone)]
pub struct AdvisoryService {
    provider: SharedProvider,
    timeout: Duration,
    max_retries: usize,
    retry_delay: Duration,
}

impl std::fmt::Debug for AdvisoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisoryService")
            .field("provider", &self.provider.name())
            .field("model", &self.provider.model())
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl AdvisoryService {
    pub fn new(provider: SharedProvider) -> Self {
        Self {
            provider,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES as usize,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }

    /// Build from configuration; `None` when the advisory check is disabled
    pub fn from_config(config: &AdvisoryConfig) -> Result<Option<Self>> {
        if !config.enabled {
            return Ok(None);
        }
        let provider = create_provider(&config.provider_config())?;
        Ok(Some(
            Self::new(provider)
                .with_timeout(Duration::from_secs(config.timeout_secs))
                .with_retries(
                    config.max_retries as usize,
                    Duration::from_millis(config.retry_delay_ms),
                ),
        ))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, max_retries: usize, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Request and parse an advisory rating, retrying retryable failures
    #[instrument(skip_all, fields(question_id = %response.question_id, provider = self.provider.name()))]
    pub async fn assess(&self, response: &Response) -> Result<AdvisoryAssessment> {
        let prompt = advisory_prompt(response);
        let schema = advisory_schema();

        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.retry_delay)
            .with_max_delay(Duration::from_secs(MAX_RETRY_DELAY_SECS).max(self.retry_delay))
            .with_max_times(self.max_retries);

        (|| async { self.attempt(&prompt, &schema).await })
            .retry(backoff)
            .sleep(tokio::time::sleep)
            .when(|e: &StressError| e.is_recoverable())
            .notify(|e: &StressError, delay: Duration| {
                warn!(
                    error = %e,
                    delay_ms = delay.as_millis() as u64,
                    "Advisory request failed, retrying"
                );
            })
            .await
    }

    async fn attempt(&self, prompt: &str, schema: &Value) -> Result<AdvisoryAssessment> {
        let name = self.provider.name();
        let reply = with_timeout(
            self.timeout,
            self.provider.generate(prompt, schema),
            "advisory request",
        )
        .await
        .map_err(|e| StressError::Advisory(ErrorClassifier::classify_stress_error(&e, name)))?;

        parse_advisory(&reply, name, self.provider.model()).map_err(StressError::from)
    }

    /// Cross-check a heuristic assessment. Never fails.
    pub async fn cross_check(
        &self,
        response: &Response,
        heuristic: &StressAssessment,
    ) -> AdvisoryOutcome {
        match self.assess(response).await {
            Ok(assessment) => {
                let agreement = if assessment.is_stressful == heuristic.is_stressful {
                    Agreement::Agrees
                } else {
                    Agreement::Disagrees
                };

                let delta = (assessment.stress_score - heuristic.sentiment_score).abs();
                if agreement == Agreement::Disagrees || delta > DISAGREEMENT_LOG_DELTA {
                    debug!(
                        question_id = %response.question_id,
                        heuristic = heuristic.sentiment_score,
                        advisory = assessment.stress_score,
                        "Advisory rating diverges from heuristic"
                    );
                }

                AdvisoryOutcome::Received {
                    assessment,
                    agreement,
                }
            }
            Err(e) => {
                warn!(
                    question_id = %response.question_id,
                    error = %e,
                    "Advisory service unavailable, using heuristic result only"
                );
                AdvisoryOutcome::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Parse a reply as JSON first, then as labelled text
pub fn parse_advisory(
    reply: &LlmResponse,
    provider: &str,
    model: &str,
) -> std::result::Result<AdvisoryAssessment, AdvisoryError> {
    let from_json = reply.json().and_then(|value| {
        let obj = value.as_object()?;
        let score = ["stress_score", "score", "stressScore"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(number))?;
        Some((
            score,
            obj.get("emotion")
                .and_then(Value::as_str)
                .and_then(|e| e.parse::<Emotion>().ok()),
            ["is_stressful", "isStressful", "stressful"]
                .iter()
                .find_map(|key| obj.get(*key).and_then(Value::as_bool)),
            obj.get("rationale")
                .and_then(Value::as_str)
                .map(str::to_string),
        ))
    });

    let (score, emotion, is_stressful, rationale) = match from_json {
        Some(fields) => fields,
        None => {
            let fields = parse_labelled(&reply.text).ok_or_else(|| {
                AdvisoryError::parse(format!(
                    "Unparseable advisory reply: {}",
                    reply.text.chars().take(80).collect::<String>()
                ))
            })?;
            (
                fields.score.unwrap_or_default(),
                fields.emotion.and_then(|e| e.parse::<Emotion>().ok()),
                fields.is_stressful,
                fields.rationale,
            )
        }
    };

    if !score.is_finite() {
        return Err(AdvisoryError::parse("Advisory score is not a number"));
    }
    let stress_score = clamp_unit(score);

    Ok(AdvisoryAssessment {
        stress_score,
        emotion,
        is_stressful: is_stressful.unwrap_or(stress_score > STRESSFUL_SENTIMENT),
        rationale,
        provider: provider.to_string(),
        model: model.to_string(),
    })
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
