//! Per-Question Analyzer
//!
//! Runs the heuristic pipeline for each answer and, when configured, asks
//! the advisory service for an independent rating. The heuristic flag is
//! authoritative; the advisory outcome is attached next to it.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::ai::{AdvisoryOutcome, AdvisoryService};
use crate::config::AnalysisConfig;
use crate::constants::analysis::{DEFAULT_BATCH_PAUSE_MS, DEFAULT_BATCH_SIZE};
use crate::protocol::ProtocolClassifier;
use crate::scoring::StressAssessor;
use crate::types::{AssessedAnswer, McpAssessment, Response, StressAssessment};

/// Full per-answer result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnalysis {
    pub response: Response,
    pub assessment: StressAssessment,
    pub protocol: McpAssessment,
    pub advisory: AdvisoryOutcome,
}

impl QuestionAnalysis {
    /// Drop the advisory part for aggregation
    pub fn to_assessed(&self) -> AssessedAnswer {
        AssessedAnswer {
            response: self.response.clone(),
            assessment: self.assessment.clone(),
            protocol: self.protocol.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PerQuestionAnalyzer {
    assessor: Arc<StressAssessor>,
    classifier: ProtocolClassifier,
    advisory: Option<AdvisoryService>,
    batch_size: usize,
    batch_pause: Duration,
}

impl PerQuestionAnalyzer {
    pub fn new(assessor: Arc<StressAssessor>) -> Self {
        Self {
            assessor,
            classifier: ProtocolClassifier::new(),
            advisory: None,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_pause: Duration::from_millis(DEFAULT_BATCH_PAUSE_MS),
        }
    }

    pub fn with_advisory(mut self, advisory: Option<AdvisoryService>) -> Self {
        self.advisory = advisory;
        self
    }

    pub fn with_analysis_config(mut self, config: &AnalysisConfig) -> Self {
        self.batch_size = config.batch_size.max(1);
        self.batch_pause = Duration::from_millis(config.batch_pause_ms);
        self
    }

    pub fn has_advisory(&self) -> bool {
        self.advisory.is_some()
    }

    /// Heuristic assessment and protocol only. Synchronous and pure.
    pub fn analyze_heuristic(&self, response: &Response) -> (StressAssessment, McpAssessment) {
        let assessment = self.assessor.assess(response);
        let protocol = self.classifier.classify(&assessment);
        (assessment, protocol)
    }

    /// Analyze one answer. Advisory failures are absorbed.
    pub async fn analyze(&self, response: Response) -> QuestionAnalysis {
        let (assessment, protocol) = self.analyze_heuristic(&response);

        let advisory = match &self.advisory {
            Some(service) => service.cross_check(&response, &assessment).await,
            None => AdvisoryOutcome::NotRequested,
        };

        debug!(
            question_id = %response.question_id,
            protocol = %protocol.protocol,
            advisory_received = advisory.is_received(),
            "Question analyzed"
        );

        QuestionAnalysis {
            response,
            assessment,
            protocol,
            advisory,
        }
    }

    /// Analyze answers in concurrent groups, preserving input order
    ///
    /// Groups are separated by a pause only while the advisory service is
    /// enabled; the heuristic path alone never sleeps.
    #[instrument(skip_all, fields(answers = responses.len()))]
    pub async fn analyze_batch(&self, responses: Vec<Response>) -> Vec<QuestionAnalysis> {
        let total = responses.len();
        let mut results = Vec::with_capacity(total);
        let mut pending = responses.into_iter().peekable();

        while pending.peek().is_some() {
            let group: Vec<Response> = pending.by_ref().take(self.batch_size).collect();
            results.extend(join_all(group.into_iter().map(|r| self.analyze(r))).await);

            if self.has_advisory() && pending.peek().is_some() && !self.batch_pause.is_zero() {
                tokio::time::sleep(self.batch_pause).await;
            }
        }

        info!(
            total,
            stressful = results.iter().filter(|r| r.assessment.is_stressful).count(),
            "Batch analyzed"
        );
        results
    }
}
