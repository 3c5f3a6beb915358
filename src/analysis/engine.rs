//! Check-in Engine
//!
//! One call per survey submission:
//! validate, analyze, aggregate per domain, persist, then compute trends
//! and recommendations from the stored history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::analyzer::{PerQuestionAnalyzer, QuestionAnalysis};
use super::batch::BatchAggregator;
use super::recommendations::RecommendationGenerator;
use super::trend::TrendAnalyzer;
use crate::ai::AdvisoryService;
use crate::config::Config;
use crate::lexicon::LexiconStore;
use crate::scoring::StressAssessor;
use crate::storage::SharedDatabase;
use crate::types::{
    BatchSummary, DeepDiveDecision, DeepDivePayload, Domain, Protocol, Response, Result,
    StressError, SubmittedAnswer, Trend, TrendRecord, UserId,
};

/// Per-domain slice of a check-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainReport {
    pub domain: Domain,
    pub summary: BatchSummary,
    pub deep_dive: DeepDiveDecision,
    pub payload: DeepDivePayload,
    pub recommendations: Vec<String>,
    pub trend: Option<TrendRecord>,
    /// Set when the summary was persisted
    pub checkin_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinReport {
    pub user_id: String,
    pub recorded_at: DateTime<Utc>,
    pub answers: Vec<QuestionAnalysis>,
    pub domains: Vec<DomainReport>,
    pub overall_trend: Trend,
}

impl CheckinReport {
    /// Most severe batch protocol across domains
    pub fn overall_protocol(&self) -> Protocol {
        self.domains
            .iter()
            .map(|d| d.summary.mcp_protocol)
            .max()
            .unwrap_or(Protocol::Support)
    }

    pub fn needs_deep_dive(&self) -> bool {
        self.domains.iter().any(|d| d.deep_dive.needs_deep_dive)
    }

    pub fn trends(&self) -> impl Iterator<Item = &TrendRecord> {
        self.domains.iter().filter_map(|d| d.trend.as_ref())
    }
}

pub struct CheckinEngine {
    analyzer: PerQuestionAnalyzer,
    aggregator: BatchAggregator,
    trends: TrendAnalyzer,
    recommendations: RecommendationGenerator,
    store: Option<SharedDatabase>,
}

impl CheckinEngine {
    pub fn new(analyzer: PerQuestionAnalyzer) -> Self {
        Self {
            analyzer,
            aggregator: BatchAggregator::new(),
            trends: TrendAnalyzer::new(),
            recommendations: RecommendationGenerator::new(),
            store: None,
        }
    }

    /// Build the lexicon, assessor and optional advisory service from config
    pub fn from_config(config: &Config) -> Result<Self> {
        let lexicon = match &config.lexicon.path {
            Some(path) => LexiconStore::from_toml_file(path)?,
            None => LexiconStore::builtin(),
        };
        let assessor = StressAssessor::new(lexicon.shared())?;
        let analyzer = PerQuestionAnalyzer::new(Arc::new(assessor))
            .with_analysis_config(&config.analysis)
            .with_advisory(AdvisoryService::from_config(&config.advisory)?);
        Ok(Self::new(analyzer))
    }

    pub fn with_store(mut self, store: SharedDatabase) -> Self {
        self.store = Some(store);
        self
    }

    pub fn analyzer(&self) -> &PerQuestionAnalyzer {
        &self.analyzer
    }

    /// Reject the whole submission on the first invalid answer
    pub fn validate(answers: Vec<SubmittedAnswer>) -> Result<Vec<Response>> {
        answers
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                Response::try_from(raw).map_err(|e| match e {
                    StressError::Validation(mut err) => {
                        err.field = Some(format!(
                            "answers[{}].{}",
                            index,
                            err.field.as_deref().unwrap_or("?")
                        ));
                        StressError::Validation(err)
                    }
                    other => other,
                })
            })
            .collect()
    }

    #[instrument(skip_all, fields(user = %user_id, answers = answers.len()))]
    pub async fn process(
        &self,
        user_id: &UserId,
        answers: Vec<SubmittedAnswer>,
    ) -> Result<CheckinReport> {
        let responses = Self::validate(answers)?;
        let recorded_at = Utc::now();

        let analyses = self.analyzer.analyze_batch(responses).await;

        let mut groups: Vec<(Domain, Vec<&QuestionAnalysis>)> = Vec::new();
        for analysis in &analyses {
            let domain = &analysis.response.domain;
            match groups.iter_mut().find(|(d, _)| d == domain) {
                Some((_, members)) => members.push(analysis),
                None => groups.push((domain.clone(), vec![analysis])),
            }
        }

        let mut domains: Vec<DomainReport> = groups
            .into_iter()
            .map(|(domain, members)| {
                let summary = self
                    .aggregator
                    .aggregate(members.iter().map(|a| a.to_assessed()).collect());
                let deep_dive = DeepDiveDecision::from_summary(&summary);
                let payload = DeepDivePayload::from_summary(&summary, &deep_dive);
                let recommendations = self.recommendations.generate(&summary, &domain);
                DomainReport {
                    domain,
                    summary,
                    deep_dive,
                    payload,
                    recommendations,
                    trend: None,
                    checkin_id: None,
                }
            })
            .collect();

        if let Some(store) = &self.store {
            self.persist(store, user_id, &mut domains, recorded_at)?;
        }

        let records: Vec<TrendRecord> = domains.iter().filter_map(|d| d.trend.clone()).collect();
        let overall_trend = self.trends.overall_trend(&records);

        let report = CheckinReport {
            user_id: user_id.to_string(),
            recorded_at,
            answers: analyses,
            domains,
            overall_trend,
        };

        info!(
            domains = report.domains.len(),
            protocol = %report.overall_protocol(),
            deep_dive = report.needs_deep_dive(),
            trend = %report.overall_trend,
            "Check-in processed"
        );

        Ok(report)
    }

    /// Store every domain in one transaction, then attach trends from the
    /// committed history
    fn persist(
        &self,
        store: &SharedDatabase,
        user_id: &UserId,
        domains: &mut [DomainReport],
        recorded_at: DateTime<Utc>,
    ) -> Result<()> {
        let summaries: Vec<(Domain, &BatchSummary)> = domains
            .iter()
            .map(|d| (d.domain.clone(), &d.summary))
            .collect();
        let snapshots = store.save_checkin_batch(user_id.as_str(), &summaries, recorded_at)?;

        for (report, snapshot) in domains.iter_mut().zip(snapshots) {
            let history = store.load_history(user_id.as_str(), &report.domain)?;
            report.checkin_id = Some(snapshot.checkin_id);
            report.trend = self.trends.analyze_domain(&history);
        }
        Ok(())
    }

    /// Trend records from stored history, optionally for one domain
    pub fn trends_for(&self, user_id: &UserId, domain: Option<&Domain>) -> Result<Vec<TrendRecord>> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| StressError::Config("No history store attached".to_string()))?;

        let domains = match domain {
            Some(domain) => vec![domain.clone()],
            None => store.load_user_domains(user_id.as_str())?,
        };

        let mut records = Vec::new();
        for domain in domains {
            let history = store.load_history(user_id.as_str(), &domain)?;
            if let Some(record) = self.trends.analyze_domain(&history) {
                records.push(record);
            }
        }
        Ok(records)
    }

    pub fn overall_trend(&self, records: &[TrendRecord]) -> Trend {
        self.trends.overall_trend(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use crate::types::{StressLevel, ValidationErrorKind};

    fn engine() -> CheckinEngine {
        let assessor = StressAssessor::new(LexiconStore::builtin().shared()).unwrap();
        CheckinEngine::new(PerQuestionAnalyzer::new(Arc::new(assessor)))
    }

    fn store() -> SharedDatabase {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        Arc::new(db)
    }

    fn calm_checkin() -> Vec<SubmittedAnswer> {
        vec![
            SubmittedAnswer::new("w1", "How often do you feel overwhelmed?", "Rarely", "work"),
            SubmittedAnswer::new("h1", "How often do you sleep badly?", "Rarely", "health"),
        ]
    }

    fn stressed_checkin() -> Vec<SubmittedAnswer> {
        vec![
            SubmittedAnswer::new(
                "w1",
                "Over the past two weeks, how often have you felt emotionally drained by your work?",
                "Very Often",
                "Work & Career",
            ),
            SubmittedAnswer::new(
                "w2",
                "Anything else about work?",
                "I feel completely burned out and can't take it anymore",
                "Work & Career",
            ),
            SubmittedAnswer::new("h1", "How often do you sleep badly?", "Rarely", "health"),
        ]
    }

    #[tokio::test]
    async fn test_groups_by_domain_in_submission_order() {
        let report = engine()
            .process(&UserId::from("u1"), stressed_checkin())
            .await
            .unwrap();

        assert_eq!(report.answers.len(), 3);
        let domains: Vec<&Domain> = report.domains.iter().map(|d| &d.domain).collect();
        assert_eq!(domains, vec![&Domain::WorkCareer, &Domain::Health]);

        let work = &report.domains[0];
        assert_eq!(work.summary.total_answers, 2);
        assert_eq!(work.summary.high_stress_count, 2);
        assert_eq!(work.summary.mcp_protocol, Protocol::Escalate);
        assert!(work.deep_dive.needs_deep_dive);
        assert!(work.payload.domain_needs_review);
        assert!(work.checkin_id.is_none());
        assert!(work.recommendations.len() <= 8);

        let health = &report.domains[1];
        assert_eq!(health.summary.overall_stress_level, StressLevel::Low);
        assert!(!health.deep_dive.needs_deep_dive);

        assert_eq!(report.overall_protocol(), Protocol::Escalate);
        assert!(report.needs_deep_dive());
        assert_eq!(report.overall_trend, Trend::Stable);
    }

    #[tokio::test]
    async fn test_invalid_answer_aborts_submission() {
        let mut answers = calm_checkin();
        answers.push(SubmittedAnswer {
            answer_text: None,
            ..SubmittedAnswer::new("x", "Q", "A", "work")
        });

        let store = store();
        let engine = engine().with_store(store.clone());
        match engine.process(&UserId::from("u1"), answers).await {
            Err(StressError::Validation(err)) => {
                assert_eq!(err.kind, ValidationErrorKind::MissingField);
                assert_eq!(err.field.as_deref(), Some("answers[2].answerText"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(store.load_user_domains("u1").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_store_leaves_no_partial_checkin() {
        let store = store();
        store
            .connection()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER reject_health BEFORE INSERT ON checkins
                 WHEN NEW.domain = 'Health'
                 BEGIN SELECT RAISE(ABORT, 'health rejected'); END;",
            )
            .unwrap();

        let engine = engine().with_store(store.clone());
        let result = engine.process(&UserId::from("u1"), calm_checkin()).await;

        assert!(result.is_err());
        assert!(store.load_history("u1", &Domain::WorkCareer).unwrap().is_empty());
        assert!(store.load_user_domains("u1").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_produces_trends() {
        let engine = engine().with_store(store());
        let user = UserId::from("u1");

        let first = engine.process(&user, calm_checkin()).await.unwrap();
        assert!(first.domains.iter().all(|d| d.trend.is_none()));
        assert!(first.domains.iter().all(|d| d.checkin_id.is_some()));

        let second = engine.process(&user, stressed_checkin()).await.unwrap();
        let work = second
            .domains
            .iter()
            .find(|d| d.domain == Domain::WorkCareer)
            .unwrap();
        let trend = work.trend.as_ref().unwrap();
        assert_eq!(trend.trend, Trend::Worsening);
        assert!(trend.protocol_changed);
        assert_eq!(trend.checkin_count, 2);

        let health = second
            .domains
            .iter()
            .find(|d| d.domain == Domain::Health)
            .unwrap();
        assert_eq!(health.trend.as_ref().unwrap().trend, Trend::Stable);

        // one worsening, one stable
        assert_eq!(second.overall_trend, Trend::Stable);

        let records = engine.trends_for(&user, None).unwrap();
        assert_eq!(records.len(), 2);
        let work_only = engine.trends_for(&user, Some(&Domain::WorkCareer)).unwrap();
        assert_eq!(work_only.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_submission_is_no_data() {
        let report = engine().process(&UserId::from("u1"), Vec::new()).await.unwrap();
        assert!(report.domains.is_empty());
        assert_eq!(report.overall_protocol(), Protocol::Support);
        assert!(!report.needs_deep_dive());
    }

    #[test]
    fn test_trends_need_a_store() {
        assert!(matches!(
            engine().trends_for(&UserId::from("u1"), None),
            Err(StressError::Config(_))
        ));
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = CheckinReport {
            user_id: "u1".to_string(),
            recorded_at: Utc::now(),
            answers: Vec::new(),
            domains: Vec::new(),
            overall_trend: Trend::Stable,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["overallTrend"], "stable");
    }
}
