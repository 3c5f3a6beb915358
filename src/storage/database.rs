//! Database Layer with Connection Pooling and Safe Transactions
//!
//! SQLite store for check-in history featuring:
//! - Connection pooling via r2d2 for concurrent access
//! - Panic-safe transactions with automatic rollback
//! - Version-tracked schema
//! - WAL mode for optimal read/write performance

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, Row, params};
use uuid::Uuid;

use crate::types::{
    AssessedAnswer, BatchSummary, CheckinSnapshot, Domain, Protocol, Result, ResultExt,
    StressError, StressLevel,
};

/// Shared database handle for async contexts.
pub type SharedDatabase = Arc<Database>;

const SCHEMA: &str = include_str!("schema.sql");

/// Schema version recorded in `user_version`
const SCHEMA_VERSION: u32 = 1;

const SNAPSHOT_COLUMNS: &str = "id, user_id, domain, recorded_at, average_sentiment,
     high_stress_count, total_answers, overall_level, protocol";

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool
    pub max_size: u32,
    /// Minimum idle connections to keep ready
    pub min_idle: u32,
    /// Timeout for acquiring a connection (seconds)
    pub connection_timeout_secs: u64,
}

impl PoolConfig {
    const MIN_POOL_SIZE: u32 = 2;
    const MAX_POOL_SIZE: u32 = 8;

    /// One connection per core, within bounds
    pub fn optimal_pool_size() -> u32 {
        let cores = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(2);
        cores.clamp(Self::MIN_POOL_SIZE, Self::MAX_POOL_SIZE)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        let max_size = Self::optimal_pool_size();
        Self {
            max_size,
            min_idle: 1,
            connection_timeout_secs: 30,
        }
    }
}

/// Thread-safe database with connection pooling.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("connections", &self.pool.state().connections)
            .finish()
    }
}

impl Database {
    /// Open database with connection pooling at the specified path.
    ///
    /// The parent directory is created when missing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, PoolConfig::default())
    }

    pub fn open_with_config<P: AsRef<Path>>(path: P, config: PoolConfig) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let manager =
            SqliteConnectionManager::file(path.as_ref()).with_init(Self::configure_connection);

        let pool = Pool::builder()
            .max_size(config.max_size)
            .min_idle(Some(config.min_idle))
            .connection_timeout(std::time::Duration::from_secs(
                config.connection_timeout_secs,
            ))
            .build(manager)
            .map_err(|e| StressError::Storage(format!("Failed to create connection pool: {}", e)))?;

        Ok(Self { pool })
    }

    /// Open an in-memory database for testing or temporary use.
    pub fn open_in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory().with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| StressError::Storage(format!("Failed to create in-memory pool: {}", e)))?;

        Ok(Self { pool })
    }

    fn configure_connection(conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 5000;
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| {
            StressError::Storage(format!("Failed to acquire database connection: {}", e))
        })
    }

    /// Create anything missing and stamp the schema version.
    ///
    /// A database written by a newer release is refused rather than modified.
    pub fn initialize(&self) -> Result<()> {
        let conn = self.conn()?;
        let current_version = Self::user_version(&conn)?;
        if current_version > SCHEMA_VERSION {
            return Err(StressError::Storage(format!(
                "Database schema version {} is newer than supported version {}",
                current_version, SCHEMA_VERSION
            )));
        }

        conn.execute_batch(SCHEMA)
            .with_context("Failed to initialize database schema")?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .with_context("Failed to set schema version")?;
        Ok(())
    }

    fn user_version(conn: &Connection) -> Result<u32> {
        conn.pragma_query_value(None, "user_version", |row| row.get(0))
            .with_context("Failed to read schema version")
    }

    /// Get a raw connection for advanced operations.
    pub fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.conn()
    }

    /// Execute a function within a panic-safe database transaction.
    ///
    /// If the closure panics, the transaction is rolled back and an error is
    /// returned instead of poisoning the connection pool.
    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + std::panic::UnwindSafe,
    {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .with_context("Failed to start transaction")?;

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| f(&tx)));

        match result {
            Ok(Ok(value)) => {
                tx.commit().with_context("Failed to commit transaction")?;
                Ok(value)
            }
            // Rolled back on drop
            Ok(Err(e)) => Err(e),
            Err(panic_payload) => {
                let panic_msg = panic_payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic_payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "Unknown panic".to_string());

                tracing::error!("Transaction panicked: {}", panic_msg);
                Err(StressError::Storage(format!(
                    "Transaction panicked: {}",
                    panic_msg
                )))
            }
        }
    }

    // =========================================================================
    // Check-in History
    // =========================================================================

    /// Persist one domain summary and its answers atomically.
    pub fn save_checkin(
        &self,
        user_id: &str,
        domain: &Domain,
        summary: &BatchSummary,
        recorded_at: DateTime<Utc>,
    ) -> Result<CheckinSnapshot> {
        self.save_checkin_batch(user_id, &[(domain.clone(), summary)], recorded_at)?
            .pop()
            .ok_or_else(|| StressError::Storage("Check-in was not stored".to_string()))
    }

    /// Persist every domain summary of one check-in in a single transaction.
    ///
    /// Either all domains are stored or none are. Snapshots come back in
    /// input order.
    pub fn save_checkin_batch(
        &self,
        user_id: &str,
        summaries: &[(Domain, &BatchSummary)],
        recorded_at: DateTime<Utc>,
    ) -> Result<Vec<CheckinSnapshot>> {
        let mut snapshots = Vec::with_capacity(summaries.len());
        let mut pending = Vec::with_capacity(summaries.len());
        for (domain, summary) in summaries {
            let snapshot =
                CheckinSnapshot::from_summary(user_id, domain.clone(), summary, recorded_at);
            pending.push(PendingCheckin::new(&snapshot, summary)?);
            snapshots.push(snapshot);
        }

        self.transaction(move |conn| {
            let mut checkin_stmt = conn
                .prepare(
                    "INSERT INTO checkins
                     (id, user_id, domain, recorded_at, average_sentiment, high_stress_count,
                      flagged_count, escalated_count, total_answers, overall_level, protocol)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                )
                .with_context("Failed to prepare check-in insert")?;
            let mut answer_stmt = conn
                .prepare(
                    "INSERT INTO checkin_answers
                     (checkin_id, position, question_id, sentiment_score, is_stressful,
                      protocol, response_json, assessment_json, protocol_json)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                )
                .with_context("Failed to prepare answer insert")?;

            for checkin in &pending {
                checkin_stmt
                    .execute(params![
                        checkin.id,
                        checkin.user_id,
                        checkin.domain,
                        checkin.recorded_at,
                        checkin.average_sentiment,
                        checkin.high_stress_count,
                        checkin.flagged_count,
                        checkin.escalated_count,
                        checkin.total_answers,
                        checkin.overall_level,
                        checkin.protocol,
                    ])
                    .with_context_fn(|| format!("Failed to insert check-in for {}", checkin.domain))?;

                for answer in &checkin.answers {
                    answer_stmt
                        .execute(params![
                            checkin.id,
                            answer.position,
                            answer.question_id,
                            answer.sentiment_score,
                            answer.is_stressful,
                            answer.protocol,
                            answer.response_json,
                            answer.assessment_json,
                            answer.protocol_json,
                        ])
                        .with_context("Failed to insert check-in answer")?;
                }
            }
            Ok(())
        })?;

        tracing::debug!(
            user = user_id,
            domains = snapshots.len(),
            "Stored check-in"
        );

        Ok(snapshots)
    }

    /// Check-ins of one user/domain, oldest first.
    pub fn load_history(&self, user_id: &str, domain: &Domain) -> Result<Vec<CheckinSnapshot>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM checkins
                 WHERE user_id = ?1 AND domain = ?2
                 ORDER BY recorded_at, rowid",
                SNAPSHOT_COLUMNS
            ))
            .with_context("Failed to prepare history query")?;

        let rows = stmt
            .query_map(params![user_id, domain.label()], SnapshotRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context("Failed to fetch check-in history")?;

        rows.into_iter().map(SnapshotRow::into_snapshot).collect()
    }

    /// Domains a user has history in, sorted by label.
    pub fn load_user_domains(&self, user_id: &str) -> Result<Vec<Domain>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT DISTINCT domain FROM checkins WHERE user_id = ?1 ORDER BY domain")
            .with_context("Failed to prepare domain query")?;

        let labels = stmt
            .query_map(params![user_id], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context("Failed to fetch user domains")?;

        Ok(labels.iter().map(|label| Domain::parse(label)).collect())
    }

    /// Answers stored with one check-in, in submission order.
    pub fn load_answers(&self, checkin_id: &Uuid) -> Result<Vec<AssessedAnswer>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT response_json, assessment_json, protocol_json
                 FROM checkin_answers
                 WHERE checkin_id = ?1
                 ORDER BY position",
            )
            .with_context("Failed to prepare answers query")?;

        let rows = stmt
            .query_map(params![checkin_id.to_string()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context("Failed to fetch check-in answers")?;

        rows.into_iter()
            .map(|(response, assessment, protocol)| {
                Ok(AssessedAnswer {
                    response: serde_json::from_str(&response)
                        .with_context_fn(|| format!("Corrupted response in {}", checkin_id))?,
                    assessment: serde_json::from_str(&assessment)
                        .with_context_fn(|| format!("Corrupted assessment in {}", checkin_id))?,
                    protocol: serde_json::from_str(&protocol)
                        .with_context_fn(|| format!("Corrupted protocol in {}", checkin_id))?,
                })
            })
            .collect()
    }
}

/// Fixed-width UTC timestamps sort correctly as text
fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Insert-ready columns of one domain check-in
struct PendingCheckin {
    id: String,
    user_id: String,
    domain: String,
    recorded_at: String,
    average_sentiment: f64,
    high_stress_count: i64,
    flagged_count: i64,
    escalated_count: i64,
    total_answers: i64,
    overall_level: String,
    protocol: &'static str,
    answers: Vec<PendingAnswer>,
}

struct PendingAnswer {
    position: i64,
    question_id: String,
    sentiment_score: f64,
    is_stressful: bool,
    protocol: &'static str,
    response_json: String,
    assessment_json: String,
    protocol_json: String,
}

impl PendingCheckin {
    fn new(snapshot: &CheckinSnapshot, summary: &BatchSummary) -> Result<Self> {
        let answers = summary
            .individual_results
            .iter()
            .enumerate()
            .map(|(position, answer)| -> Result<PendingAnswer> {
                Ok(PendingAnswer {
                    position: position as i64,
                    question_id: answer.response.question_id.clone(),
                    sentiment_score: answer.assessment.sentiment_score,
                    is_stressful: answer.assessment.is_stressful,
                    protocol: answer.protocol.protocol.as_str(),
                    response_json: serde_json::to_string(&answer.response)?,
                    assessment_json: serde_json::to_string(&answer.assessment)?,
                    protocol_json: serde_json::to_string(&answer.protocol)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: snapshot.checkin_id.to_string(),
            user_id: snapshot.user_id.clone(),
            domain: snapshot.domain.label().to_string(),
            recorded_at: timestamp(&snapshot.recorded_at),
            average_sentiment: snapshot.average_sentiment,
            high_stress_count: snapshot.high_stress_count as i64,
            flagged_count: summary.flagged_count as i64,
            escalated_count: summary.escalated_count as i64,
            total_answers: snapshot.total_answers as i64,
            overall_level: snapshot.overall_level.to_string(),
            protocol: snapshot.protocol.as_str(),
            answers,
        })
    }
}

struct SnapshotRow {
    id: String,
    user_id: String,
    domain: String,
    recorded_at: String,
    average_sentiment: f64,
    high_stress_count: i64,
    total_answers: i64,
    overall_level: String,
    protocol: String,
}

impl SnapshotRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            domain: row.get(2)?,
            recorded_at: row.get(3)?,
            average_sentiment: row.get(4)?,
            high_stress_count: row.get(5)?,
            total_answers: row.get(6)?,
            overall_level: row.get(7)?,
            protocol: row.get(8)?,
        })
    }

    fn into_snapshot(self) -> Result<CheckinSnapshot> {
        let corrupted = |field: &str, err: String| {
            StressError::Storage(format!("Corrupted {} in check-in {}: {}", field, self.id, err))
        };

        Ok(CheckinSnapshot {
            checkin_id: Uuid::parse_str(&self.id).map_err(|e| corrupted("id", e.to_string()))?,
            recorded_at: DateTime::parse_from_rfc3339(&self.recorded_at)
                .map_err(|e| corrupted("timestamp", e.to_string()))?
                .with_timezone(&Utc),
            overall_level: self
                .overall_level
                .parse::<StressLevel>()
                .map_err(|e| corrupted("level", e))?,
            protocol: self
                .protocol
                .parse::<Protocol>()
                .map_err(|e| corrupted("protocol", e))?,
            domain: Domain::parse(&self.domain),
            average_sentiment: self.average_sentiment,
            high_stress_count: self.high_stress_count.max(0) as usize,
            total_answers: self.total_answers.max(0) as usize,
            user_id: self.user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::BatchAggregator;
    use crate::analysis::batch::tests::assessed;
    use chrono::Duration;
    use tempfile::TempDir;

    fn db() -> Database {
        let db = Database::open_in_memory().expect("Failed to open in-memory database");
        db.initialize().expect("Failed to initialize schema");
        db
    }

    fn summary(answers: &[&str], domain: Domain) -> BatchSummary {
        BatchAggregator::new().aggregate(
            answers
                .iter()
                .map(|a| assessed(a, domain.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_open_in_memory() {
        let db = db();
        let conn = db.connection().expect("Failed to get connection");
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"checkins".to_string()));
        assert!(tables.contains(&"checkin_answers".to_string()));

        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let db = db();
        db.initialize().expect("Second initialize should be a no-op");
    }

    #[test]
    fn test_transaction_panic_safety() {
        let db = db();

        let result = db.transaction(|_conn| {
            panic!("Intentional panic for testing");
            #[allow(unreachable_code)]
            Ok(())
        });

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("panicked"));
        assert!(db.connection().is_ok());
    }

    #[test]
    fn test_checkin_roundtrip() {
        let db = db();
        let summary = summary(&["Rarely", "I feel hopeless"], Domain::SelfWorth);
        let saved = db
            .save_checkin("u1", &Domain::SelfWorth, &summary, Utc::now())
            .expect("Failed to save check-in");

        let history = db
            .load_history("u1", &Domain::SelfWorth)
            .expect("Failed to load history");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].checkin_id, saved.checkin_id);
        assert_eq!(history[0].protocol, summary.mcp_protocol);
        assert_eq!(history[0].overall_level, summary.overall_stress_level);
        assert_eq!(history[0].total_answers, 2);

        let answers = db
            .load_answers(&saved.checkin_id)
            .expect("Failed to load answers");
        assert_eq!(answers.len(), 2);
        for (loaded, original) in answers.iter().zip(&summary.individual_results) {
            assert_eq!(loaded.response, original.response);
            assert_eq!(loaded.protocol, original.protocol);
            assert_eq!(loaded.assessment.is_flagged, original.assessment.is_flagged);
        }
    }

    #[test]
    fn test_history_is_ordered_and_scoped() {
        let db = db();
        let now = Utc::now();
        let calm = summary(&["Rarely"], Domain::Health);

        db.save_checkin("u1", &Domain::Health, &calm, now).unwrap();
        db.save_checkin("u1", &Domain::Health, &calm, now - Duration::days(7))
            .unwrap();
        db.save_checkin("u1", &Domain::WorkCareer, &calm, now).unwrap();
        db.save_checkin("u2", &Domain::Health, &calm, now).unwrap();

        let history = db.load_history("u1", &Domain::Health).unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].recorded_at < history[1].recorded_at);

        let domains = db.load_user_domains("u1").unwrap();
        assert_eq!(domains, vec![Domain::Health, Domain::WorkCareer]);
        assert!(db.load_history("nobody", &Domain::Health).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_domain_is_stored_verbatim() {
        let db = db();
        let domain = Domain::parse("Hobbies");
        db.save_checkin("u1", &domain, &summary(&["Rarely"], domain.clone()), Utc::now())
            .unwrap();
        assert_eq!(db.load_user_domains("u1").unwrap(), vec![domain]);
    }

    #[test]
    fn test_file_database_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("history.db");

        {
            let db = Database::open(&path).unwrap();
            db.initialize().unwrap();
            db.save_checkin("u1", &Domain::Health, &summary(&["Rarely"], Domain::Health), Utc::now())
                .unwrap();
        }

        let db = Database::open(&path).unwrap();
        db.initialize().unwrap();
        assert_eq!(db.load_history("u1", &Domain::Health).unwrap().len(), 1);
    }

    #[test]
    fn test_refuses_newer_schema() {
        let db = Database::open_in_memory().unwrap();
        db.connection()
            .unwrap()
            .pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .unwrap();
        assert!(matches!(db.initialize(), Err(StressError::Storage(_))));
    }

    #[test]
    fn test_batch_saves_every_domain() {
        let db = db();
        let work = summary(&["Always exhausted"], Domain::WorkCareer);
        let health = summary(&["Rarely"], Domain::Health);

        let snapshots = db
            .save_checkin_batch(
                "u1",
                &[(Domain::WorkCareer, &work), (Domain::Health, &health)],
                Utc::now(),
            )
            .unwrap();

        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].domain, Domain::WorkCareer);
        assert_eq!(snapshots[1].domain, Domain::Health);
        assert_eq!(db.load_user_domains("u1").unwrap().len(), 2);
        assert_eq!(db.load_answers(&snapshots[1].checkin_id).unwrap().len(), 1);
    }

    #[test]
    fn test_failed_batch_stores_nothing() {
        let db = db();
        db.connection()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER reject_health BEFORE INSERT ON checkins
                 WHEN NEW.domain = 'Health'
                 BEGIN SELECT RAISE(ABORT, 'health rejected'); END;",
            )
            .unwrap();

        let work = summary(&["Rarely"], Domain::WorkCareer);
        let health = summary(&["Rarely"], Domain::Health);
        let result = db.save_checkin_batch(
            "u1",
            &[(Domain::WorkCareer, &work), (Domain::Health, &health)],
            Utc::now(),
        );

        assert!(result.is_err());
        assert!(db.load_history("u1", &Domain::WorkCareer).unwrap().is_empty());
        let answers: i64 = db
            .connection()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM checkin_answers", [], |row| row.get(0))
            .unwrap();
        assert_eq!(answers, 0);
    }

    #[test]
    fn test_pool_config_sizing() {
        let size = PoolConfig::optimal_pool_size();
        assert!(size >= PoolConfig::MIN_POOL_SIZE);
        assert!(size <= PoolConfig::MAX_POOL_SIZE);
    }
}
