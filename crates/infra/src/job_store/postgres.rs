//! Postgres-backed posting store.
//!
//! Predicates are compiled clause by clause into a single parameterised
//! statement with `sqlx::QueryBuilder`; every user-supplied value is bound,
//! never interpolated. Pagination is keyset-based on `(posted_at, id)`.
//!
//! ## Error Mapping
//!
//! | SQLx Error | JobStoreError |
//! |------------|---------------|
//! | Database (any code) | `Backend` |
//! | PoolClosed / PoolTimedOut | `Backend` |
//! | ColumnDecode / row mapping | `Decode` |
//! | Other (I/O, TLS, protocol) | `Backend` |

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::migrate::Migrator;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::instrument;
use uuid::Uuid;

use jobscroll_core::{Clause, ExperienceLevel, FeedKey, JobId, JobPosting, Predicate};

use super::r#trait::{JobStore, JobStoreError};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const COLUMNS: &str = r#"
    id,
    title,
    company,
    company_logo,
    location,
    job_type,
    experience_level,
    category,
    description,
    salary_min,
    salary_max,
    salary_currency,
    salary_period,
    remote,
    apply_url,
    audience_tags,
    is_verified,
    is_active,
    posted_at,
    created_at
"#;

/// Postgres-backed read-only posting store.
///
/// ## Thread Safety
///
/// Uses the SQLx connection pool, which is `Send + Sync`; the store is cheap to
/// clone and share across handlers.
#[derive(Debug, Clone)]
pub struct PostgresJobStore {
    pool: Arc<PgPool>,
}

impl PostgresJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> Result<(), JobStoreError> {
        MIGRATOR
            .run(&*self.pool)
            .await
            .map_err(|e| JobStoreError::Backend(format!("migration failed: {e}")))
    }

    /// Connectivity check used by the health endpoint.
    pub async fn ping(&self) -> Result<(), JobStoreError> {
        sqlx::query("SELECT 1")
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ping", e))?;
        Ok(())
    }

    #[instrument(skip(self, id), fields(job_id = %id), err)]
    pub async fn load_feed_key(&self, id: JobId) -> Result<Option<FeedKey>, JobStoreError> {
        let row = sqlx::query("SELECT id, posted_at FROM job_listings WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("load_feed_key", e))?;

        row.map(|r| {
            let id: Uuid = r.try_get("id").map_err(decode_error)?;
            let posted_at: DateTime<Utc> = r.try_get("posted_at").map_err(decode_error)?;
            Ok(FeedKey {
                posted_at,
                id: JobId::from_uuid(id),
            })
        })
        .transpose()
    }

    #[instrument(skip(self, predicate), fields(clauses = predicate.clauses().len()), err)]
    pub async fn fetch_matching(
        &self,
        predicate: &Predicate,
        after: Option<FeedKey>,
        take: usize,
    ) -> Result<Vec<JobPosting>, JobStoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT");
        qb.push(COLUMNS);
        qb.push(" FROM job_listings WHERE TRUE");

        for clause in predicate.clauses() {
            push_clause(&mut qb, clause);
        }

        if let Some(cursor) = after {
            qb.push(" AND (posted_at, id) < (")
                .push_bind(cursor.posted_at)
                .push(", ")
                .push_bind(*cursor.id.as_uuid())
                .push(")");
        }

        qb.push(" ORDER BY posted_at DESC, id DESC LIMIT ")
            .push_bind(i64::try_from(take).unwrap_or(i64::MAX));

        let rows = qb
            .build()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("fetch_matching", e))?;

        rows.iter().map(posting_from_row).collect()
    }

    #[instrument(skip(self, id), fields(job_id = %id), err)]
    pub async fn fetch_by_id(&self, id: JobId) -> Result<Option<JobPosting>, JobStoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT");
        qb.push(COLUMNS);
        qb.push(" FROM job_listings WHERE id = ").push_bind(*id.as_uuid());

        let row = qb
            .build()
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("fetch_by_id", e))?;

        row.as_ref().map(posting_from_row).transpose()
    }
}

#[async_trait::async_trait]
impl JobStore for PostgresJobStore {
    async fn feed_key(&self, id: JobId) -> Result<Option<FeedKey>, JobStoreError> {
        self.load_feed_key(id).await
    }

    async fn find_matching(
        &self,
        predicate: &Predicate,
        after: Option<FeedKey>,
        take: usize,
    ) -> Result<Vec<JobPosting>, JobStoreError> {
        self.fetch_matching(predicate, after, take).await
    }

    async fn get(&self, id: JobId) -> Result<Option<JobPosting>, JobStoreError> {
        self.fetch_by_id(id).await
    }
}

/// Append one predicate clause as ` AND <condition>`.
fn push_clause(qb: &mut QueryBuilder<'_, Postgres>, clause: &Clause) {
    match clause {
        Clause::Active => {
            qb.push(" AND is_active = TRUE");
        }
        Clause::SearchTitleOrCompany(needle) => {
            let pattern = like_pattern(needle);
            qb.push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR company ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        Clause::LocationContains(needle) => {
            qb.push(" AND location ILIKE ").push_bind(like_pattern(needle));
        }
        Clause::RemoteOnly => {
            qb.push(" AND remote = TRUE");
        }
        Clause::SalaryCeilingAtLeast(floor) => {
            // NULL ceilings fail the comparison and are excluded.
            qb.push(" AND salary_max >= ").push_bind(*floor);
        }
        Clause::LevelIn(levels) => {
            let levels: Vec<String> = levels.iter().map(|l| l.as_str().to_string()).collect();
            qb.push(" AND experience_level = ANY(")
                .push_bind(levels)
                .push(")");
        }
        Clause::VerifiedOnly => {
            qb.push(" AND is_verified = TRUE");
        }
    }
}

/// `%needle%` with LIKE metacharacters escaped (backslash is the default
/// escape character for ILIKE).
fn like_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

fn posting_from_row(row: &PgRow) -> Result<JobPosting, JobStoreError> {
    let id: Uuid = row.try_get("id").map_err(decode_error)?;
    let level: Option<String> = row.try_get("experience_level").map_err(decode_error)?;
    let experience_level = level
        .as_deref()
        .map(str::parse::<ExperienceLevel>)
        .transpose()
        .map_err(|e| JobStoreError::Decode(e.to_string()))?;

    Ok(JobPosting {
        id: JobId::from_uuid(id),
        title: row.try_get("title").map_err(decode_error)?,
        company: row.try_get("company").map_err(decode_error)?,
        company_logo: row.try_get("company_logo").map_err(decode_error)?,
        location: row.try_get("location").map_err(decode_error)?,
        job_type: row.try_get("job_type").map_err(decode_error)?,
        experience_level,
        category: row.try_get("category").map_err(decode_error)?,
        description: row.try_get("description").map_err(decode_error)?,
        salary_min: row.try_get("salary_min").map_err(decode_error)?,
        salary_max: row.try_get("salary_max").map_err(decode_error)?,
        salary_currency: row.try_get("salary_currency").map_err(decode_error)?,
        salary_period: row.try_get("salary_period").map_err(decode_error)?,
        remote: row.try_get("remote").map_err(decode_error)?,
        apply_url: row.try_get("apply_url").map_err(decode_error)?,
        audience_tags: row.try_get("audience_tags").map_err(decode_error)?,
        verified: row.try_get("is_verified").map_err(decode_error)?,
        active: row.try_get("is_active").map_err(decode_error)?,
        posted_at: row.try_get("posted_at").map_err(decode_error)?,
        created_at: row.try_get("created_at").map_err(decode_error)?,
    })
}

fn decode_error(err: sqlx::Error) -> JobStoreError {
    JobStoreError::Decode(err.to_string())
}

/// Map SQLx errors to JobStoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> JobStoreError {
    match err {
        sqlx::Error::Database(db_err) => JobStoreError::Backend(format!(
            "database error in {}: {} (code {})",
            operation,
            db_err.message(),
            db_err.code().as_deref().unwrap_or("none")
        )),
        sqlx::Error::PoolClosed => {
            JobStoreError::Backend(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            JobStoreError::Backend(format!("timed out acquiring a connection in {operation}"))
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_) => {
            JobStoreError::Decode(format!("in {operation}: {err}"))
        }
        _ => JobStoreError::Backend(format!("sqlx error in {operation}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobscroll_core::{FilterRequest, compile};

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("100%_c\\"), "%100\\%\\_c\\\\%");
    }

    #[test]
    fn active_only_predicate_renders_one_condition() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT id FROM job_listings WHERE TRUE");
        for clause in Predicate::active_only().clauses() {
            push_clause(&mut qb, clause);
        }
        assert_eq!(qb.sql(), "SELECT id FROM job_listings WHERE TRUE AND is_active = TRUE");
    }

    #[test]
    fn full_predicate_binds_every_value() {
        let predicate = compile(&FilterRequest {
            search: Some("rust".into()),
            location: Some("berlin".into()),
            remote_only: Some(true),
            salary_min: Some(100_000),
            experience_levels: Some([ExperienceLevel::Senior].into_iter().collect()),
            verified_only: Some(true),
        });

        let mut qb = QueryBuilder::<Postgres>::new("SELECT id FROM job_listings WHERE TRUE");
        for clause in predicate.clauses() {
            push_clause(&mut qb, clause);
        }

        let sql = qb.sql();
        assert!(sql.contains("(title ILIKE $1 OR company ILIKE $2)"));
        assert!(sql.contains("location ILIKE $3"));
        assert!(sql.contains("remote = TRUE"));
        assert!(sql.contains("salary_max >= $4"));
        assert!(sql.contains("experience_level = ANY($5)"));
        assert!(sql.contains("is_verified = TRUE"));
        assert!(!sql.contains("rust"));
    }
}
