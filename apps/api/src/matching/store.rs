//! Storage boundary for the swipe workflow: user match profiles, the decline
//! ledger, candidate windows and application upserts.
//!
//! Carried in `AppState` as `Arc<dyn SwipeStore>`; `PgSwipeStore` is the
//! production backend.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::preferences::Preferences;
use crate::models::application::{ApplicationRow, ApplicationStatus};
use crate::models::job::{JobRow, JOB_STATUS_ACTIVE};
use crate::models::Vocabulary;

/// What the scorer needs to know about a user.
#[derive(Debug, Clone, Default)]
pub struct MatchProfile {
    pub skills: Vec<String>,
    pub preferences: Option<Preferences>,
}

#[async_trait]
pub trait SwipeStore: Send + Sync {
    /// Skills and parsed preferences, or `None` for an unknown user.
    async fn match_profile(&self, user_id: Uuid) -> Result<Option<MatchProfile>, AppError>;

    /// Declined job ids in the order they were declined. May contain duplicates.
    async fn declined_job_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError>;

    async fn applied_job_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError>;

    /// Active jobs not in `excluded`, newest posting first, at most `limit`.
    async fn candidate_window(
        &self,
        excluded: &[Uuid],
        limit: i64,
    ) -> Result<Vec<JobRow>, AppError>;

    async fn find_job(&self, job_id: Uuid) -> Result<Option<JobRow>, AppError>;

    /// Appends to the decline ledger without deduplicating.
    async fn append_declined(&self, user_id: Uuid, job_id: Uuid) -> Result<(), AppError>;

    /// Empties the decline ledger. Returns how many entries were removed.
    async fn clear_declined(&self, user_id: Uuid) -> Result<u64, AppError>;

    /// Creates an APPLIED application, or returns the existing one for the pair.
    async fn upsert_application(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<ApplicationRow, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres backend
// ────────────────────────────────────────────────────────────────────────────

pub struct PgSwipeStore {
    pool: PgPool,
}

impl PgSwipeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SwipeStore for PgSwipeStore {
    async fn match_profile(&self, user_id: Uuid) -> Result<Option<MatchProfile>, AppError> {
        let row: Option<(Vec<String>, Option<Value>)> =
            sqlx::query_as("SELECT skills, preferences FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(skills, preferences)| MatchProfile {
            skills,
            preferences: Preferences::from_column(preferences.as_ref()),
        }))
    }

    async fn declined_job_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let ids = sqlx::query_scalar(
            "SELECT job_id FROM declined_jobs WHERE user_id = $1 ORDER BY declined_at, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn applied_job_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let ids = sqlx::query_scalar("SELECT job_id FROM applications WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn candidate_window(
        &self,
        excluded: &[Uuid],
        limit: i64,
    ) -> Result<Vec<JobRow>, AppError> {
        let jobs = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT * FROM jobs
            WHERE status = $1 AND NOT (id = ANY($2))
            ORDER BY posted_date DESC, id
            LIMIT $3
            "#,
        )
        .bind(JOB_STATUS_ACTIVE)
        .bind(excluded)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    async fn find_job(&self, job_id: Uuid) -> Result<Option<JobRow>, AppError> {
        let job = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn append_declined(&self, user_id: Uuid, job_id: Uuid) -> Result<(), AppError> {
        sqlx::query("INSERT INTO declined_jobs (user_id, job_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(job_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear_declined(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM declined_jobs WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn upsert_application(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<ApplicationRow, AppError> {
        // The no-op DO UPDATE makes RETURNING yield the existing row on conflict,
        // so concurrent duplicate swipes collapse onto one record.
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications (id, user_id, job_id, status)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, job_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(job_id)
        .bind(ApplicationStatus::Applied.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
