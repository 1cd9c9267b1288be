//! SQL for job listing/search, built with `QueryBuilder` so every filter
//! value is a bind parameter.

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::jobs::filters::{JobFilter, SearchMode};
use crate::models::job::{JobRow, JOB_STATUS_ACTIVE};
use crate::models::Vocabulary;
use crate::pagination::PageWindow;

/// Escapes LIKE wildcards so user text matches literally.
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn contains_pattern(raw: &str) -> String {
    format!("%{}%", escape_like(raw))
}

/// Appends the WHERE clause for `filter`.
pub fn push_job_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &JobFilter) {
    qb.push(" WHERE status = ");
    qb.push_bind(JOB_STATUS_ACTIVE);

    if let Some(text) = &filter.text {
        let pattern = contains_pattern(text);
        qb.push(" AND (title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR company ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR description ILIKE ");
        qb.push_bind(pattern);
        if filter.mode == SearchMode::Search {
            qb.push(" OR ");
            qb.push_bind(text.clone());
            qb.push(" = ANY(required_skills)");
        }
        qb.push(")");
    }

    if let Some(location) = &filter.location {
        qb.push(" AND location ILIKE ");
        qb.push_bind(contains_pattern(location));
    }
    if let Some(mode) = filter.work_mode {
        qb.push(" AND work_mode = ");
        qb.push_bind(mode.as_str());
    }
    if let Some(kind) = filter.job_type {
        qb.push(" AND job_type = ");
        qb.push_bind(kind.as_str());
    }
    if let Some(level) = filter.experience_level {
        qb.push(" AND experience_level = ");
        qb.push_bind(level.as_str());
    }

    match filter.mode {
        SearchMode::Listing => {
            if let Some(min) = filter.min_salary {
                qb.push(" AND salary_min >= ");
                qb.push_bind(min);
            }
            if let Some(max) = filter.max_salary {
                qb.push(" AND salary_max <= ");
                qb.push_bind(max);
            }
        }
        SearchMode::Search => {
            if let Some(min) = filter.min_salary {
                qb.push(" AND salary_min >= ");
                qb.push_bind(min);
            }
            if let Some(max) = filter.max_salary {
                qb.push(" AND salary_min <= ");
                qb.push_bind(max);
            }
        }
    }
}

pub fn count_query(filter: &JobFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM jobs");
    push_job_filters(&mut qb, filter);
    qb
}

pub fn page_query(filter: &JobFilter, window: PageWindow) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT * FROM jobs");
    push_job_filters(&mut qb, filter);
    qb.push(" ORDER BY posted_date DESC, id LIMIT ");
    qb.push_bind(window.limit);
    qb.push(" OFFSET ");
    qb.push_bind(window.offset());
    qb
}

/// Total matching jobs and the requested page.
pub async fn fetch_job_page(
    pool: &PgPool,
    filter: &JobFilter,
    window: PageWindow,
) -> Result<(i64, Vec<JobRow>), sqlx::Error> {
    let total: i64 = count_query(filter)
        .build_query_scalar()
        .fetch_one(pool)
        .await?;
    let jobs = page_query(filter, window)
        .build_query_as::<JobRow>()
        .fetch_all(pool)
        .await?;
    Ok((total, jobs))
}

/// Loads jobs by id, keyed for joining onto applications and bookmarks.
pub async fn load_jobs_by_id(
    pool: &PgPool,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, JobRow>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let jobs = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;
    Ok(jobs.into_iter().map(|job| (job.id, job)).collect())
}
