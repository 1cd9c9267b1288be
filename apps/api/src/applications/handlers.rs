use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::envelope::Envelope;
use crate::errors::AppError;
use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::jobs::query::load_jobs_by_id;
use crate::models::application::{ApplicationRow, ApplicationStatus, ApplicationWithJob};
use crate::models::Vocabulary;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: Option<String>,
}

async fn with_jobs(
    state: &AppState,
    applications: Vec<ApplicationRow>,
) -> Result<Vec<ApplicationWithJob>, AppError> {
    let ids: Vec<Uuid> = applications.iter().map(|a| a.job_id).collect();
    let jobs = load_jobs_by_id(&state.db, &ids).await?;
    Ok(applications
        .into_iter()
        .map(|application| ApplicationWithJob {
            job: jobs.get(&application.job_id).cloned(),
            application,
        })
        .collect())
}

/// Ownership check for a status update.
fn ensure_owner(application: &ApplicationRow, user_id: Uuid) -> Result<(), AppError> {
    if application.user_id != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// GET /api/v1/applications/mine?status=
pub async fn handle_my_applications(
    State(state): State<AppState>,
    user: AuthUser,
    QueryParams(query): QueryParams<StatusQuery>,
) -> Result<Json<Envelope<Vec<ApplicationWithJob>>>, AppError> {
    let status = query
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ApplicationStatus::parse)
        .transpose()?;

    let applications = sqlx::query_as::<_, ApplicationRow>(
        r#"
        SELECT * FROM applications
        WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(user.user_id)
    .bind(status.map(|s| s.as_str()))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(Envelope::ok(with_jobs(&state, applications).await?)))
}

/// PATCH /api/v1/applications/:application_id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(application_id): PathParam<Uuid>,
    JsonBody(body): JsonBody<StatusUpdate>,
) -> Result<Json<Envelope<ApplicationWithJob>>, AppError> {
    let status = ApplicationStatus::parse(body.status.as_deref().unwrap_or_default())?;

    let existing = sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
        .bind(application_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
    ensure_owner(&existing, user.user_id)?;

    let updated = sqlx::query_as::<_, ApplicationRow>(
        "UPDATE applications SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(application_id)
    .bind(status.as_str())
    .fetch_one(&state.db)
    .await?;

    info!(
        "Application {application_id} moved to {} by user {}",
        status.as_str(),
        user.user_id
    );

    let mut joined = with_jobs(&state, vec![updated]).await?;
    let application = joined
        .pop()
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
    Ok(Json(Envelope::ok(application)))
}
