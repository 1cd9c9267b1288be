//! Axum route handlers for the swipe API.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::envelope::{Envelope, Notice};
use crate::errors::AppError;
use crate::extract::PathParam;
use crate::matching::ledger::{apply, decline, recover};
use crate::matching::scorer::{JobFields, MatchResult};
use crate::matching::selector::{next_job, NextJob};
use crate::models::application::ApplicationRow;
use crate::state::AppState;

/// GET /api/v1/jobs/next
///
/// `data` is null once every active job has been declined or applied to;
/// the client should offer "recover".
pub async fn handle_next_job(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Envelope<Option<NextJob>>>, AppError> {
    let next = next_job(state.swipes.as_ref(), state.scorer.as_ref(), user.user_id).await?;
    Ok(Json(Envelope::ok(next)))
}

/// GET /api/v1/jobs/:job_id/match-score
pub async fn handle_match_score(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(job_id): PathParam<Uuid>,
) -> Result<Json<Envelope<MatchResult>>, AppError> {
    let profile = state
        .swipes
        .match_profile(user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let job = state
        .swipes
        .find_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    let result = state.scorer.score(
        &profile.skills,
        profile.preferences.as_ref(),
        &JobFields::from(&job),
    );
    Ok(Json(Envelope::ok(result)))
}

/// POST /api/v1/jobs/:job_id/swipe-right
pub async fn handle_swipe_right(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(job_id): PathParam<Uuid>,
) -> Result<(StatusCode, Json<Envelope<ApplicationRow>>), AppError> {
    let application = apply(state.swipes.as_ref(), user.user_id, job_id).await?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(application))))
}

/// POST /api/v1/jobs/:job_id/swipe-left
pub async fn handle_swipe_left(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(job_id): PathParam<Uuid>,
) -> Result<StatusCode, AppError> {
    decline(state.swipes.as_ref(), user.user_id, job_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/jobs/recover
pub async fn handle_recover(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Notice>, AppError> {
    recover(state.swipes.as_ref(), user.user_id).await?;
    Ok(Json(Notice::ok("Rejected jobs history cleared.")))
}
