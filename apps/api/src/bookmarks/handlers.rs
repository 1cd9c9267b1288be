use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::envelope::Envelope;
use crate::errors::AppError;
use crate::extract::PathParam;
use crate::jobs::query::load_jobs_by_id;
use crate::models::bookmark::{BookmarkRow, BookmarkWithJob};
use crate::state::AppState;

/// GET /api/v1/bookmarks
pub async fn handle_list_bookmarks(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Envelope<Vec<BookmarkWithJob>>>, AppError> {
    let bookmarks = sqlx::query_as::<_, BookmarkRow>(
        "SELECT * FROM bookmarks WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user.user_id)
    .fetch_all(&state.db)
    .await?;

    let ids: Vec<Uuid> = bookmarks.iter().map(|b| b.job_id).collect();
    let jobs = load_jobs_by_id(&state.db, &ids).await?;

    let items = bookmarks
        .into_iter()
        .map(|bookmark| BookmarkWithJob {
            job: jobs.get(&bookmark.job_id).cloned(),
            bookmark,
        })
        .collect();

    Ok(Json(Envelope::ok(items)))
}

/// POST /api/v1/bookmarks/:job_id
///
/// Idempotent: bookmarking twice returns the original record.
pub async fn handle_add_bookmark(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(job_id): PathParam<Uuid>,
) -> Result<(StatusCode, Json<Envelope<BookmarkRow>>), AppError> {
    if state.swipes.find_job(job_id).await?.is_none() {
        return Err(AppError::NotFound("Job not found".to_string()));
    }

    let bookmark = sqlx::query_as::<_, BookmarkRow>(
        r#"
        INSERT INTO bookmarks (id, user_id, job_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, job_id) DO UPDATE SET user_id = EXCLUDED.user_id
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(job_id)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(Envelope::ok(bookmark))))
}

/// DELETE /api/v1/bookmarks/:job_id
pub async fn handle_remove_bookmark(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(job_id): PathParam<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM bookmarks WHERE user_id = $1 AND job_id = $2")
        .bind(user.user_id)
        .bind(job_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Bookmark not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
