use axum::{extract::State, Json};

use crate::auth::AuthUser;
use crate::envelope::{Envelope, Pagination};
use crate::errors::AppError;
use crate::extract::QueryParams;
use crate::jobs::filters::{JobFilter, JobSearchParams, SearchMode};
use crate::jobs::query::fetch_job_page;
use crate::models::job::JobRow;
use crate::state::AppState;

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    _user: AuthUser,
    QueryParams(params): QueryParams<JobSearchParams>,
) -> Result<Json<Envelope<Vec<JobRow>>>, AppError> {
    let (filter, window) = JobFilter::from_params(&params, SearchMode::Listing)?;
    let (total, jobs) = fetch_job_page(&state.db, &filter, window).await?;
    let pagination = Pagination::job_listing(window.page, window.limit, total);
    Ok(Json(Envelope::paginated(jobs, pagination)))
}

/// GET /api/v1/search/jobs
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    _user: AuthUser,
    QueryParams(params): QueryParams<JobSearchParams>,
) -> Result<Json<Envelope<Vec<JobRow>>>, AppError> {
    let (filter, window) = JobFilter::from_params(&params, SearchMode::Search)?;
    let (total, jobs) = fetch_job_page(&state.db, &filter, window).await?;
    let pagination = Pagination::job_search(window.page, window.limit, total);
    Ok(Json(Envelope::paginated(jobs, pagination)))
}
