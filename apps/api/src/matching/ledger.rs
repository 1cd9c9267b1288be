//! Swipe actions: decline (left), recover, and apply (right).
//!
//! The decline ledger is append-only; the only way back is a full reset.
//! Concurrent declines and resets on the same user are last-writer-wins.

use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::store::SwipeStore;
use crate::models::application::ApplicationRow;

/// Swipe left: remembers the job as declined. Repeats are harmless.
pub async fn decline(store: &dyn SwipeStore, user_id: Uuid, job_id: Uuid) -> Result<(), AppError> {
    store.append_declined(user_id, job_id).await?;
    info!("User {user_id} declined job {job_id}");
    Ok(())
}

/// Clears every declined job so they become candidates again.
pub async fn recover(store: &dyn SwipeStore, user_id: Uuid) -> Result<u64, AppError> {
    let cleared = store.clear_declined(user_id).await?;
    info!("User {user_id} recovered {cleared} declined jobs");
    Ok(cleared)
}

/// Swipe right: creates the APPLIED application, or returns the existing one.
/// Leaves the decline ledger alone.
pub async fn apply(
    store: &dyn SwipeStore,
    user_id: Uuid,
    job_id: Uuid,
) -> Result<ApplicationRow, AppError> {
    if store.find_job(job_id).await?.is_none() {
        return Err(AppError::NotFound("Job not found".to_string()));
    }
    let application = store.upsert_application(user_id, job_id).await?;
    info!(
        "User {user_id} applied to job {job_id} (application {})",
        application.id
    );
    Ok(application)
}
