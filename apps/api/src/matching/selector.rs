//! Candidate selection ("get next job").
//!
//! Pulls a recency-ordered window of active jobs the user has neither
//! declined nor applied to, scores each one and keeps the first strictly
//! best. Since the window is newest-first, ties go to the newest posting.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::scorer::{JobFields, MatchScorer};
use crate::matching::store::{MatchProfile, SwipeStore};
use crate::models::job::JobRow;

/// Number of most recent candidates scored per request.
pub const CANDIDATE_WINDOW: i64 = 50;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextJob {
    pub job: JobRow,
    pub match_score: u32,
    pub reasons: Vec<String>,
}

/// Union of declined and applied ids, deduplicated, first-seen order kept.
pub fn exclusion_set(declined: &[Uuid], applied: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    declined
        .iter()
        .chain(applied)
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Scores every candidate and returns the first with the highest score.
pub fn pick_best(
    scorer: &dyn MatchScorer,
    profile: &MatchProfile,
    candidates: Vec<JobRow>,
) -> Option<NextJob> {
    let mut best: Option<NextJob> = None;

    for job in candidates {
        let result = scorer.score(
            &profile.skills,
            profile.preferences.as_ref(),
            &JobFields::from(&job),
        );

        let leads = best
            .as_ref()
            .map_or(true, |current| result.score > current.match_score);
        if leads {
            best = Some(NextJob {
                job,
                match_score: result.score,
                reasons: result.reasons,
            });
        }
    }

    best
}

/// Returns the best unseen active job for the user, or `None` when every
/// candidate is excluded. Unknown users are a not-found error.
pub async fn next_job(
    store: &dyn SwipeStore,
    scorer: &dyn MatchScorer,
    user_id: Uuid,
) -> Result<Option<NextJob>, AppError> {
    let profile = store
        .match_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let declined = store.declined_job_ids(user_id).await?;
    let applied = store.applied_job_ids(user_id).await?;
    let excluded = exclusion_set(&declined, &applied);

    let candidates = store.candidate_window(&excluded, CANDIDATE_WINDOW).await?;
    debug!(
        "Scoring {} candidates for user {user_id} ({} excluded)",
        candidates.len(),
        excluded.len()
    );

    Ok(pick_best(scorer, &profile, candidates))
}
