//! Match Scorer — weighted compatibility between a job-seeker and a posting.
//!
//! Default: `WeightedScorer` (pure, deterministic, no I/O).
//!
//! `AppState` holds an `Arc<dyn MatchScorer>` so the ranking used by
//! "next job" and "match score" can be swapped without touching handlers.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::matching::preferences::Preferences;
use crate::models::job::JobRow;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Score in 0..=100 plus the explanations emitted while computing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: u32,
    pub reasons: Vec<String>,
}

/// The subset of a job posting the scorer looks at.
#[derive(Debug, Clone, Default)]
pub struct JobFields<'a> {
    pub location: Option<&'a str>,
    pub work_mode: Option<&'a str>,
    pub job_type: Option<&'a str>,
    pub required_skills: &'a [String],
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
}

impl<'a> From<&'a JobRow> for JobFields<'a> {
    fn from(job: &'a JobRow) -> Self {
        JobFields {
            location: Some(job.location.as_str()),
            work_mode: Some(job.work_mode.as_str()),
            job_type: Some(job.job_type.as_str()),
            required_skills: &job.required_skills,
            salary_min: job.salary_min.map(f64::from),
            salary_max: job.salary_max.map(f64::from),
        }
    }
}

/// Criterion weights. The defaults sum to 100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchWeights {
    pub skills: u32,
    pub location: u32,
    pub work_mode: u32,
    pub job_type: u32,
    pub salary: u32,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            skills: 50,
            location: 15,
            work_mode: 15,
            job_type: 10,
            salary: 10,
        }
    }
}

/// Share of the skills weight given when a job lists no required skills.
const NO_REQUIREMENTS_CREDIT: f64 = 0.6;
/// Share of a preference weight given when the user expressed no preference.
const NO_PREFERENCE_CREDIT: f64 = 0.5;
/// Share of the salary weight given when the job publishes no salary.
const UNKNOWN_SALARY_CREDIT: f64 = 0.3;

pub const REASON_NO_REQUIREMENTS: &str = "No requiredSkills listed, partial skill credit given.";
pub const REASON_LOCATION: &str = "Location matches preference.";
pub const REASON_WORK_MODE: &str = "Work mode matches preference.";
pub const REASON_JOB_TYPE: &str = "Job type matches preference.";
pub const REASON_SALARY_UNKNOWN: &str = "Salary not provided, low salary confidence.";
pub const REASON_SALARY_MET: &str = "Salary meets minimum preference.";

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Scores a (user, job) pair. Implementations must be pure: identical inputs
/// give identical output, and missing data never errors.
pub trait MatchScorer: Send + Sync {
    fn score(
        &self,
        user_skills: &[String],
        preferences: Option<&Preferences>,
        job: &JobFields<'_>,
    ) -> MatchResult;
}

// ────────────────────────────────────────────────────────────────────────────
// WeightedScorer — default implementation
// ────────────────────────────────────────────────────────────────────────────

/// Additive model over five independent criteria.
///
/// Algorithm:
/// 1. skills: `round(w * hits / required)`; `round(w * 0.6)` when nothing is required
/// 2. location, work mode, job type: full weight on match, zero on mismatch,
///    `round(w * 0.5)` when the user has no preference
/// 3. salary: full weight when the job's ceiling meets the user's minimum,
///    `round(w * 0.3)` when the job publishes nothing, `round(w * 0.5)`
///    when the user has no minimum
/// 4. each partial is rounded on its own, the sum is clamped to 0..=100
///
/// Only the skills line and explicit matches (plus the unknown-salary case)
/// add a reason; "no preference" defaults stay silent.
#[derive(Debug, Clone, Default)]
pub struct WeightedScorer {
    pub weights: MatchWeights,
}

impl MatchScorer for WeightedScorer {
    fn score(
        &self,
        user_skills: &[String],
        preferences: Option<&Preferences>,
        job: &JobFields<'_>,
    ) -> MatchResult {
        compute_job_match(&self.weights, user_skills, preferences, job)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core scoring
// ────────────────────────────────────────────────────────────────────────────

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// `round(weight * fraction)`, half away from zero.
fn partial(weight: u32, fraction: f64) -> i64 {
    (f64::from(weight) * fraction).round() as i64
}

/// Number of required skills present in the user's skill set, ignoring case
/// and surrounding whitespace.
pub fn skill_hits(user_skills: &[String], required: &[String]) -> usize {
    let owned: HashSet<String> = user_skills.iter().map(|s| normalize(s)).collect();
    required
        .iter()
        .filter(|r| owned.contains(&normalize(r)))
        .count()
}

pub fn compute_job_match(
    weights: &MatchWeights,
    user_skills: &[String],
    preferences: Option<&Preferences>,
    job: &JobFields<'_>,
) -> MatchResult {
    let mut reasons = Vec::new();
    let mut score: i64 = 0;

    // 1) Skills
    let required = job.required_skills;
    if required.is_empty() {
        score += partial(weights.skills, NO_REQUIREMENTS_CREDIT);
        reasons.push(REASON_NO_REQUIREMENTS.to_string());
    } else {
        let hits = skill_hits(user_skills, required);
        let ratio = hits as f64 / required.len() as f64;
        score += partial(weights.skills, ratio);
        reasons.push(format!("Skill match: {hits}/{}.", required.len()));
    }

    // 2) Location
    let preferred_locations = preferences
        .map(|p| p.preferred_locations.as_slice())
        .unwrap_or_default();
    if preferred_locations.is_empty() {
        score += partial(weights.location, NO_PREFERENCE_CREDIT);
    } else {
        let job_location = normalize(job.location.unwrap_or_default());
        if preferred_locations
            .iter()
            .any(|loc| normalize(loc) == job_location)
        {
            score += i64::from(weights.location);
            reasons.push(REASON_LOCATION.to_string());
        }
    }

    // 3) Work mode
    let preferred_modes = preferences
        .map(|p| p.preferred_work_mode.as_slice())
        .unwrap_or_default();
    score += token_preference(
        weights.work_mode,
        preferred_modes,
        job.work_mode,
        REASON_WORK_MODE,
        &mut reasons,
    );

    // 4) Job type
    let preferred_types = preferences
        .map(|p| p.preferred_job_types.as_slice())
        .unwrap_or_default();
    score += token_preference(
        weights.job_type,
        preferred_types,
        job.job_type,
        REASON_JOB_TYPE,
        &mut reasons,
    );

    // 5) Salary
    match preferences.and_then(|p| p.min_salary) {
        None => score += partial(weights.salary, NO_PREFERENCE_CREDIT),
        Some(min_salary) => match job.salary_max.or(job.salary_min) {
            None => {
                score += partial(weights.salary, UNKNOWN_SALARY_CREDIT);
                reasons.push(REASON_SALARY_UNKNOWN.to_string());
            }
            Some(ceiling) if ceiling >= min_salary => {
                score += i64::from(weights.salary);
                reasons.push(REASON_SALARY_MET.to_string());
            }
            Some(_) => {}
        },
    }

    MatchResult {
        score: score.clamp(0, 100) as u32,
        reasons,
    }
}

/// Upper-cased token match used for work mode and job type.
fn token_preference(
    weight: u32,
    preferred: &[String],
    job_value: Option<&str>,
    reason: &str,
    reasons: &mut Vec<String>,
) -> i64 {
    if preferred.is_empty() {
        return partial(weight, NO_PREFERENCE_CREDIT);
    }
    let job_value = job_value.unwrap_or_default().to_uppercase();
    if preferred.iter().any(|p| p.to_uppercase() == job_value) {
        reasons.push(reason.to_string());
        i64::from(weight)
    } else {
        0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
