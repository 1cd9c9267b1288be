//! In-memory `SwipeStore` used by unit and router tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::preferences::Preferences;
use crate::matching::store::{MatchProfile, SwipeStore};
use crate::models::application::{ApplicationRow, ApplicationStatus};
use crate::models::job::{JobRow, JOB_STATUS_ACTIVE};
use crate::models::Vocabulary;

#[derive(Default)]
struct Inner {
    users: Vec<(Uuid, MatchProfile)>,
    jobs: Vec<JobRow>,
    declined: Vec<(Uuid, Uuid)>,
    applications: Vec<ApplicationRow>,
}

#[derive(Default)]
pub struct MemorySwipeStore {
    inner: Mutex<Inner>,
}

impl MemorySwipeStore {
    pub fn add_user(&self, skills: &[&str], preferences: Option<Preferences>) -> Uuid {
        let id = Uuid::new_v4();
        let profile = MatchProfile {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            preferences,
        };
        self.inner.lock().unwrap().users.push((id, profile));
        id
    }

    pub fn add_job(&self, job: JobRow) -> Uuid {
        let id = job.id;
        self.inner.lock().unwrap().jobs.push(job);
        id
    }

    pub fn declined(&self, user_id: Uuid) -> Vec<Uuid> {
        self.inner
            .lock()
            .unwrap()
            .declined
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, j)| *j)
            .collect()
    }

    pub fn application_count(&self, user_id: Uuid, job_id: Uuid) -> usize {
        self.inner
            .lock()
            .unwrap()
            .applications
            .iter()
            .filter(|a| a.user_id == user_id && a.job_id == job_id)
            .count()
    }
}

/// Active job posted `age_days` before a fixed reference instant.
pub fn job(title: &str, required_skills: &[&str], age_days: i64) -> JobRow {
    let reference: DateTime<Utc> = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let posted = reference - Duration::days(age_days);
    JobRow {
        id: Uuid::new_v4(),
        title: title.to_string(),
        company: "Acme".to_string(),
        description: String::new(),
        location: "Remote".to_string(),
        work_mode: "REMOTE".to_string(),
        job_type: "FULL_TIME".to_string(),
        experience_level: "MID".to_string(),
        salary_min: None,
        salary_max: None,
        required_skills: required_skills.iter().map(|s| s.to_string()).collect(),
        status: JOB_STATUS_ACTIVE.to_string(),
        posted_date: posted,
        created_at: posted,
        updated_at: posted,
    }
}

#[async_trait]
impl SwipeStore for MemorySwipeStore {
    async fn match_profile(&self, user_id: Uuid) -> Result<Option<MatchProfile>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .iter()
            .find(|(id, _)| *id == user_id)
            .map(|(_, p)| p.clone()))
    }

    async fn declined_job_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        Ok(self.declined(user_id))
    }

    async fn applied_job_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .applications
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(|a| a.job_id)
            .collect())
    }

    async fn candidate_window(
        &self,
        excluded: &[Uuid],
        limit: i64,
    ) -> Result<Vec<JobRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut jobs: Vec<JobRow> = inner
            .jobs
            .iter()
            .filter(|j| j.status == JOB_STATUS_ACTIVE && !excluded.contains(&j.id))
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.posted_date.cmp(&a.posted_date).then(a.id.cmp(&b.id)));
        jobs.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(jobs)
    }

    async fn find_job(&self, job_id: Uuid) -> Result<Option<JobRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.jobs.iter().find(|j| j.id == job_id).cloned())
    }

    async fn append_declined(&self, user_id: Uuid, job_id: Uuid) -> Result<(), AppError> {
        self.inner.lock().unwrap().declined.push((user_id, job_id));
        Ok(())
    }

    async fn clear_declined(&self, user_id: Uuid) -> Result<u64, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.declined.len();
        inner.declined.retain(|(u, _)| *u != user_id);
        Ok((before - inner.declined.len()) as u64)
    }

    async fn upsert_application(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<ApplicationRow, AppError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(existing) = inner
            .applications
            .iter()
            .find(|a| a.user_id == user_id && a.job_id == job_id)
        {
            return Ok(existing.clone());
        }
        let now = Utc::now();
        let row = ApplicationRow {
            id: Uuid::new_v4(),
            user_id,
            job_id,
            status: ApplicationStatus::Applied.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.applications.push(row.clone());
        Ok(row)
    }
}
