use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::Vocabulary;

/// Value of `jobs.status` for postings that can be listed and swiped.
pub const JOB_STATUS_ACTIVE: &str = "Active";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    pub work_mode: String,
    pub job_type: String,
    pub experience_level: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub required_skills: Vec<String>,
    pub status: String,
    pub posted_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkMode {
    Remote,
    Hybrid,
    Onsite,
}

impl Vocabulary for WorkMode {
    const FIELD: &'static str = "workMode";

    fn all() -> &'static [Self] {
        &[WorkMode::Remote, WorkMode::Hybrid, WorkMode::Onsite]
    }

    fn as_str(&self) -> &'static str {
        match self {
            WorkMode::Remote => "REMOTE",
            WorkMode::Hybrid => "HYBRID",
            WorkMode::Onsite => "ONSITE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl Vocabulary for JobType {
    const FIELD: &'static str = "jobType";

    fn all() -> &'static [Self] {
        &[
            JobType::FullTime,
            JobType::PartTime,
            JobType::Contract,
            JobType::Internship,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "FULL_TIME",
            JobType::PartTime => "PART_TIME",
            JobType::Contract => "CONTRACT",
            JobType::Internship => "INTERNSHIP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Lead,
}

impl Vocabulary for ExperienceLevel {
    const FIELD: &'static str = "experienceLevel";

    fn all() -> &'static [Self] {
        &[
            ExperienceLevel::Entry,
            ExperienceLevel::Mid,
            ExperienceLevel::Senior,
            ExperienceLevel::Lead,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "ENTRY",
            ExperienceLevel::Mid => "MID",
            ExperienceLevel::Senior => "SENIOR",
            ExperienceLevel::Lead => "LEAD",
        }
    }
}
