use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::job::JobRow;
use crate::models::Vocabulary;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Application joined with the job it refers to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub job: Option<JobRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Applied,
    Interviewing,
    Accepted,
    Rejected,
}

impl Vocabulary for ApplicationStatus {
    const FIELD: &'static str = "status";

    fn all() -> &'static [Self] {
        &[
            ApplicationStatus::Applied,
            ApplicationStatus::Interviewing,
            ApplicationStatus::Accepted,
            ApplicationStatus::Rejected,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "APPLIED",
            ApplicationStatus::Interviewing => "INTERVIEWING",
            ApplicationStatus::Accepted => "ACCEPTED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[test]
    fn test_status_message_lists_lifecycle() {
        match ApplicationStatus::parse("ghosted") {
            Err(AppError::Validation(msg)) => assert_eq!(
                msg,
                "Invalid status. Allowed: APPLIED, INTERVIEWING, ACCEPTED, REJECTED"
            ),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_status_parse_lowercase() {
        assert_eq!(
            ApplicationStatus::parse("interviewing").unwrap(),
            ApplicationStatus::Interviewing
        );
    }
}
