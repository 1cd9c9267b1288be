//! Demo data for local runs (`gigscroll --seed`).
//!
//! Safe to run repeatedly: the demo user is keyed by email and each posting
//! by `(title, company)`, so existing rows are left alone.

use anyhow::Result;
use serde_json::json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::models::job::{ExperienceLevel, JobType, WorkMode};
use crate::models::Vocabulary;

pub const DEMO_EMAIL: &str = "dev@test.com";
const DEMO_PASSWORD: &str = "password123";

#[derive(Debug, Clone, PartialEq)]
pub struct SeedJob {
    pub title: String,
    pub company: &'static str,
    pub location: &'static str,
    pub work_mode: WorkMode,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub salary_min: i32,
    pub salary_max: i32,
    pub required_skills: &'static [&'static str],
    pub description: &'static str,
}

fn base_jobs() -> Vec<SeedJob> {
    vec![
        SeedJob {
            title: "Senior Frontend Engineer".to_string(),
            company: "TechCorp",
            location: "Remote",
            work_mode: WorkMode::Remote,
            job_type: JobType::FullTime,
            experience_level: ExperienceLevel::Senior,
            salary_min: 90_000,
            salary_max: 140_000,
            required_skills: &["React", "TypeScript", "CSS", "Redux"],
            description: "We are looking for a React expert to lead our frontend team.",
        },
        SeedJob {
            title: "Backend Developer (Node.js)".to_string(),
            company: "StartupX",
            location: "New York, NY",
            work_mode: WorkMode::Hybrid,
            job_type: JobType::FullTime,
            experience_level: ExperienceLevel::Mid,
            salary_min: 80_000,
            salary_max: 120_000,
            required_skills: &["Node.js", "Express", "PostgreSQL", "Docker"],
            description: "Join our fast-paced startup building scalable APIs.",
        },
        SeedJob {
            title: "Full Stack Developer".to_string(),
            company: "Innovate Ltd",
            location: "San Francisco, CA",
            work_mode: WorkMode::Onsite,
            job_type: JobType::Contract,
            experience_level: ExperienceLevel::Mid,
            salary_min: 70_000,
            salary_max: 110_000,
            required_skills: &["Python", "Django", "React", "AWS"],
            description: "Help us build internal tools using Python and React.",
        },
        SeedJob {
            title: "Junior Web Developer".to_string(),
            company: "Creative Agency",
            location: "London, UK",
            work_mode: WorkMode::Hybrid,
            job_type: JobType::FullTime,
            experience_level: ExperienceLevel::Entry,
            salary_min: 40_000,
            salary_max: 60_000,
            required_skills: &["HTML", "CSS", "JavaScript", "Vue"],
            description: "Great opportunity for a junior dev to learn Vue.js.",
        },
        SeedJob {
            title: "DevOps Engineer".to_string(),
            company: "CloudSystems",
            location: "Remote",
            work_mode: WorkMode::Remote,
            job_type: JobType::FullTime,
            experience_level: ExperienceLevel::Senior,
            salary_min: 110_000,
            salary_max: 160_000,
            required_skills: &["AWS", "Kubernetes", "Terraform", "CI/CD"],
            description: "Manage our cloud infrastructure and deployment pipelines.",
        },
    ]
}

/// Every base posting followed by its "II" variant.
pub fn seed_jobs() -> Vec<SeedJob> {
    base_jobs()
        .into_iter()
        .flat_map(|job| {
            let variant = SeedJob {
                title: format!("{} II", job.title),
                ..job.clone()
            };
            [job, variant]
        })
        .collect()
}

fn demo_preferences() -> serde_json::Value {
    json!({
        "preferredLocations": ["Remote", "New York"],
        "preferredWorkMode": ["REMOTE", "HYBRID"],
        "preferredJobTypes": [],
        "minSalary": 80000
    })
}

pub async fn run(pool: &PgPool) -> Result<()> {
    info!("Seeding demo data...");

    let password_hash = hash_password(DEMO_PASSWORD.to_string()).await?;
    let skills = vec!["React", "Node.js", "TypeScript", "PostgreSQL"];

    let mut tx = pool.begin().await?;

    let user = sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, full_name, skills, preferences)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (email) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(DEMO_EMAIL)
    .bind(&password_hash)
    .bind("John Developer")
    .bind(&skills)
    .bind(demo_preferences())
    .execute(&mut *tx)
    .await?;
    info!(
        "Demo user {DEMO_EMAIL}: {}",
        if user.rows_affected() == 1 { "created" } else { "already present" }
    );

    let mut created = 0;
    for job in seed_jobs() {
        let result = sqlx::query(
            r#"
            INSERT INTO jobs (id, title, company, description, location, work_mode,
                              job_type, experience_level, salary_min, salary_max,
                              required_skills)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11
            WHERE NOT EXISTS (SELECT 1 FROM jobs WHERE title = $2 AND company = $3)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&job.title)
        .bind(job.company)
        .bind(job.description)
        .bind(job.location)
        .bind(job.work_mode.as_str())
        .bind(job.job_type.as_str())
        .bind(job.experience_level.as_str())
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(job.required_skills)
        .execute(&mut *tx)
        .await?;
        created += result.rows_affected();
    }

    tx.commit().await?;
    info!("Seeded {created} new jobs");
    Ok(())
}
