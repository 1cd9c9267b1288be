//! Query-string parsing for job listing and search.

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::job::{ExperienceLevel, JobType, WorkMode};
use crate::models::Vocabulary;
use crate::pagination::{parse_integer, parse_page_window, PageWindow};

/// Raw query parameters. Everything arrives as text so malformed values
/// can be reported with a useful message instead of a generic rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSearchParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub q: Option<String>,
    pub location: Option<String>,
    pub work_mode: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub min_salary: Option<String>,
    pub max_salary: Option<String>,
}

/// Listing and search differ in how `q` and the salary bounds apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// `q` over title/company/description; `salaryMin >= min`, `salaryMax <= max`.
    Listing,
    /// `q` also matches a required skill; `min <= salaryMin <= max`.
    Search,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobFilter {
    pub mode: SearchMode,
    pub text: Option<String>,
    pub location: Option<String>,
    pub work_mode: Option<WorkMode>,
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
}

fn present(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn vocabulary<T: Vocabulary>(raw: &Option<String>) -> Result<Option<T>, AppError> {
    present(raw).map(T::parse).transpose()
}

impl JobFilter {
    pub fn from_params(
        params: &JobSearchParams,
        mode: SearchMode,
    ) -> Result<(JobFilter, PageWindow), AppError> {
        let window = parse_page_window(params.page.as_deref(), params.limit.as_deref())?;

        let filter = JobFilter {
            mode,
            text: present(&params.q).map(str::to_string),
            location: present(&params.location).map(str::to_string),
            work_mode: vocabulary(&params.work_mode)?,
            job_type: vocabulary(&params.job_type)?,
            experience_level: vocabulary(&params.experience_level)?,
            min_salary: parse_integer("minSalary", params.min_salary.as_deref())?,
            max_salary: parse_integer("maxSalary", params.max_salary.as_deref())?,
        };

        Ok((filter, window))
    }
}
