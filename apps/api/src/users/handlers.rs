use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::{Postgres, QueryBuilder};
use tracing::info;

use crate::auth::AuthUser;
use crate::envelope::{Envelope, Pagination};
use crate::errors::AppError;
use crate::extract::{JsonBody, QueryParams};
use crate::jobs::query::escape_like;
use crate::matching::preferences::Preferences;
use crate::models::user::{Profile, PROFILE_COLUMNS};
use crate::pagination::parse_page_window;
use crate::state::AppState;
use crate::users::resume::{
    extract_skills, resume_object_key, store_resume, validate_file_name, validate_size,
};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Profile patch. Absent fields are left alone; `preferences: null` clears.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub skills: Option<Value>,
    #[serde(default, deserialize_with = "present_value")]
    pub preferences: Option<Value>,
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeUploadResponse {
    pub resume_url: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserSearchParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub q: Option<String>,
    pub skills: Option<String>,
}

/// Skills are only replaced when the patch carries a JSON array; non-string
/// items are dropped.
fn skills_patch(value: Option<&Value>) -> Option<Vec<String>> {
    match value {
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
        ),
        _ => None,
    }
}

/// Stored preferences are normalized to the shape the scorer reads.
fn preferences_patch(value: &Value) -> Option<Value> {
    Preferences::from_json(value).and_then(|prefs| serde_json::to_value(prefs).ok())
}

async fn fetch_profile(state: &AppState, user: AuthUser) -> Result<Profile, AppError> {
    sqlx::query_as::<_, Profile>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(user.user_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/users/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Envelope<Profile>>, AppError> {
    Ok(Json(Envelope::ok(fetch_profile(&state, user).await?)))
}

/// PATCH /api/v1/users/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> Result<Json<Envelope<Profile>>, AppError> {
    let skills = skills_patch(req.skills.as_ref());
    let preferences = req.preferences.as_ref().map(preferences_patch);

    let profile = sqlx::query_as::<_, Profile>(&format!(
        r#"
        UPDATE users SET
            full_name = COALESCE($2, full_name),
            skills = COALESCE($3, skills),
            preferences = CASE WHEN $4 THEN $5 ELSE preferences END,
            updated_at = now()
        WHERE id = $1
        RETURNING {PROFILE_COLUMNS}
        "#
    ))
    .bind(user.user_id)
    .bind(&req.full_name)
    .bind(&skills)
    .bind(preferences.is_some())
    .bind(preferences.flatten())
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(Envelope::ok(profile)))
}

/// POST /api/v1/users/upload-resume (multipart field `resume`)
///
/// Stores the file, replaces the user's skills with those detected in it
/// and records the object key as `resumeUrl`.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<Envelope<ResumeUploadResponse>>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some("resume") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
        upload = Some((file_name, data));
        break;
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    let extension = validate_file_name(&file_name)?;
    validate_size(data.len())?;

    let key = resume_object_key(user.user_id, &file_name, Utc::now().timestamp_millis());
    store_resume(
        &state.s3,
        &state.config.s3_bucket,
        &key,
        &extension,
        data.clone(),
    )
    .await?;

    let skills = extract_skills(data, extension).await;
    info!(
        "Detected {} skills in resume for user {}",
        skills.len(),
        user.user_id
    );

    let resume_url = format!("/{key}");
    let updated: Option<(Option<String>, Vec<String>)> = sqlx::query_as(
        r#"
        UPDATE users SET resume_url = $2, skills = $3, updated_at = now()
        WHERE id = $1
        RETURNING resume_url, skills
        "#,
    )
    .bind(user.user_id)
    .bind(&resume_url)
    .bind(&skills)
    .fetch_optional(&state.db)
    .await?;

    let (stored_url, stored_skills) =
        updated.ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(
        Envelope::ok(ResumeUploadResponse {
            resume_url: stored_url.unwrap_or(resume_url),
            skills: stored_skills,
        })
        .with_message("Resume uploaded. Skills auto-detected - you can edit them via update profile."),
    ))
}

/// Appends the directory-search WHERE clause.
fn push_user_filters(qb: &mut QueryBuilder<'_, Postgres>, params: &UserSearchParams) {
    qb.push(" WHERE TRUE");
    if let Some(q) = params.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(q));
        qb.push(" AND (full_name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR email ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
    if let Some(skill) = params
        .skills
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        qb.push(" AND ");
        qb.push_bind(skill.to_string());
        qb.push(" = ANY(skills)");
    }
}

/// GET /api/v1/search/users?q=&skills=
pub async fn handle_search_users(
    State(state): State<AppState>,
    _user: AuthUser,
    QueryParams(params): QueryParams<UserSearchParams>,
) -> Result<Json<Envelope<Vec<Profile>>>, AppError> {
    let window = parse_page_window(params.page.as_deref(), params.limit.as_deref())?;

    let mut count = QueryBuilder::new("SELECT COUNT(*) FROM users");
    push_user_filters(&mut count, &params);
    let total: i64 = count.build_query_scalar().fetch_one(&state.db).await?;

    let mut page = QueryBuilder::new(format!("SELECT {PROFILE_COLUMNS} FROM users"));
    push_user_filters(&mut page, &params);
    page.push(" ORDER BY updated_at DESC LIMIT ");
    page.push_bind(window.limit);
    page.push(" OFFSET ");
    page.push_bind(window.offset());
    let users = page
        .build_query_as::<Profile>()
        .fetch_all(&state.db)
        .await?;

    Ok(Json(Envelope::paginated(
        users,
        Pagination::user_search(window.page, window.limit, total),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_and_null_preferences_differ() {
        let absent: UpdateProfileRequest = serde_json::from_value(json!({})).unwrap();
        assert!(absent.preferences.is_none());

        let cleared: UpdateProfileRequest =
            serde_json::from_value(json!({ "preferences": null })).unwrap();
        assert_eq!(cleared.preferences, Some(Value::Null));
    }

    #[test]
    fn test_preferences_patch_normalizes() {
        let stored = preferences_patch(&json!({
            "preferredLocations": ["Remote"],
            "preferredWorkMode": "REMOTE",
            "unknown": true
        }))
        .unwrap();
        assert_eq!(
            stored,
            json!({
                "preferredLocations": ["Remote"],
                "preferredWorkMode": [],
                "preferredJobTypes": []
            })
        );
        assert!(preferences_patch(&Value::Null).is_none());
    }

    #[test]
    fn test_skills_patch_requires_array() {
        assert_eq!(
            skills_patch(Some(&json!(["Rust", 3, "SQL"]))),
            Some(vec!["Rust".to_string(), "SQL".to_string()])
        );
        assert_eq!(skills_patch(Some(&json!("Rust"))), None);
        assert_eq!(skills_patch(None), None);
    }

    #[test]
    fn test_user_filters_sql() {
        let params = UserSearchParams {
            q: Some("ann".into()),
            skills: Some("Rust".into()),
            ..Default::default()
        };
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM users");
        push_user_filters(&mut qb, &params);
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM users WHERE TRUE AND (full_name ILIKE $1 OR email ILIKE $2) \
             AND $3 = ANY(skills)"
        );
    }
}
