use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::issue_token;
use crate::auth::password::{hash_password, verify_password};
use crate::db::is_unique_violation;
use crate::envelope::Envelope;
use crate::errors::AppError;
use crate::extract::JsonBody;
use crate::models::user::UserRow;
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUserView {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: AuthUserView,
    pub token: String,
}

impl From<&UserRow> for AuthUserView {
    fn from(row: &UserRow) -> Self {
        AuthUserView {
            id: row.id,
            email: row.email.clone(),
            full_name: row.full_name.clone(),
            skills: row.skills.clone(),
        }
    }
}

fn validate_registration(req: &RegisterRequest) -> Result<String, AppError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(email)
}

fn email_taken() -> AppError {
    AppError::Validation("Email already in use".to_string())
}

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<Envelope<AuthResponse>>), AppError> {
    let email = validate_registration(&req)?;

    let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(email_taken());
    }

    let password_hash = hash_password(req.password).await?;

    let user = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, email, password_hash, full_name, skills)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&email)
    .bind(&password_hash)
    .bind(&req.full_name)
    .bind(&req.skills)
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            email_taken()
        } else {
            AppError::Database(e)
        }
    })?;

    let token = issue_token(&state.config.jwt_secret, user.id, state.config.jwt_ttl_hours)?;
    info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(AuthResponse {
            user: AuthUserView::from(&user),
            token,
        })),
    ))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<Envelope<AuthResponse>>, AppError> {
    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

    let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
        .bind(req.email.trim().to_lowercase())
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(req.password, user.password_hash.clone()).await? {
        return Err(invalid());
    }

    let token = issue_token(&state.config.jwt_secret, user.id, state.config.jwt_ttl_hours)?;

    Ok(Json(Envelope::ok(AuthResponse {
        user: AuthUserView::from(&user),
        token,
    })))
}
