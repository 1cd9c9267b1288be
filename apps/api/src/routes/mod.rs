pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::auth::handlers as auth;
use crate::bookmarks::handlers as bookmarks;
use crate::errors::AppError;
use crate::jobs::handlers as jobs;
use crate::matching::handlers as swipes;
use crate::state::AppState;
use crate::users::handlers as users;
use crate::users::resume::MAX_RESUME_BYTES;

/// Multipart framing on top of the file itself.
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/register", post(auth::handle_register))
        .route("/api/v1/auth/login", post(auth::handle_login))
        // Jobs + swipe workflow
        .route("/api/v1/jobs", get(jobs::handle_list_jobs))
        .route("/api/v1/jobs/next", get(swipes::handle_next_job))
        .route("/api/v1/jobs/recover", post(swipes::handle_recover))
        .route(
            "/api/v1/jobs/:job_id/match-score",
            get(swipes::handle_match_score),
        )
        .route(
            "/api/v1/jobs/:job_id/swipe-right",
            post(swipes::handle_swipe_right),
        )
        .route(
            "/api/v1/jobs/:job_id/swipe-left",
            post(swipes::handle_swipe_left),
        )
        // Applications
        .route(
            "/api/v1/applications/mine",
            get(applications::handle_my_applications),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            patch(applications::handle_update_status),
        )
        // Bookmarks
        .route("/api/v1/bookmarks", get(bookmarks::handle_list_bookmarks))
        .route(
            "/api/v1/bookmarks/:job_id",
            post(bookmarks::handle_add_bookmark).delete(bookmarks::handle_remove_bookmark),
        )
        // Users
        .route(
            "/api/v1/users/profile",
            get(users::handle_get_profile).patch(users::handle_update_profile),
        )
        .route(
            "/api/v1/users/upload-resume",
            post(users::handle_upload_resume)
                .layer(DefaultBodyLimit::max(MAX_RESUME_BYTES + UPLOAD_OVERHEAD_BYTES)),
        )
        // Search
        .route("/api/v1/search/jobs", get(jobs::handle_search_jobs))
        .route("/api/v1/search/users", get(users::handle_search_users))
        .fallback(route_not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{
            header::{AUTHORIZATION, CONTENT_TYPE},
            Method, Request, StatusCode,
        },
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::auth::issue_token;
    use crate::matching::memory::{job, MemorySwipeStore};

    fn app_with(store: Arc<MemorySwipeStore>) -> (Router, AppState) {
        let state = AppState::for_tests(store);
        (build_router(state.clone()), state)
    }

    fn bearer(state: &AppState, user_id: Uuid) -> String {
        let token = issue_token(&state.config.jwt_secret, user_id, 1).unwrap();
        format!("Bearer {token}")
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        auth: Option<&str>,
    ) -> (StatusCode, Value) {
        send_body(app, method, uri, auth, None).await
    }

    async fn send_body(
        app: &Router,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        json: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            request = request.header(AUTHORIZATION, auth);
        }
        let body = match json {
            Some(raw) => {
                request = request.header(CONTENT_TYPE, "application/json");
                Body::from(raw.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let (app, _) = app_with(Arc::new(MemorySwipeStore::default()));
        let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let (app, _) = app_with(Arc::new(MemorySwipeStore::default()));
        let (status, body) = send(&app, Method::GET, "/api/v1/jobs/next", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Missing or invalid Authorization header");
    }

    #[tokio::test]
    async fn test_forged_token_is_unauthorized() {
        let (app, _) = app_with(Arc::new(MemorySwipeStore::default()));
        let forged = issue_token("someone-else", Uuid::new_v4(), 1).unwrap();
        let (status, body) = send(
            &app,
            Method::GET,
            "/api/v1/jobs/next",
            Some(&format!("Bearer {forged}")),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_next_job_for_unknown_user_is_404() {
        let (app, state) = app_with(Arc::new(MemorySwipeStore::default()));
        let auth = bearer(&state, Uuid::new_v4());
        let (status, body) = send(&app, Method::GET, "/api/v1/jobs/next", Some(&auth)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");
    }

    #[tokio::test]
    async fn test_swipe_flow_over_http() {
        let store = Arc::new(MemorySwipeStore::default());
        let user = store.add_user(&["React", "TypeScript"], None);
        let frontend = store.add_job(job("Frontend", &["React", "TypeScript", "CSS", "Redux"], 0));
        let (app, state) = app_with(store.clone());
        let auth = bearer(&state, user);

        let (status, body) = send(&app, Method::GET, "/api/v1/jobs/next", Some(&auth)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["job"]["id"], frontend.to_string());
        assert_eq!(body["data"]["matchScore"], 51);
        assert_eq!(body["data"]["reasons"][0], "Skill match: 2/4.");

        let uri = format!("/api/v1/jobs/{frontend}/swipe-left");
        let (status, _) = send(&app, Method::POST, &uri, Some(&auth)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, Method::GET, "/api/v1/jobs/next", Some(&auth)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].is_null());

        let (status, body) = send(&app, Method::POST, "/api/v1/jobs/recover", Some(&auth)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Rejected jobs history cleared.");

        let (_, body) = send(&app, Method::GET, "/api/v1/jobs/next", Some(&auth)).await;
        assert_eq!(body["data"]["job"]["id"], frontend.to_string());
    }

    #[tokio::test]
    async fn test_swipe_right_is_idempotent_over_http() {
        let store = Arc::new(MemorySwipeStore::default());
        let user = store.add_user(&[], None);
        let target = store.add_job(job("Backend", &["Go"], 0));
        let (app, state) = app_with(store.clone());
        let auth = bearer(&state, user);
        let uri = format!("/api/v1/jobs/{target}/swipe-right");

        let (first_status, first) = send(&app, Method::POST, &uri, Some(&auth)).await;
        let (second_status, second) = send(&app, Method::POST, &uri, Some(&auth)).await;

        assert_eq!(first_status, StatusCode::CREATED);
        assert_eq!(second_status, StatusCode::CREATED);
        assert_eq!(first["data"]["id"], second["data"]["id"]);
        assert_eq!(first["data"]["status"], "APPLIED");
        assert_eq!(store.application_count(user, target), 1);
    }

    #[tokio::test]
    async fn test_match_score_unknown_job_is_404() {
        let store = Arc::new(MemorySwipeStore::default());
        let user = store.add_user(&[], None);
        let (app, state) = app_with(store);
        let auth = bearer(&state, user);
        let uri = format!("/api/v1/jobs/{}/match-score", Uuid::new_v4());

        let (status, body) = send(&app, Method::GET, &uri, Some(&auth)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Job not found");
    }

    #[tokio::test]
    async fn test_match_score_for_job() {
        let store = Arc::new(MemorySwipeStore::default());
        let user = store.add_user(&["Rust"], None);
        let target = store.add_job(job("Systems", &["Rust", "C++"], 0));
        let (app, state) = app_with(store);
        let auth = bearer(&state, user);
        let uri = format!("/api/v1/jobs/{target}/match-score");

        let (status, body) = send(&app, Method::GET, &uri, Some(&auth)).await;
        assert_eq!(status, StatusCode::OK);
        // 25 + 8 + 8 + 5 + 5
        assert_eq!(body["data"]["score"], 51);
        assert_eq!(body["data"]["reasons"][0], "Skill match: 1/2.");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (app, _) = app_with(Arc::new(MemorySwipeStore::default()));
        let (status, body) = send(&app, Method::GET, "/api/v1/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Route not found");
    }

    #[tokio::test]
    async fn test_malformed_job_id_is_json_400() {
        let store = Arc::new(MemorySwipeStore::default());
        let user = store.add_user(&[], None);
        let (app, state) = app_with(store);
        let auth = bearer(&state, user);

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/v1/jobs/not-a-uuid/match-score",
            Some(&auth),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("UUID"));
    }

    #[tokio::test]
    async fn test_malformed_json_body_is_json_400() {
        let (app, state) = app_with(Arc::new(MemorySwipeStore::default()));
        let auth = bearer(&state, Uuid::new_v4());
        let uri = format!("/api/v1/applications/{}/status", Uuid::new_v4());

        let (status, body) =
            send_body(&app, Method::PATCH, &uri, Some(&auth), Some("{bad json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to parse the request body as JSON"));
    }

    #[tokio::test]
    async fn test_malformed_login_body_is_json_400() {
        let (app, _) = app_with(Arc::new(MemorySwipeStore::default()));
        let (status, body) = send_body(
            &app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(r#"{"email": 42}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
