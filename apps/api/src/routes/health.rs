use axum::Json;
use serde_json::{json, Value};

/// GET /api/v1/health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "ok": true,
        "service": "GigScroll API",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
