use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

/// GET /api/health
/// Liveness probe with the current server time in unix milliseconds.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "ok": true,
        "ts": Utc::now().timestamp_millis(),
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
