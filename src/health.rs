use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

/// Liveness and readiness endpoints, mounted on every service.
pub fn health_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/health/live", get(live))
        .route("/health/ready", get(ready))
}

async fn live() -> Json<Value> {
    Json(json!({ "status": "live" }))
}

async fn ready() -> Json<Value> {
    Json(json!({ "status": "ready" }))
}
