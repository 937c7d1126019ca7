use axum::Json;
use serde_json::{Value, json};

/// Liveness probe used by the playback side before starting a run.
pub async fn ping_route() -> Json<Value> {
    Json(json!({ "status": "alive" }))
}
