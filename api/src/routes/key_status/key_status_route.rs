use std::sync::Arc;

use axum::{Json, extract::State};
use llm_service::KeyStatus;

use crate::core::app_state::AppState;

/// Reports the provider key's label, usage and limit.
///
/// The probe never fails the request; provider trouble shows up as
/// `ok: false` with a message.
pub async fn key_status_route(State(state): State<Arc<AppState>>) -> Json<KeyStatus> {
    Json(state.profiles.key_status().await)
}
