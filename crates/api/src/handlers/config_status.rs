//! Handler for `/config-status`: which storage backend is live.

use axum::extract::State;
use axum::Json;
use opvang_core::request_queue::QueueStatus;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigStatus {
    /// Backend the configuration selects.
    pub storage_backend: &'static str,
    /// Backend actually serving requests; differs when hosted credentials
    /// are missing.
    pub active_backend: &'static str,
    pub hosted_url_configured: bool,
    pub hosted_key_configured: bool,
    pub request_queue: QueueStatus,
}

/// GET /api/config-status
///
/// Never includes the service key itself.
pub async fn config_status(State(state): State<AppState>) -> Json<ConfigStatus> {
    let storage = &state.config.storage;
    Json(ConfigStatus {
        storage_backend: storage.backend.as_str(),
        active_backend: state.storage.backend(),
        hosted_url_configured: storage.api_url.is_some(),
        hosted_key_configured: storage.api_key.is_some(),
        request_queue: state.request_queue.status(),
    })
}
