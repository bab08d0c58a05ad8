use axum::{Json, extract::State};
use std::sync::Arc;

use crate::services::status_service;
use crate::web::AppState;
use crate::web::models::status_models::OverallStatusResponse;

/// Overall status of all cached monitors, computed on every request.
#[axum::debug_handler]
pub async fn get_overall_status(
    State(app_state): State<Arc<AppState>>,
) -> Json<OverallStatusResponse> {
    let snapshot = app_state.monitor_cache.snapshot();
    let response =
        status_service::compute_overall_status(app_state.status_provider.as_ref(), &snapshot.monitors)
            .await;
    Json(response)
}
