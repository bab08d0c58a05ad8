use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use std::sync::Arc;

use crate::db::models::Monitor;
use crate::db::services::monitor_service;
use crate::services::status_service;
use crate::web::models::monitor_models::{CreateMonitor, MonitorWithStatus, UpdateMonitor};
use crate::web::extract::AppJson;
use crate::web::{AppError, AppState};

pub fn create_monitor_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_monitors_with_status).post(create_monitor))
        .route("/list", get(list_monitors))
        .route(
            "/{id}",
            get(get_monitor).put(update_monitor).delete(delete_monitor),
        )
}

/// Public status page view: every cached monitor with its live state.
#[axum::debug_handler]
async fn list_monitors_with_status(
    State(app_state): State<Arc<AppState>>,
) -> Json<Vec<MonitorWithStatus>> {
    let snapshot = app_state.monitor_cache.snapshot();
    let monitors =
        status_service::fetch_monitor_statuses(app_state.status_provider.as_ref(), &snapshot.monitors)
            .await;
    Json(monitors)
}

#[axum::debug_handler]
async fn list_monitors(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<Monitor>>, AppError> {
    let monitors = monitor_service::list_monitors(&app_state.store).await?;
    Ok(Json(monitors))
}

#[axum::debug_handler]
async fn create_monitor(
    State(app_state): State<Arc<AppState>>,
    AppJson(payload): AppJson<CreateMonitor>,
) -> Result<(StatusCode, Json<Monitor>), AppError> {
    let created =
        monitor_service::create_monitor(&app_state.store, &app_state.monitor_cache, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
async fn get_monitor(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Monitor>, AppError> {
    let monitor = monitor_service::get_monitor(&app_state.store, &id).await?;
    Ok(Json(monitor))
}

#[axum::debug_handler]
async fn update_monitor(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateMonitor>,
) -> Result<Json<Monitor>, AppError> {
    let updated =
        monitor_service::update_monitor(&app_state.store, &app_state.monitor_cache, &id, payload)
            .await?;
    Ok(Json(updated))
}

#[axum::debug_handler]
async fn delete_monitor(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    monitor_service::delete_monitor(&app_state.store, &app_state.monitor_cache, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
