use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use std::sync::Arc;

use crate::db::models::Incident;
use crate::db::services::incident_service;
use crate::web::models::incident_models::{AddIncidentUpdate, CreateIncident, UpdateIncident};
use crate::web::extract::AppJson;
use crate::web::{AppError, AppState};

pub fn create_incident_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_recent_incidents).post(create_incident))
        .route("/list", get(list_incidents))
        .route(
            "/{id}",
            get(get_incident).put(update_incident).delete(delete_incident),
        )
        .route("/{id}/updates", post(add_incident_update))
}

/// Incidents opened within the configured window, for the public page.
#[axum::debug_handler]
async fn list_recent_incidents(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<Incident>>, AppError> {
    let incidents = incident_service::list_recent_incidents(
        &app_state.store,
        app_state.config.incident_window_days,
        Utc::now(),
    )
    .await?;
    Ok(Json(incidents))
}

#[axum::debug_handler]
async fn list_incidents(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<Incident>>, AppError> {
    let incidents = incident_service::list_incidents(&app_state.store).await?;
    Ok(Json(incidents))
}

#[axum::debug_handler]
async fn create_incident(
    State(app_state): State<Arc<AppState>>,
    AppJson(payload): AppJson<CreateIncident>,
) -> Result<(StatusCode, Json<Incident>), AppError> {
    let created = incident_service::create_incident(&app_state.store, payload, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
async fn get_incident(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Incident>, AppError> {
    let incident = incident_service::get_incident(&app_state.store, &id).await?;
    Ok(Json(incident))
}

#[axum::debug_handler]
async fn update_incident(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateIncident>,
) -> Result<Json<Incident>, AppError> {
    let updated = incident_service::update_incident(&app_state.store, &id, payload).await?;
    Ok(Json(updated))
}

#[axum::debug_handler]
async fn delete_incident(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    incident_service::delete_incident(&app_state.store, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
async fn add_incident_update(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<AddIncidentUpdate>,
) -> Result<(StatusCode, Json<Incident>), AppError> {
    let updated =
        incident_service::add_incident_update(&app_state.store, &id, payload, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(updated)))
}
