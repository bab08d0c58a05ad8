use axum::{Router, http::Method, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::db::store::JsonStore;
use crate::server::config::ServerConfig;
use crate::server::monitor_cache::MonitorCache;
use crate::services::StatusProvider;
use crate::web::routes::*;

pub use error::AppError;

pub mod error;
pub mod extract;
pub mod models;
pub mod routes;

pub struct AppState {
    pub store: Arc<JsonStore>,
    pub monitor_cache: Arc<MonitorCache>,
    pub status_provider: Arc<dyn StatusProvider>,
    pub config: Arc<ServerConfig>,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_axum_router(
    store: Arc<JsonStore>,
    monitor_cache: Arc<MonitorCache>,
    status_provider: Arc<dyn StatusProvider>,
    config: Arc<ServerConfig>,
) -> Router {
    let app_state = Arc::new(AppState {
        store,
        monitor_cache,
        status_provider,
        config,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_check_handler))
        .route("/api/status", get(status_routes::get_overall_status))
        .nest("/api/monitors", monitor_routes::create_monitor_router())
        .nest("/api/incidents", incident_routes::create_incident_router())
        .with_state(app_state)
        .layer(cors)
}
