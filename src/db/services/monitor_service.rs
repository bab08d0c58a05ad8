//! CRUD over the monitor collection.
//!
//! Every successful mutation rebuilds the in-memory monitor snapshot before
//! the collection lock is released.

use tracing::info;

use crate::db::models::Monitor;
use crate::db::store::{Collection, JsonStore};
use crate::server::monitor_cache::MonitorCache;
use crate::web::models::Patch;
use crate::web::models::monitor_models::{CreateMonitor, UpdateMonitor};
use crate::web::AppError;

fn not_found(external_id: &str) -> AppError {
    AppError::NotFound(format!("Monitor with url_monitor '{external_id}' not found"))
}

fn normalize_external_id(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("url_monitor must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

async fn persist(store: &JsonStore, cache: &MonitorCache, monitors: Vec<Monitor>) -> Result<(), AppError> {
    store.write(Collection::Monitors, &monitors).await?;
    cache.replace(monitors);
    Ok(())
}

pub async fn list_monitors(store: &JsonStore) -> Result<Vec<Monitor>, AppError> {
    let _guard = store.lock(Collection::Monitors).await;
    Ok(store.read(Collection::Monitors).await?)
}

pub async fn get_monitor(store: &JsonStore, external_id: &str) -> Result<Monitor, AppError> {
    let _guard = store.lock(Collection::Monitors).await;
    let monitors: Vec<Monitor> = store.read(Collection::Monitors).await?;
    monitors
        .into_iter()
        .find(|m| m.external_id == external_id)
        .ok_or_else(|| not_found(external_id))
}

pub async fn create_monitor(
    store: &JsonStore,
    cache: &MonitorCache,
    payload: CreateMonitor,
) -> Result<Monitor, AppError> {
    let mut monitor = Monitor::from(payload);
    monitor.external_id = normalize_external_id(&monitor.external_id)?;

    let _guard = store.lock(Collection::Monitors).await;
    let mut monitors: Vec<Monitor> = store.read(Collection::Monitors).await?;
    if monitors.iter().any(|m| m.external_id == monitor.external_id) {
        return Err(AppError::Conflict(format!(
            "Monitor with url_monitor '{}' already exists",
            monitor.external_id
        )));
    }

    monitors.push(monitor.clone());
    persist(store, cache, monitors).await?;

    info!(monitor_id = %monitor.external_id, "Created monitor.");
    Ok(monitor)
}

pub async fn update_monitor(
    store: &JsonStore,
    cache: &MonitorCache,
    external_id: &str,
    mut payload: UpdateMonitor,
) -> Result<Monitor, AppError> {
    if let Some(new_id) = payload.external_id.as_set() {
        let normalized = normalize_external_id(new_id)?;
        payload.external_id = Patch::Set(normalized);
    }

    let _guard = store.lock(Collection::Monitors).await;
    let mut monitors: Vec<Monitor> = store.read(Collection::Monitors).await?;
    let index = monitors
        .iter()
        .position(|m| m.external_id == external_id)
        .ok_or_else(|| not_found(external_id))?;

    if let Some(new_id) = payload.external_id.as_set() {
        let taken = monitors
            .iter()
            .enumerate()
            .any(|(i, m)| i != index && &m.external_id == new_id);
        if taken {
            return Err(AppError::Conflict(format!(
                "Monitor with url_monitor '{new_id}' already exists"
            )));
        }
    }

    payload.apply_to(&mut monitors[index]);
    let updated = monitors[index].clone();
    persist(store, cache, monitors).await?;

    info!(monitor_id = %external_id, "Updated monitor.");
    Ok(updated)
}

pub async fn delete_monitor(
    store: &JsonStore,
    cache: &MonitorCache,
    external_id: &str,
) -> Result<(), AppError> {
    let _guard = store.lock(Collection::Monitors).await;
    let mut monitors: Vec<Monitor> = store.read(Collection::Monitors).await?;
    let before = monitors.len();
    monitors.retain(|m| m.external_id != external_id);
    if monitors.len() == before {
        return Err(not_found(external_id));
    }

    persist(store, cache, monitors).await?;

    info!(monitor_id = %external_id, "Deleted monitor.");
    Ok(())
}
