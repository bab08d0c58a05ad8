//! CRUD over the incident collection, plus timeline updates.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::db::models::Incident;
use crate::db::store::{Collection, JsonStore};
use crate::web::models::incident_models::{AddIncidentUpdate, CreateIncident, UpdateIncident};
use crate::web::AppError;

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Incident with id '{id}' not found"))
}

async fn load(store: &JsonStore) -> Result<Vec<Incident>, AppError> {
    Ok(store.read(Collection::Incidents).await?)
}

fn find_index(incidents: &[Incident], id: &str) -> Result<usize, AppError> {
    incidents
        .iter()
        .position(|i| i.id == id)
        .ok_or_else(|| not_found(id))
}

pub async fn list_incidents(store: &JsonStore) -> Result<Vec<Incident>, AppError> {
    let _guard = store.lock(Collection::Incidents).await;
    load(store).await
}

/// Incidents created within the last `window_days` days, in on-disk order.
///
/// A window reaching past the representable date range has no cutoff.
pub async fn list_recent_incidents(
    store: &JsonStore,
    window_days: i64,
    now: DateTime<Utc>,
) -> Result<Vec<Incident>, AppError> {
    let cutoff = Duration::try_days(window_days).and_then(|window| now.checked_sub_signed(window));
    let incidents = list_incidents(store).await?;
    Ok(incidents
        .into_iter()
        .filter(|i| cutoff.is_none_or(|cutoff| i.created_at >= cutoff))
        .collect())
}

pub async fn get_incident(store: &JsonStore, id: &str) -> Result<Incident, AppError> {
    let _guard = store.lock(Collection::Incidents).await;
    load(store).await?
        .into_iter()
        .find(|i| i.id == id)
        .ok_or_else(|| not_found(id))
}

pub async fn create_incident(
    store: &JsonStore,
    payload: CreateIncident,
    now: DateTime<Utc>,
) -> Result<Incident, AppError> {
    if payload.id.trim().is_empty() {
        return Err(AppError::InvalidInput("Incident id must not be empty".to_string()));
    }
    let incident = payload.into_incident(now);

    let _guard = store.lock(Collection::Incidents).await;
    let mut incidents = load(store).await?;
    if incidents.iter().any(|i| i.id == incident.id) {
        return Err(AppError::Conflict(format!(
            "Incident with id '{}' already exists",
            incident.id
        )));
    }

    incidents.push(incident.clone());
    store.write(Collection::Incidents, &incidents).await?;

    info!(incident_id = %incident.id, severity = ?incident.severity, "Created incident.");
    Ok(incident)
}

pub async fn update_incident(
    store: &JsonStore,
    id: &str,
    payload: UpdateIncident,
) -> Result<Incident, AppError> {
    let _guard = store.lock(Collection::Incidents).await;
    let mut incidents = load(store).await?;
    let index = find_index(&incidents, id)?;

    payload.apply_to(&mut incidents[index]);
    let updated = incidents[index].clone();
    store.write(Collection::Incidents, &incidents).await?;

    info!(incident_id = %id, "Updated incident.");
    Ok(updated)
}

pub async fn delete_incident(store: &JsonStore, id: &str) -> Result<(), AppError> {
    let _guard = store.lock(Collection::Incidents).await;
    let mut incidents = load(store).await?;
    let index = find_index(&incidents, id)?;

    incidents.remove(index);
    store.write(Collection::Incidents, &incidents).await?;

    info!(incident_id = %id, "Deleted incident.");
    Ok(())
}

pub async fn add_incident_update(
    store: &JsonStore,
    id: &str,
    payload: AddIncidentUpdate,
    now: DateTime<Utc>,
) -> Result<Incident, AppError> {
    let _guard = store.lock(Collection::Incidents).await;
    let mut incidents = load(store).await?;
    let index = find_index(&incidents, id)?;

    incidents[index].record_update(payload.status, payload.message, now);
    let updated = incidents[index].clone();
    store.write(Collection::Incidents, &incidents).await?;

    info!(incident_id = %id, status = %payload.status, "Added incident update.");
    Ok(updated)
}
