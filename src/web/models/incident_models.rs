use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::db::models::{Incident, IncidentStatus, IncidentUpdate, Severity};
use crate::db::timestamp;
use crate::web::models::Patch;

// Model for creating a new incident
#[derive(Deserialize, Debug, Clone)]
pub struct CreateIncident {
    pub id: String,
    pub title: String,
    pub status: IncidentStatus,
    pub severity: Severity,
    /// Defaults to the time of creation when omitted.
    #[serde(with = "timestamp::option", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp::option", default)]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub affected_services: Vec<String>,
    #[serde(default)]
    pub updates: Vec<IncidentUpdate>,
}

impl CreateIncident {
    pub fn into_incident(self, now: DateTime<Utc>) -> Incident {
        Incident {
            id: self.id,
            title: self.title,
            status: self.status,
            severity: self.severity,
            created_at: self.created_at.unwrap_or(now),
            resolved_at: self.resolved_at,
            affected_services: self.affected_services,
            updates: self.updates,
        }
    }
}

// Model for updating an existing incident. `id` and `created_at` are immutable.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct UpdateIncident {
    pub title: Patch<String>,
    pub status: Patch<IncidentStatus>,
    pub severity: Patch<Severity>,
    #[serde(deserialize_with = "deserialize_resolved_at")]
    pub resolved_at: Patch<Option<DateTime<Utc>>>,
    pub affected_services: Patch<Vec<String>>,
    pub updates: Patch<Vec<IncidentUpdate>>,
}

fn deserialize_resolved_at<'de, D>(deserializer: D) -> Result<Patch<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    timestamp::option::deserialize(deserializer).map(Patch::Set)
}

impl UpdateIncident {
    pub fn apply_to(self, incident: &mut Incident) {
        self.title.apply_to(&mut incident.title);
        self.status.apply_to(&mut incident.status);
        self.severity.apply_to(&mut incident.severity);
        self.resolved_at.apply_to(&mut incident.resolved_at);
        self.affected_services.apply_to(&mut incident.affected_services);
        self.updates.apply_to(&mut incident.updates);
    }
}

// Model for appending a single update to an existing incident
#[derive(Deserialize, Debug, Clone)]
pub struct AddIncidentUpdate {
    pub status: IncidentStatus,
    pub message: String,
}
