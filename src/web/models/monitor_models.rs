use serde::{Deserialize, Serialize};

use crate::db::models::Monitor;
use crate::services::status_service::MonitorStatus;
use crate::web::models::Patch;

// Model for creating a new monitor
#[derive(Deserialize, Debug, Clone)]
pub struct CreateMonitor {
    #[serde(rename = "url_monitor")]
    pub external_id: String,
    #[serde(rename = "nome_monitor")]
    pub name: String,
    #[serde(rename = "descricao_monitor")]
    pub description: String,
}

impl From<CreateMonitor> for Monitor {
    fn from(payload: CreateMonitor) -> Self {
        Monitor {
            external_id: payload.external_id,
            name: payload.name,
            description: payload.description,
        }
    }
}

// Model for updating an existing monitor; only fields present in the body change
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct UpdateMonitor {
    #[serde(rename = "url_monitor")]
    pub external_id: Patch<String>,
    #[serde(rename = "nome_monitor")]
    pub name: Patch<String>,
    #[serde(rename = "descricao_monitor")]
    pub description: Patch<String>,
}

impl UpdateMonitor {
    pub fn apply_to(self, monitor: &mut Monitor) {
        self.external_id.apply_to(&mut monitor.external_id);
        self.name.apply_to(&mut monitor.name);
        self.description.apply_to(&mut monitor.description);
    }
}

/// A monitor as shown on the public status page, with its live state.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MonitorWithStatus {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: MonitorStatus,
}

impl MonitorWithStatus {
    pub fn new(monitor: &Monitor, status: MonitorStatus) -> Self {
        Self {
            id: monitor.external_id.clone(),
            name: monitor.name.clone(),
            description: monitor.description.clone(),
            status,
        }
    }
}
