use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::db::timestamp;

/// A Datadog monitor shown on the status page.
///
/// The on-disk field names predate this service and are kept so existing
/// `monitors.json` files load unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Monitor {
    /// Provider-native monitor id, stored verbatim.
    #[serde(rename = "url_monitor")]
    pub external_id: String,
    #[serde(rename = "nome_monitor")]
    pub name: String,
    #[serde(rename = "descricao_monitor")]
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Investigating,
    Identified,
    Monitoring,
    Resolved,
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IncidentStatus::Investigating => "investigating",
            IncidentStatus::Identified => "identified",
            IncidentStatus::Monitoring => "monitoring",
            IncidentStatus::Resolved => "resolved",
        };
        f.write_str(s)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Major,
    Critical,
}

/// One customer-facing entry in an incident's timeline.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IncidentUpdate {
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub status: IncidentStatus,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Incident {
    pub id: String,
    pub title: String,
    pub status: IncidentStatus,
    pub severity: Severity,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp::option", default)]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub affected_services: Vec<String>,
    #[serde(default)]
    pub updates: Vec<IncidentUpdate>,
}

impl Incident {
    /// Appends a timeline entry and moves the incident to its status.
    ///
    /// `resolved_at` is stamped the first time the incident resolves and is
    /// never touched afterwards.
    pub fn record_update(&mut self, status: IncidentStatus, message: String, now: DateTime<Utc>) {
        self.updates.push(IncidentUpdate {
            timestamp: now,
            status,
            message,
        });
        self.status = status;
        if status == IncidentStatus::Resolved && self.resolved_at.is_none() {
            self.resolved_at = Some(now);
        }
    }
}
