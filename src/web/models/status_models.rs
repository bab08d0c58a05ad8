use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::timestamp;
use crate::services::status_service::OverallStatus;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct OverallStatusResponse {
    pub status: OverallStatus,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}
