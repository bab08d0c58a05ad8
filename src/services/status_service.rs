//! Live monitor states and the overall status derived from them.

use chrono::Utc;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::db::models::Monitor;
use crate::services::datadog_client::StatusProvider;
use crate::web::models::monitor_models::MonitorWithStatus;
use crate::web::models::status_models::OverallStatusResponse;

/// State of a single monitor as reported by the provider.
///
/// States this service does not know about are kept verbatim in `Other`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum MonitorStatus {
    Ok,
    Warn,
    Alert,
    NoData,
    Skipped,
    Other(String),
}

impl MonitorStatus {
    pub fn as_str(&self) -> &str {
        match self {
            MonitorStatus::Ok => "OK",
            MonitorStatus::Warn => "Warn",
            MonitorStatus::Alert => "Alert",
            MonitorStatus::NoData => "No Data",
            MonitorStatus::Skipped => "Skipped",
            MonitorStatus::Other(s) => s,
        }
    }

    /// Informational states do not take part in aggregation.
    pub fn is_active(&self) -> bool {
        !matches!(self, MonitorStatus::NoData | MonitorStatus::Skipped)
    }
}

impl From<&str> for MonitorStatus {
    fn from(value: &str) -> Self {
        match value {
            "OK" => MonitorStatus::Ok,
            "Warn" => MonitorStatus::Warn,
            "Alert" => MonitorStatus::Alert,
            "No Data" => MonitorStatus::NoData,
            "Skipped" => MonitorStatus::Skipped,
            other => MonitorStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for MonitorStatus {
    fn from(value: String) -> Self {
        MonitorStatus::from(value.as_str())
    }
}

impl From<MonitorStatus> for String {
    fn from(value: MonitorStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Operational,
    PartialOutage,
    MajorOutage,
    Unknown,
}

/// Reduces monitor states to one overall status.
///
/// Only active states count. `Alert` beats `Warn`, which beats all-`OK`;
/// an empty active set or any unrecognized state yields `Unknown`.
pub fn aggregate<'a, I>(statuses: I) -> OverallStatus
where
    I: IntoIterator<Item = &'a MonitorStatus>,
{
    let active: Vec<&MonitorStatus> = statuses.into_iter().filter(|s| s.is_active()).collect();

    if active.is_empty() {
        OverallStatus::Unknown
    } else if active.iter().any(|s| **s == MonitorStatus::Alert) {
        OverallStatus::MajorOutage
    } else if active.iter().any(|s| **s == MonitorStatus::Warn) {
        OverallStatus::PartialOutage
    } else if active.iter().all(|s| **s == MonitorStatus::Ok) {
        OverallStatus::Operational
    } else {
        OverallStatus::Unknown
    }
}

/// Fetches every monitor's state concurrently, preserving monitor order.
pub async fn fetch_monitor_statuses(
    provider: &dyn StatusProvider,
    monitors: &[Monitor],
) -> Vec<MonitorWithStatus> {
    let statuses = join_all(
        monitors
            .iter()
            .map(|monitor| provider.fetch_status(&monitor.external_id)),
    )
    .await;

    monitors
        .iter()
        .zip(statuses)
        .map(|(monitor, status)| MonitorWithStatus::new(monitor, status))
        .collect()
}

pub async fn compute_overall_status(
    provider: &dyn StatusProvider,
    monitors: &[Monitor],
) -> OverallStatusResponse {
    let monitor_statuses = fetch_monitor_statuses(provider, monitors).await;
    let status = aggregate(monitor_statuses.iter().map(|m| &m.status));
    debug!(monitor_count = monitors.len(), status = ?status, "Computed overall status.");

    OverallStatusResponse {
        status,
        updated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    use super::MonitorStatus::{Alert, NoData, Other, Skipped, Warn};

    fn agg(statuses: &[MonitorStatus]) -> OverallStatus {
        aggregate(statuses)
    }

    #[test]
    fn test_empty_is_unknown() {
        assert_eq!(agg(&[]), OverallStatus::Unknown);
    }

    #[test]
    fn test_only_informational_is_unknown() {
        assert_eq!(agg(&[NoData, Skipped, NoData]), OverallStatus::Unknown);
    }

    #[test]
    fn test_alert_wins() {
        assert_eq!(agg(&[MonitorStatus::Ok, Warn, Alert]), OverallStatus::MajorOutage);
        assert_eq!(agg(&[Alert, Other("Unknown".into())]), OverallStatus::MajorOutage);
    }

    #[test]
    fn test_warn_without_alert_is_partial() {
        assert_eq!(agg(&[MonitorStatus::Ok, Warn, NoData]), OverallStatus::PartialOutage);
    }

    #[test]
    fn test_all_ok_is_operational() {
        assert_eq!(agg(&[MonitorStatus::Ok, MonitorStatus::Ok, Skipped, NoData]), OverallStatus::Operational);
    }

    #[test]
    fn test_unrecognized_state_is_unknown() {
        assert_eq!(agg(&[MonitorStatus::Ok, Other("Ignored".into())]), OverallStatus::Unknown);
    }

    #[test]
    fn test_order_does_not_matter() {
        let inputs = [
            vec![MonitorStatus::Ok, Warn, Alert, NoData],
            vec![MonitorStatus::Ok, Warn, Skipped],
            vec![MonitorStatus::Ok, MonitorStatus::Ok, Other("Paused".into())],
            vec![MonitorStatus::Ok, NoData, MonitorStatus::Ok],
        ];
        for input in inputs {
            let expected = agg(&input);
            let mut reversed = input.clone();
            reversed.reverse();
            assert_eq!(agg(&reversed), expected);
            for shift in 1..input.len() {
                let mut rotated = input.clone();
                rotated.rotate_left(shift);
                assert_eq!(agg(&rotated), expected, "rotation of {input:?}");
            }
        }
    }

    #[test]
    fn test_status_strings_round_trip_verbatim() {
        for raw in ["OK", "Warn", "Alert", "No Data", "Skipped", "Ignored"] {
            let status: MonitorStatus = serde_json::from_value(serde_json::json!(raw)).unwrap();
            assert_eq!(serde_json::to_value(&status).unwrap(), serde_json::json!(raw));
        }
    }

    #[test]
    fn test_overall_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(OverallStatus::PartialOutage).unwrap(),
            serde_json::json!("partial_outage")
        );
    }

    struct FixedProvider(HashMap<String, MonitorStatus>);

    #[async_trait]
    impl StatusProvider for FixedProvider {
        async fn fetch_status(&self, monitor_id: &str) -> MonitorStatus {
            self.0.get(monitor_id).cloned().unwrap_or(NoData)
        }
    }

    fn monitor(id: &str) -> Monitor {
        Monitor {
            external_id: id.to_string(),
            name: format!("m{id}"),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_fetch_preserves_monitor_order() {
        let provider = FixedProvider(HashMap::from([
            ("1".to_string(), MonitorStatus::Ok),
            ("2".to_string(), Alert),
        ]));
        let monitors = vec![monitor("2"), monitor("3"), monitor("1")];

        let result = fetch_monitor_statuses(&provider, &monitors).await;
        let got: Vec<(&str, &MonitorStatus)> =
            result.iter().map(|m| (m.id.as_str(), &m.status)).collect();
        assert_eq!(got, vec![("2", &Alert), ("3", &NoData), ("1", &MonitorStatus::Ok)]);
    }

    #[tokio::test]
    async fn test_overall_status_with_single_alert() {
        let provider = FixedProvider(HashMap::from([("123".to_string(), Alert)]));
        let response = compute_overall_status(&provider, &[monitor("123")]).await;
        assert_eq!(response.status, OverallStatus::MajorOutage);
    }
}
