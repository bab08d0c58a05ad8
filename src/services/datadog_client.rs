//! Datadog monitor API client.
//!
//! Only the monitor's `overall_state` is consumed. Every failure to obtain it
//! is logged and reported to callers as [`MonitorStatus::NoData`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::server::config::ServerConfig;
use crate::services::status_service::MonitorStatus;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Monitor {0} not found")]
    NotFound(String),
    #[error("Access denied for monitor {0}")]
    AccessDenied(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Invalid API host: {0}")]
    InvalidHost(String),
    #[error("Network error: {0}")]
    Network(reqwest::Error),
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::UnexpectedResponse(err.to_string())
        } else {
            ProviderError::Network(err)
        }
    }
}

/// Source of live monitor states.
#[async_trait]
pub trait StatusProvider: Send + Sync {
    /// Returns the monitor's current state. Never fails; unreachable or
    /// unknown monitors report [`MonitorStatus::NoData`].
    async fn fetch_status(&self, monitor_id: &str) -> MonitorStatus;
}

#[derive(Deserialize)]
struct MonitorResponse {
    overall_state: Option<String>,
}

pub struct DatadogClient {
    client: Client,
    api_host: String,
    api_key: Option<String>,
    app_key: Option<String>,
}

impl DatadogClient {
    pub fn new(
        api_host: impl Into<String>,
        api_key: Option<String>,
        app_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_host: api_host.into(),
            api_key,
            app_key,
        })
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self, ProviderError> {
        if config.datadog_api_key.is_none() || config.datadog_app_key.is_none() {
            warn!("Datadog credentials are not configured; monitor states will report 'No Data'.");
        }
        Self::new(
            config.datadog_api_host.clone(),
            config.datadog_api_key.clone(),
            config.datadog_app_key.clone(),
            Duration::from_secs(config.provider_timeout_seconds),
        )
    }

    fn monitor_url(&self, monitor_id: &str) -> Result<Url, ProviderError> {
        let mut url =
            Url::parse(&self.api_host).map_err(|e| ProviderError::InvalidHost(format!("{}: {e}", self.api_host)))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidHost(self.api_host.clone()))?
            .pop_if_empty()
            .extend(["api", "v1", "monitor", monitor_id]);
        Ok(url)
    }

    /// Fetches the raw `overall_state` of one monitor.
    pub async fn get_monitor_state(&self, monitor_id: &str) -> Result<String, ProviderError> {
        let mut request = self.client.get(self.monitor_url(monitor_id)?);
        if let Some(key) = &self.api_key {
            request = request.header("DD-API-KEY", key);
        }
        if let Some(key) = &self.app_key {
            request = request.header("DD-APPLICATION-KEY", key);
        }

        let response = request.send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => return Err(ProviderError::NotFound(monitor_id.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ProviderError::AccessDenied(monitor_id.to_string()));
            }
            status if !status.is_success() => {
                return Err(ProviderError::UnexpectedResponse(format!(
                    "Datadog returned status {status}"
                )));
            }
            _ => {}
        }

        let body: MonitorResponse = response.json().await?;
        body.overall_state
            .ok_or_else(|| ProviderError::UnexpectedResponse("missing overall_state".to_string()))
    }
}

#[async_trait]
impl StatusProvider for DatadogClient {
    async fn fetch_status(&self, monitor_id: &str) -> MonitorStatus {
        match self.get_monitor_state(monitor_id).await {
            Ok(state) => {
                debug!(monitor_id = monitor_id, state = %state, "Fetched monitor state.");
                MonitorStatus::from(state)
            }
            Err(e) => {
                warn!(monitor_id = monitor_id, error = %e, "Failed to fetch monitor state.");
                MonitorStatus::NoData
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::Path,
        http::{HeaderMap, StatusCode as HttpStatus},
        response::{IntoResponse, Response},
        routing::get,
    };

    async fn monitor_handler(Path(id): Path<String>, headers: HeaderMap) -> Response {
        if headers.get("dd-api-key").is_none() || headers.get("dd-application-key").is_none() {
            return HttpStatus::FORBIDDEN.into_response();
        }
        match id.as_str() {
            "123" => Json(serde_json::json!({ "id": 123, "overall_state": "Alert" })).into_response(),
            "456" => Json(serde_json::json!({ "id": 456, "overall_state": "Ignored" })).into_response(),
            "777" => Json(serde_json::json!({ "id": 777 })).into_response(),
            "500" => HttpStatus::INTERNAL_SERVER_ERROR.into_response(),
            "999" => {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(serde_json::json!({ "overall_state": "OK" })).into_response()
            }
            _ => HttpStatus::NOT_FOUND.into_response(),
        }
    }

    async fn spawn_fake_datadog() -> String {
        let router = Router::new().route("/api/v1/monitor/{id}", get(monitor_handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(host: &str, with_keys: bool) -> DatadogClient {
        let key = with_keys.then(|| "secret".to_string());
        DatadogClient::new(host, key.clone(), key, Duration::from_millis(300)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_overall_state() {
        let host = spawn_fake_datadog().await;
        let client = client(&host, true);
        assert_eq!(client.fetch_status("123").await, MonitorStatus::Alert);
    }

    #[tokio::test]
    async fn test_unrecognized_state_passes_through() {
        let host = spawn_fake_datadog().await;
        let client = client(&host, true);
        assert_eq!(
            client.fetch_status("456").await,
            MonitorStatus::Other("Ignored".to_string())
        );
    }

    #[tokio::test]
    async fn test_failures_degrade_to_no_data() {
        let host = spawn_fake_datadog().await;
        let client = client(&host, true);

        assert!(matches!(
            client.get_monitor_state("404").await,
            Err(ProviderError::NotFound(_))
        ));
        assert!(matches!(
            client.get_monitor_state("777").await,
            Err(ProviderError::UnexpectedResponse(_))
        ));
        for id in ["404", "500", "777"] {
            assert_eq!(client.fetch_status(id).await, MonitorStatus::NoData, "monitor {id}");
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_is_access_denied() {
        let host = spawn_fake_datadog().await;
        let client = client(&host, false);
        assert!(matches!(
            client.get_monitor_state("123").await,
            Err(ProviderError::AccessDenied(_))
        ));
        assert_eq!(client.fetch_status("123").await, MonitorStatus::NoData);
    }

    #[tokio::test]
    async fn test_timeout_is_no_data() {
        let host = spawn_fake_datadog().await;
        let client = client(&host, true);
        assert!(matches!(
            client.get_monitor_state("999").await,
            Err(ProviderError::Timeout)
        ));
        assert_eq!(client.fetch_status("999").await, MonitorStatus::NoData);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_no_data() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client(&format!("http://{addr}"), true);
        assert_eq!(client.fetch_status("123").await, MonitorStatus::NoData);
    }

    #[test]
    fn test_monitor_url_encodes_id() {
        let client = client("https://api.datadoghq.eu/", true);
        let url = client.monitor_url("12 3/x").unwrap();
        assert_eq!(url.as_str(), "https://api.datadoghq.eu/api/v1/monitor/12%203%2Fx");
    }
}
