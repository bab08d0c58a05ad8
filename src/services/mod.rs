pub mod datadog_client;
pub mod status_service;

pub use datadog_client::{DatadogClient, ProviderError, StatusProvider};
