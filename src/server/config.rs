use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    /// Datadog credentials. Not validated: missing keys make every monitor
    /// report "No Data".
    pub datadog_api_key: Option<String>,
    pub datadog_app_key: Option<String>,

    #[serde(default = "default_datadog_api_host")]
    pub datadog_api_host: String,

    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default = "default_provider_timeout_seconds")]
    pub provider_timeout_seconds: u64,

    #[serde(default = "default_incident_window_days")]
    pub incident_window_days: i64,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
struct PartialServerConfig {
    datadog_api_key: Option<String>,
    datadog_app_key: Option<String>,
    datadog_api_host: Option<String>,
    data_dir: Option<String>,
    log_dir: Option<String>,
    listen_addr: Option<String>,
    provider_timeout_seconds: Option<u64>,
    incident_window_days: Option<i64>,
}

fn default_datadog_api_host() -> String {
    "https://api.datadoghq.com".to_string()
}

fn default_data_dir() -> String {
    ".".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_provider_timeout_seconds() -> u64 {
    10
}

fn default_incident_window_days() -> i64 {
    30
}

const MAX_INCIDENT_WINDOW_DAYS: i64 = 36_500;

impl Default for ServerConfig {
    fn default() -> Self {
        Self::merge(PartialServerConfig::default(), PartialServerConfig::default())
    }
}

impl ServerConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self, String> {
        dotenv::dotenv().ok();

        // 1. Load from file (optional)
        let file_config = match config_path {
            Some(path_str) => read_file_layer(Path::new(path_str))?,
            None => PartialServerConfig::default(),
        };

        // 2. Load from environment variables
        let env_config: PartialServerConfig = envy::from_env::<PartialServerConfig>()
            .map_err(|e| format!("Failed to load config from environment: {e}"))?;

        // 3. Merge: environment overrides file
        let config = Self::merge(env_config, file_config);
        config.validate()?;
        Ok(config)
    }

    fn merge(env_config: PartialServerConfig, file_config: PartialServerConfig) -> Self {
        ServerConfig {
            datadog_api_key: env_config.datadog_api_key.or(file_config.datadog_api_key),
            datadog_app_key: env_config.datadog_app_key.or(file_config.datadog_app_key),
            datadog_api_host: env_config.datadog_api_host.or(file_config.datadog_api_host)
                .unwrap_or_else(default_datadog_api_host),
            data_dir: env_config.data_dir.or(file_config.data_dir)
                .unwrap_or_else(default_data_dir),
            log_dir: env_config.log_dir.or(file_config.log_dir)
                .unwrap_or_else(default_log_dir),
            listen_addr: env_config.listen_addr.or(file_config.listen_addr)
                .unwrap_or_else(default_listen_addr),
            provider_timeout_seconds: env_config.provider_timeout_seconds.or(file_config.provider_timeout_seconds)
                .unwrap_or_else(default_provider_timeout_seconds),
            incident_window_days: env_config.incident_window_days.or(file_config.incident_window_days)
                .unwrap_or_else(default_incident_window_days),
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.provider_timeout_seconds == 0 {
            return Err("PROVIDER_TIMEOUT_SECONDS must be greater than zero".to_string());
        }
        if !(0..=MAX_INCIDENT_WINDOW_DAYS).contains(&self.incident_window_days) {
            return Err(format!(
                "INCIDENT_WINDOW_DAYS must be between 0 and {MAX_INCIDENT_WINDOW_DAYS}"
            ));
        }
        Ok(())
    }
}

fn read_file_layer(path: &Path) -> Result<PartialServerConfig, String> {
    if !path.exists() {
        return Ok(PartialServerConfig::default());
    }
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file at {path:?}: {e}"))?;
    toml::from_str(&contents)
        .map_err(|e| format!("Failed to parse TOML from config file at {path:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.datadog_api_host, "https://api.datadoghq.com");
        assert_eq!(config.data_dir, ".");
        assert_eq!(config.listen_addr, "0.0.0.0:8000");
        assert_eq!(config.provider_timeout_seconds, 10);
        assert_eq!(config.incident_window_days, 30);
        assert!(config.datadog_api_key.is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let file = PartialServerConfig {
            datadog_api_host: Some("https://api.datadoghq.eu".to_string()),
            data_dir: Some("/srv/status".to_string()),
            ..Default::default()
        };
        let env = PartialServerConfig {
            data_dir: Some("/tmp/status".to_string()),
            datadog_api_key: Some("key".to_string()),
            ..Default::default()
        };

        let config = ServerConfig::merge(env, file);
        assert_eq!(config.datadog_api_host, "https://api.datadoghq.eu");
        assert_eq!(config.data_dir, "/tmp/status");
        assert_eq!(config.datadog_api_key.as_deref(), Some("key"));
    }

    #[test]
    fn test_read_file_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "listen_addr = \"127.0.0.1:9000\"\nprovider_timeout_seconds = 3\n",
        )
        .unwrap();

        let layer = read_file_layer(&path).unwrap();
        assert_eq!(layer.listen_addr.as_deref(), Some("127.0.0.1:9000"));
        assert_eq!(layer.provider_timeout_seconds, Some(3));
    }

    #[test]
    fn test_missing_file_is_empty_layer() {
        let layer = read_file_layer(Path::new("/nonexistent/status-backend.toml")).unwrap();
        assert!(layer.listen_addr.is_none());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = ServerConfig {
            provider_timeout_seconds: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_incident_window_bounds() {
        for days in [-1, MAX_INCIDENT_WINDOW_DAYS + 1, i64::MAX] {
            let config = ServerConfig {
                incident_window_days: days,
                ..ServerConfig::default()
            };
            assert!(config.validate().is_err(), "{days} days should be rejected");
        }
        for days in [0, 30, MAX_INCIDENT_WINDOW_DAYS] {
            let config = ServerConfig {
                incident_window_days: days,
                ..ServerConfig::default()
            };
            assert!(config.validate().is_ok(), "{days} days should be accepted");
        }
    }
}
