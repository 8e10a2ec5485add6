//! Engine configuration loading and validation

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Connection broker settings
    #[serde(default)]
    pub broker: BrokerConfig,
    /// Capability discovery settings
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// Well-known provider settings
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// Connection broker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Base URL of the OAuth connection broker
    pub base_url: String,
    /// Secret key for broker authentication. Usually left empty in the
    /// file and supplied via the BROKER_SECRET_KEY environment variable.
    #[serde(default)]
    pub secret_key: String,
    /// Default timeout for proxied calls, in seconds
    #[serde(default = "default_broker_timeout")]
    pub timeout_secs: u64,
}

/// Capability discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Conventional schema discovery paths, tried in order
    #[serde(default = "default_schema_paths")]
    pub schema_paths: Vec<String>,
    /// Timeout for each schema fetch, in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    /// Timeout for each endpoint probe, in seconds
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
}

/// Well-known provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Provider keys checked by the connected-services listing
    #[serde(default = "default_known_providers")]
    pub known: Vec<String>,
}

fn default_broker_timeout() -> u64 {
    30
}

fn default_fetch_timeout() -> u64 {
    5
}

fn default_probe_timeout() -> u64 {
    3
}

fn default_schema_paths() -> Vec<String> {
    vec![
        "/api/v1/openapi.json".to_string(),
        "/api/v2/swagger.json".to_string(),
        "/.well-known/api-endpoints".to_string(),
        "/api/capabilities".to_string(),
        "/api/schema".to_string(),
    ]
}

fn default_known_providers() -> Vec<String> {
    vec![
        "slack".to_string(),
        "linkedin".to_string(),
        "github".to_string(),
        "google-calendar".to_string(),
        "notion".to_string(),
    ]
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3003".to_string(),
            secret_key: String::new(),
            timeout_secs: default_broker_timeout(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            schema_paths: default_schema_paths(),
            fetch_timeout_secs: default_fetch_timeout(),
            probe_timeout_secs: default_probe_timeout(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            known: default_known_providers(),
        }
    }
}

impl Config {
    /// Load .env files so secrets can live outside the YAML file
    fn load_env_files() {
        for env_file in [".env", ".env.local"] {
            match dotenvy::from_filename(env_file) {
                Ok(_) => {
                    tracing::info!("Loaded environment variables from {}", env_file);
                }
                Err(e) if e.to_string().contains("not found") => {
                    tracing::debug!("No {} file found, skipping", env_file);
                }
                Err(e) => {
                    tracing::warn!("Failed to load {}: {}", env_file, e);
                }
            }
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_env_files();

        let mut config = if path.as_ref().exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| EngineError::config(format!("Failed to read config file: {}", e)))?;

            serde_yaml::from_str(&content)
                .map_err(|e| EngineError::config(format!("Failed to parse config file: {}", e)))?
        } else {
            tracing::warn!("Config file not found, using defaults");
            Self::default()
        };

        config.apply_environment_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides (precedence: file < env)
    pub fn apply_environment_overrides(&mut self) {
        if let Ok(url) = std::env::var("BROKER_BASE_URL") {
            if !url.is_empty() {
                self.broker.base_url = url;
            }
        }

        if let Ok(key) = std::env::var("BROKER_SECRET_KEY") {
            if !key.is_empty() {
                self.broker.secret_key = key;
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.broker.base_url.trim().is_empty() {
            return Err(EngineError::config("Broker base URL cannot be empty"));
        }

        url::Url::parse(&self.broker.base_url)
            .map_err(|e| EngineError::config(format!("Invalid broker base URL: {}", e)))?;

        if self.discovery.schema_paths.is_empty() {
            return Err(EngineError::config(
                "At least one schema discovery path is required",
            ));
        }

        if self.discovery.probe_timeout_secs == 0 {
            return Err(EngineError::config("Probe timeout must be non-zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.discovery.probe_timeout_secs, 3);
        assert_eq!(config.discovery.schema_paths.len(), 5);
        assert!(config.providers.known.contains(&"slack".to_string()));
    }

    #[test]
    fn test_invalid_broker_url_rejected() {
        let mut config = Config::default();
        config.broker.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.broker.base_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let yaml = r#"
broker:
  base_url: "https://broker.internal:8443"
  timeout_secs: 10
discovery:
  probe_timeout_secs: 2
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.broker.base_url, "https://broker.internal:8443");
        assert_eq!(config.broker.timeout_secs, 10);
        assert_eq!(config.discovery.probe_timeout_secs, 2);
        // Unspecified sections fall back to defaults
        assert_eq!(config.discovery.schema_paths.len(), 5);
        assert!(config.validate().is_ok());
    }
}
