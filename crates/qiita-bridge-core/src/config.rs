//! Configuration types for Qiita Bridge.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Bridge configuration loaded from YAML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// Server settings
    pub server: ServerSettings,
    /// Monitoring settings
    pub monitoring: MonitoringSettings,
}

impl BridgeConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let config: BridgeConfig = serde_yaml::from_str(yaml)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> crate::Result<()> {
        // Validate server URL
        let url = url::Url::parse(&self.server.url).map_err(|e| crate::Error::InvalidServerUrl {
            url: self.server.url.clone(),
            reason: e.to_string(),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(crate::Error::InvalidServerUrl {
                url: self.server.url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        // Validate log level
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.server.log_level.as_str()) {
            return Err(crate::Error::Config(format!(
                "server.log_level must be one of: {}",
                LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}

/// Server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Base address of the control-plane server
    pub url: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Monitoring settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringSettings {
    /// Start monitoring automatically after activation
    pub auto_start: bool,
}

impl Default for MonitoringSettings {
    fn default() -> Self {
        Self { auto_start: true }
    }
}
