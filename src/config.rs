//! Configuration System
//!
//! Server settings loaded from an optional TOML file, with defaults matching
//! the stock deployment. Command-line flags override loaded values.

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Root server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind both listeners to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the context-tree API
    #[serde(default = "default_port")]
    pub port: u16,

    /// Port for the AMF direct-connect API
    #[serde(default = "default_amf_port")]
    pub amf_port: u16,

    /// Seconds to wait for a command action before answering with an error
    #[serde(default = "default_exec_timeout_secs")]
    pub exec_timeout_secs: u64,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_amf_port() -> u16 {
    6000
}

fn default_exec_timeout_secs() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            amf_port: default_amf_port(),
            exec_timeout_secs: default_exec_timeout_secs(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file. Missing keys fall back to
    /// defaults; a missing file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn exec_timeout(&self) -> Duration {
        Duration::from_secs(self.exec_timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn amf_bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.amf_port)
    }
}
