use std::fmt;

use serde::Deserialize;

use crate::Config;
use crate::shared::{SentryConfig, ValidationError};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Configuration of the archived log retrieval server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub application: ApplicationSettings,
    /// Path to the object store credentials file.
    pub store_config_path: String,
    #[serde(default)]
    pub sentry: Option<SentryConfig>,
}

impl Config for ServerConfig {
    const LIST_PARSE_KEYS: &'static [&'static str] = &[];
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.store_config_path.trim().is_empty() {
            return Err(ValidationError::MissingStoreConfigPath);
        }

        Ok(())
    }
}

/// Address the HTTP server listens on.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl fmt::Display for ApplicationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
