use std::collections::BTreeMap;

use serde::Deserialize;

use crate::Config;
use crate::shared::{SentryConfig, ValidationError};

/// Key expression used when none is configured: `<namespace>/<name>`.
pub const DEFAULT_LOG_KEY: &str = r#"namespace + "/" + name"#;

/// Delay before a failed reconciliation is retried.
const DEFAULT_RETRY_DELAY_MS: u64 = 5_000;

/// Configuration of the pod log archiving controller.
#[derive(Debug, Clone, Deserialize)]
pub struct ControllerConfig {
    /// Namespace to watch. All namespaces are watched when unset.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Path to the object store credentials file.
    pub store_config_path: String,
    /// Node selector filter as `key=value` expressions. Pods must carry every pair.
    #[serde(default)]
    pub node_selector: Vec<String>,
    /// Expression deriving the storage key prefix from a pod.
    #[serde(default = "default_log_key")]
    pub log_key: String,
    /// Whether pods are deleted once their logs are archived.
    #[serde(default)]
    pub delete: bool,
    /// Milliseconds to wait before retrying a failed reconciliation.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Optional Sentry configuration.
    #[serde(default)]
    pub sentry: Option<SentryConfig>,
}

impl Config for ControllerConfig {
    const LIST_PARSE_KEYS: &'static [&'static str] = &["node_selector"];
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.store_config_path.trim().is_empty() {
            return Err(ValidationError::MissingStoreConfigPath);
        }

        if self.log_key.trim().is_empty() {
            return Err(ValidationError::EmptyLogKey);
        }

        if self.retry_delay_ms == 0 {
            return Err(ValidationError::RetryDelayZero);
        }

        self.node_selector_map()?;

        Ok(())
    }

    /// Parses [`ControllerConfig::node_selector`] into a label map.
    ///
    /// Each expression is split on its first `=`, so values may themselves contain `=`.
    /// Later expressions win when a key is repeated.
    pub fn node_selector_map(&self) -> Result<BTreeMap<String, String>, ValidationError> {
        let mut selector = BTreeMap::new();
        for expression in &self.node_selector {
            let Some((key, value)) = expression.split_once('=') else {
                return Err(ValidationError::InvalidNodeSelector(expression.clone()));
            };
            if key.is_empty() {
                return Err(ValidationError::InvalidNodeSelector(expression.clone()));
            }
            selector.insert(key.to_string(), value.to_string());
        }

        Ok(selector)
    }
}

fn default_log_key() -> String {
    DEFAULT_LOG_KEY.to_string()
}

fn default_retry_delay_ms() -> u64 {
    DEFAULT_RETRY_DELAY_MS
}
