use std::path::Path;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

const DEFAULT_REGION: &str = "us-east-1";

/// Credentials and location of the object store bucket holding archived logs.
///
/// Read from its own YAML file, separate from the service configuration, so it can
/// be mounted from a secret:
///
/// ```yaml
/// endpoint: s3.example.com
/// bucket: pod-logs
/// access_key: AKIA...
/// secret_key: ...
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectStoreConfig {
    /// Host (and optional port) of the S3 compatible endpoint. May include a scheme.
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub secret_key: SecretString,
    #[serde(default = "default_region")]
    pub region: String,
    /// Whether `https` is used when `endpoint` carries no scheme.
    #[serde(default = "default_secure")]
    pub secure: bool,
}

impl ObjectStoreConfig {
    /// Reads the credentials file at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::new(
                &path.as_ref().to_string_lossy(),
                config::FileFormat::Yaml,
            ))
            .build()?;

        settings.try_deserialize()
    }

    /// Returns the endpoint as a URL, adding a scheme when it has none.
    pub fn endpoint_url(&self) -> String {
        if self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://") {
            return self.endpoint.clone();
        }

        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{}", self.endpoint)
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_secure() -> bool {
    true
}
