use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The path to the object store credentials file is empty.
    #[error("`store_config_path` must be set")]
    MissingStoreConfigPath,
    /// A node selector expression is not of the form `key=value`.
    #[error("invalid node selector `{0}`: expected `key=value`")]
    InvalidNodeSelector(String),
    /// The key expression is empty.
    #[error("`log_key` cannot be empty")]
    EmptyLogKey,
    /// The retry delay is zero.
    #[error("`retry_delay_ms` cannot be zero")]
    RetryDelayZero,
}
