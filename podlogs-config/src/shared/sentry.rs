use serde::Deserialize;

/// Sentry error reporting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SentryConfig {
    /// DSN of the Sentry project errors are reported to.
    pub dsn: String,
}
