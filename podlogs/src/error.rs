use std::error;
use std::fmt;

/// Result type used throughout the crate.
pub type PodLogsResult<T> = Result<T, PodLogsError>;

/// Error raised while archiving or serving pod logs.
///
/// Every error carries an [`ErrorKind`] for programmatic handling, a static description
/// and, optionally, a detail string taken from the underlying failure. Use the
/// [`crate::podlogs_error`] and [`crate::bail`] macros to build them.
#[derive(Debug, Clone)]
pub struct PodLogsError {
    repr: ErrorRepr,
}

#[derive(Debug, Clone)]
enum ErrorRepr {
    WithDescription(ErrorKind, &'static str),
    WithDescriptionAndDetail(ErrorKind, &'static str, String),
}

/// Categories of failures.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    // Orchestration API errors
    PodFetchFailed,
    LogFetchFailed,
    PodDeleteFailed,

    // Content store errors
    StoreConnectionFailed,
    StoreReadFailed,
    StoreWriteFailed,
    StoreObjectNotFound,
    StoreTimeout,

    // Key derivation errors
    KeyExpressionInvalid,
    KeyDerivationFailed,

    // Encoding, configuration and io errors
    SerializationError,
    ConfigError,
    IoError,

    Unknown,
}

impl PodLogsError {
    pub fn kind(&self) -> ErrorKind {
        match self.repr {
            ErrorRepr::WithDescription(kind, _)
            | ErrorRepr::WithDescriptionAndDetail(kind, _, _) => kind,
        }
    }

    pub fn description(&self) -> &'static str {
        match self.repr {
            ErrorRepr::WithDescription(_, desc)
            | ErrorRepr::WithDescriptionAndDetail(_, desc, _) => desc,
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self.repr {
            ErrorRepr::WithDescriptionAndDetail(_, _, ref detail) => Some(detail.as_str()),
            ErrorRepr::WithDescription(..) => None,
        }
    }
}

/// Errors compare by kind only, details are free-form.
impl PartialEq for PodLogsError {
    fn eq(&self, other: &PodLogsError) -> bool {
        self.kind() == other.kind()
    }
}

impl fmt::Display for PodLogsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        fmt::Debug::fmt(&self.kind(), f)?;
        f.write_str(": ")?;
        f.write_str(self.description())?;
        if let Some(detail) = self.detail() {
            f.write_str(" -> ")?;
            f.write_str(detail)?;
        }

        Ok(())
    }
}

impl error::Error for PodLogsError {}

impl From<(ErrorKind, &'static str)> for PodLogsError {
    fn from((kind, desc): (ErrorKind, &'static str)) -> PodLogsError {
        PodLogsError {
            repr: ErrorRepr::WithDescription(kind, desc),
        }
    }
}

impl From<(ErrorKind, &'static str, String)> for PodLogsError {
    fn from((kind, desc, detail): (ErrorKind, &'static str, String)) -> PodLogsError {
        PodLogsError {
            repr: ErrorRepr::WithDescriptionAndDetail(kind, desc, detail),
        }
    }
}

impl From<std::io::Error> for PodLogsError {
    fn from(err: std::io::Error) -> PodLogsError {
        (ErrorKind::IoError, "I/O error occurred", err.to_string()).into()
    }
}

impl From<serde_json::Error> for PodLogsError {
    fn from(err: serde_json::Error) -> PodLogsError {
        (
            ErrorKind::SerializationError,
            "JSON conversion failed",
            err.to_string(),
        )
            .into()
    }
}

impl From<serde_yaml::Error> for PodLogsError {
    fn from(err: serde_yaml::Error) -> PodLogsError {
        (
            ErrorKind::SerializationError,
            "YAML encoding failed",
            err.to_string(),
        )
            .into()
    }
}

impl From<podlogs_config::shared::ValidationError> for PodLogsError {
    fn from(err: podlogs_config::shared::ValidationError) -> PodLogsError {
        (
            ErrorKind::ConfigError,
            "invalid configuration",
            err.to_string(),
        )
            .into()
    }
}

impl From<tokio::time::error::Elapsed> for PodLogsError {
    fn from(err: tokio::time::error::Elapsed) -> PodLogsError {
        (
            ErrorKind::StoreTimeout,
            "object store call timed out",
            err.to_string(),
        )
            .into()
    }
}
