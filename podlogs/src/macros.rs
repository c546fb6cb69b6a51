//! Shorthands for building [`crate::error::PodLogsError`] values.

/// Creates a [`crate::error::PodLogsError`] from a kind, a static description and an
/// optional detail that is converted with `to_string`.
#[macro_export]
macro_rules! podlogs_error {
    ($kind:expr, $desc:expr) => {
        $crate::error::PodLogsError::from(($kind, $desc))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        $crate::error::PodLogsError::from(($kind, $desc, $detail.to_string()))
    };
}

/// Returns early with a [`crate::error::PodLogsError`].
#[macro_export]
macro_rules! bail {
    ($kind:expr, $desc:expr) => {
        return Err($crate::podlogs_error!($kind, $desc))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        return Err($crate::podlogs_error!($kind, $desc, $detail))
    };
}
