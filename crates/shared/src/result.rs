//! Result helpers for shared error handling.

use crate::errors::ErrorEnvelope;

/// Shared result type used across the workspace.
pub type Result<T, E = ErrorEnvelope> = std::result::Result<T, E>;

/// Conversions from typed domain errors into the shared envelope.
pub trait ResultExt<T> {
    /// Convert the error into an `ErrorEnvelope`.
    fn into_envelope(self) -> Result<T>;

    /// Convert the error into an `ErrorEnvelope` and attach one metadata entry.
    fn with_error_metadata(self, key: &str, value: &str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ErrorEnvelope>,
{
    fn into_envelope(self) -> Result<T> {
        self.map_err(Into::into)
    }

    fn with_error_metadata(self, key: &str, value: &str) -> Result<T> {
        self.map_err(|error| error.into().with_metadata(key, value))
    }
}
