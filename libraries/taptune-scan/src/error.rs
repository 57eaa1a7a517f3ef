/// Scan pipeline errors
use thiserror::Error;

/// Result type alias using `ScanError`
pub type Result<T> = std::result::Result<T, ScanError>;

/// Scan pipeline error types
#[derive(Error, Debug)]
pub enum ScanError {
    /// The scan service task is no longer running
    #[error("scan service is not running")]
    ServiceStopped,

    /// Errors bubbling up from the core traits
    #[error(transparent)]
    Core(#[from] taptune_core::TapError),
}

impl From<ScanError> for taptune_core::TapError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::Core(inner) => inner,
            other => taptune_core::TapError::Other(other.to_string()),
        }
    }
}
