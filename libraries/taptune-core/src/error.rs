/// Core error types for TapTune
use thiserror::Error;

/// Result type alias using `TapError`
pub type Result<T> = std::result::Result<T, TapError>;

/// Core error type for TapTune
///
/// Nothing in this taxonomy is fatal to the scan pipeline. Callers log the
/// error, surface it where a user-facing surface exists, and keep processing
/// subsequent tag reads.
#[derive(Error, Debug)]
pub enum TapError {
    /// Tag payload could not be decoded into usable text
    #[error("Tag decode failed: {0}")]
    Decode(String),

    /// Decoded tag text matched neither the catalog nor any classifier rule
    #[error("Unresolved tag content: {0}")]
    UnresolvedTag(String),

    /// The platform has no tag-reading capability
    #[error("Tag reading not supported on this device")]
    Unsupported,

    /// The user declined the tag-reading permission
    #[error("Tag reading permission denied")]
    PermissionDenied,

    /// Persisted state could not be read back
    #[error("Persisted state corrupt: {0}")]
    Persistence(String),

    /// Catalog lookup failures (backing store errors, not missing entries)
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Playback sink failures
    #[error("Playback error: {0}")]
    Playback(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl TapError {
    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an unresolved tag error
    pub fn unresolved(text: impl Into<String>) -> Self {
        Self::UnresolvedTag(text.into())
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a playback error
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
