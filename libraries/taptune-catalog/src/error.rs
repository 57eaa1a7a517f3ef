/// Catalog-specific errors
use thiserror::Error;

/// Result type alias using `CatalogError`
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Catalog error types
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog file could not be parsed
    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// I/O error while reading a catalog file
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<CatalogError> for taptune_core::TapError {
    fn from(err: CatalogError) -> Self {
        taptune_core::TapError::catalog(err.to_string())
    }
}
