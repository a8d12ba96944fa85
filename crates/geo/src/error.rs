//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors raised while building the geographic hierarchy.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Blank place name or empty metro list
    #[error("Invalid hierarchy entry: {0}")]
    InvalidEntry(String),

    /// Two entries that fold to the same lookup key
    #[error("Duplicate hierarchy entry: {0}")]
    DuplicateEntry(String),
}

/// Error code for integration with nestfind-core error handling.
/// Range: 3xxx configuration errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Blank place name or empty metro list
    InvalidEntry = 3201,
    /// Duplicate lookup key
    DuplicateEntry = 3202,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidEntry(_) => GeoErrorCode::InvalidEntry,
            GeoError::DuplicateEntry(_) => GeoErrorCode::DuplicateEntry,
        }
    }
}
