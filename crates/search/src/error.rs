//! Error types for the search crate.

use thiserror::Error;

/// Result type alias for matcher construction.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors raised while building matcher tables.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A tolerance that is negative or not finite
    #[error("Invalid tolerance for {field}: {value}")]
    InvalidTolerance { field: String, value: f64 },

    /// Fuzzy threshold outside (0, 1]
    #[error("Invalid fuzzy threshold: {0}")]
    InvalidThreshold(f64),

    /// Malformed synonym table
    #[error("Invalid synonym table: {0}")]
    InvalidSynonyms(String),
}

/// Error code for integration with nestfind-core error handling.
/// Range: 3xxx configuration errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorCode {
    /// Invalid tolerance value
    InvalidTolerance = 3101,
    /// Invalid fuzzy threshold
    InvalidThreshold = 3102,
    /// Malformed synonym table
    InvalidSynonyms = 3103,
}

impl SearchError {
    /// Returns the error code for this error.
    pub fn code(&self) -> SearchErrorCode {
        match self {
            SearchError::InvalidTolerance { .. } => SearchErrorCode::InvalidTolerance,
            SearchError::InvalidThreshold(_) => SearchErrorCode::InvalidThreshold,
            SearchError::InvalidSynonyms(_) => SearchErrorCode::InvalidSynonyms,
        }
    }
}
