//! The injected listing source.

use crate::criteria::SearchCriteria;
use thiserror::Error;

/// Failure reported by a listing source.
///
/// The pipeline logs these and treats the level as having found nothing.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport failure reaching the listing backend
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with something that could not be decoded
    #[error("Malformed response: {0}")]
    RemoteFormat(String),

    #[error("{0}")]
    Other(String),
}

/// Error code for integration with nestfind-core error handling.
/// Range: 5xxx listing source errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorCode {
    Network = 5001,
    RemoteFormat = 5002,
    Other = 5099,
}

impl SourceError {
    /// Returns the error code for this error.
    pub fn code(&self) -> SourceErrorCode {
        match self {
            SourceError::Network(_) => SourceErrorCode::Network,
            SourceError::RemoteFormat(_) => SourceErrorCode::RemoteFormat,
            SourceError::Other(_) => SourceErrorCode::Other,
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::RemoteFormat(err.to_string())
    }
}

/// Synchronous search over candidate records of type `R`.
///
/// Implemented for any `Fn(&SearchCriteria) -> Result<Vec<R>, SourceError>`,
/// so closures can be passed directly. Sharing an engine across threads
/// requires the source to be `Sync`.
pub trait ListingSource<R> {
    fn search(&self, criteria: &SearchCriteria) -> Result<Vec<R>, SourceError>;
}

impl<R, F> ListingSource<R> for F
where
    F: Fn(&SearchCriteria) -> Result<Vec<R>, SourceError>,
{
    fn search(&self, criteria: &SearchCriteria) -> Result<Vec<R>, SourceError> {
        self(criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_a_source() {
        let source = |criteria: &SearchCriteria| -> Result<Vec<usize>, SourceError> {
            Ok(vec![criteria.len()])
        };
        let found = source.search(&SearchCriteria::new().with_location("Toronto")).unwrap();
        assert_eq!(found, vec![1]);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(SourceError::Network("timeout".into()).code(), SourceErrorCode::Network);
        let err: SourceError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(err.code(), SourceErrorCode::RemoteFormat);
        assert_eq!(err.code() as u32, 5002);
    }
}
