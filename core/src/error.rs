use crate::types::AppConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] AppConfigError),
}

/// Failure reported by a search backend.
///
/// The search clients turn every variant into an absent result set, so these
/// never reach the UI sink as errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The index does not exist or was never built.
    #[error("index not available: {0}")]
    Unavailable(String),

    /// The index exists but cannot be read.
    #[error("index is corrupt: {0}")]
    Corrupt(String),

    /// The backend rejected the query itself.
    #[error("invalid query: {0}")]
    Query(String),
}

impl BackendError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, BackendError::Unavailable(_))
    }
}
