//! Error types for clubcal.

use thiserror::Error;

/// Errors that can occur while resolving, fetching or laying out events.
///
/// `ResolutionFailed` and `FetchFailed` are structural: they always reach the
/// caller so that "could not determine" is never confused with "no events".
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Could not resolve entity hierarchy: {0}")]
    ResolutionFailed(String),

    #[error("Event fetch failed: {0}")]
    FetchFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data file error: {0}")]
    DataFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CalendarError {
    /// Whether this error came from the hierarchy or fetch collaborators.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            CalendarError::ResolutionFailed(_) | CalendarError::FetchFailed(_)
        )
    }
}

/// Result type alias for clubcal operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
