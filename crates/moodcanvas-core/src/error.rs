//! Error types for moodcanvas.

use std::time::Duration;

use thiserror::Error;

/// Result type alias using moodcanvas's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for moodcanvas operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The corpus has no entries, so there is nothing to resolve to.
    #[error("Content corpus is empty")]
    EmptyCorpus,

    /// The content store failed to supply entries.
    #[error("Content store error: {0}")]
    ContentStore(String),

    /// History persistence failed (save, load, or delete).
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Fuzzy matching could not run over the given input.
    #[error("Match error: {0}")]
    Match(String),

    /// An I/O collaborator did not answer in time.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the calling flow can continue after this error.
    ///
    /// `EmptyCorpus` is fatal for the current call; persistence failures,
    /// timeouts and match failures leave a usable fallback.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Persistence(_) | Error::Timeout(_) | Error::Match(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
