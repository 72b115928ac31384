//! Error types for generation calls.

use thiserror::Error;

/// Errors a generation capability can raise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The capability is temporarily unavailable.
    #[error("generator unavailable: {0}")]
    Unavailable(String),

    /// The remote call failed (connection, timeout reported by the service, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The image or prompt was rejected.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The call was cancelled before it completed.
    #[error("generation cancelled")]
    Cancelled,

    /// Any other failure, with an optional description.
    #[error("generation failed")]
    Other(Option<String>),
}

impl GenerationError {
    /// The human-readable failure description carried by this error.
    ///
    /// This is the bare message reported by the capability, without the
    /// variant prefix used by `Display`. Errors that carry no description
    /// yield an empty string.
    pub fn message(&self) -> String {
        match self {
            GenerationError::Unavailable(msg)
            | GenerationError::Network(msg)
            | GenerationError::InvalidInput(msg) => msg.clone(),
            GenerationError::Cancelled => "request cancelled".to_string(),
            GenerationError::Other(msg) => msg.clone().unwrap_or_default(),
        }
    }
}
