//! Error types for the analyzer sessions and services.

use analyzer_database::DatabaseError;
use thiserror::Error;

/// Failures surfaced by the history repository.
///
/// Each variant wraps the underlying storage fault and keeps its message.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The live history query failed.
    #[error("Failed to load history: {0}")]
    Load(#[source] DatabaseError),

    /// Storing a new record failed.
    #[error("Failed to insert history: {0}")]
    Insert(#[source] DatabaseError),

    /// Deleting a record failed.
    #[error("Failed to delete history: {0}")]
    Delete(#[source] DatabaseError),
}

/// Errors that can occur during sign-up, login, or profile access.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Form input was rejected before contacting the identity provider.
    #[error("{0}")]
    Validation(String),

    /// The identity provider rejected the request.
    #[error("{0}")]
    Auth(String),

    /// Local profile storage failed.
    #[error("profile storage error: {0}")]
    Database(#[from] DatabaseError),
}
