// Error types for the tido application.
// Covers input validation, missing records, schema mapping, and backend failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TidoError {
    /// Bad caller input, rejected before any write reaches the store.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The referenced todo id does not exist in the backing store.
    #[error("no todo with id {0}")]
    NotFound(String),

    /// A fetched record could not be mapped to a TodoItem.
    /// Handled per-record during list; callers only see the aggregate count.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Network, HTTP, or auth failure talking to the backing store.
    /// Retryable from the caller's perspective.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for TidoError {
    fn from(err: reqwest::Error) -> Self {
        TidoError::StoreUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TidoError>;
