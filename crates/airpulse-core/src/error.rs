//! Domain-level error types.

use thiserror::Error;

/// Errors raised while fetching from the upstream air-quality API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API answered with an application-level error body. Never retried.
    #[error("API error: {0}")]
    Api(String),

    /// Every attempt came back throttled or redirected.
    #[error("Exhausted retries for {city} after {attempts} attempts")]
    RetriesExhausted { city: String, attempts: u32 },

    /// Transport-level failure: connect, timeout, or body decode.
    #[error("HTTP error: {0}")]
    Http(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Record not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Event bus failures. Only ever observed inside the notifier, which
/// suppresses them.
#[derive(Debug, Error)]
pub enum EventBusError {
    #[error("Failed to publish: {0}")]
    Publish(String),
}

/// Real-time broadcast failures. Same suppression contract as
/// [`EventBusError`].
#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("Failed to emit: {0}")]
    Emit(String),
}

/// The surface of a single-city collection attempt.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}
