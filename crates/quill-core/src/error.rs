//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
///
/// None of these is fatal; every variant is recovered at the request
/// boundary and turned into a response.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type}")]
    NotFound { entity_type: &'static str },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden")]
    Forbidden,

    /// Reset-flow failure. Expired and tampered tokens are deliberately
    /// indistinguishable from the caller's point of view.
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
