//! Authentication ports - password hashing and token services.

use uuid::Uuid;

/// Claims carried by a session token.
///
/// Only an opaque reference to the user id travels with the client;
/// admin status and profile data are re-fetched per request so they are
/// never stale.
#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub user_id: Uuid,
    pub exp: i64,
}

/// Session token service - signed bearer tokens for logged-in users.
pub trait SessionTokenService: Send + Sync {
    /// Issue a session token for a user.
    fn issue(&self, user_id: Uuid) -> Result<String, AuthError>;

    /// Validate and decode a session token.
    fn validate(&self, token: &str) -> Result<SessionClaims, AuthError>;

    /// Lifetime of newly issued tokens, for the client's benefit.
    fn expiration_seconds(&self) -> i64;
}

/// Password-reset token service.
///
/// Tokens are self-contained signed capabilities; there is no server-side
/// token table and verification failure is a normal outcome, not an error.
pub trait ResetTokenService: Send + Sync {
    /// Issue a time-limited reset token bound to one user.
    fn issue(&self, user_id: Uuid) -> Result<String, AuthError>;

    /// Returns the user id only for a well-formed, untampered, unexpired
    /// token. Every failure mode collapses to `None`.
    fn verify(&self, token: &str) -> Option<Uuid>;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
