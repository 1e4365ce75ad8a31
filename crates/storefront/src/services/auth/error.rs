//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong password, or the configured hash could not be parsed.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Session store could not be read or written.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}
