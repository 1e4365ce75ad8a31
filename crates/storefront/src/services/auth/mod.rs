//! Admin authentication.
//!
//! The admin console has a single shared password. Its Argon2 hash comes from
//! configuration; a successful login stores a [`CurrentAdmin`] in the session
//! and rotates the session id.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tower_sessions::Session;

use crate::models::{CurrentAdmin, session_keys};

/// Check a login attempt and open an admin session.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password does not match,
/// or `AuthError::Session` if the session cannot be updated.
pub async fn login(
    session: &Session,
    password_hash: &SecretString,
    password: &str,
) -> Result<CurrentAdmin, AuthError> {
    verify_password(password, password_hash.expose_secret())?;

    // Fresh id so a pre-login cookie cannot ride into the admin session
    session.cycle_id().await?;

    let admin = CurrentAdmin {
        logged_in_at: Utc::now(),
    };
    session.insert(session_keys::CURRENT_ADMIN, &admin).await?;
    Ok(admin)
}

/// End the admin session.
///
/// # Errors
///
/// Returns `AuthError::Session` if the session store fails.
pub async fn logout(session: &Session) -> Result<(), AuthError> {
    session.flush().await?;
    Ok(())
}

/// Read the logged-in admin, if any.
pub async fn current_admin(session: &Session) -> Option<CurrentAdmin> {
    session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
        .ok()
        .flatten()
}

/// Hash a password with Argon2id and a random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a PHC hash string.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch or a malformed hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("clogs-and-jibbitz").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("clogs-and-jibbitz", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
