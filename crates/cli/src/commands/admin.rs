//! Admin console setup commands.
//!
//! # Usage
//!
//! ```bash
//! # Prompt-free: read the password from stdin
//! printf '%s' "$PASSWORD" | crocs-cli admin hash-password
//!
//! # Or pass it directly (ends up in shell history)
//! crocs-cli admin hash-password --password 'correct horse'
//! ```
//!
//! Put the printed hash in `ADMIN_PASSWORD_HASH`.

use std::io::Read;

use thiserror::Error;

use crocs_rwanda_storefront::services::auth::{self, AuthError};

/// Shortest admin password accepted.
const MIN_PASSWORD_LEN: usize = 8;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Cannot read password from stdin: {0}")]
    Stdin(#[from] std::io::Error),

    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,

    #[error("Hashing failed: {0}")]
    Hash(#[from] AuthError),
}

/// Strip the trailing newline a pipe or heredoc adds.
fn clean_password(raw: &str) -> Result<&str, AdminError> {
    let password = raw.trim_end_matches(['\r', '\n']);
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AdminError::PasswordTooShort);
    }
    Ok(password)
}

/// Print an Argon2 PHC hash of the admin password.
///
/// # Errors
///
/// Returns `AdminError` if stdin cannot be read, the password is too short,
/// or hashing fails.
pub fn hash_password(password: Option<String>) -> Result<(), AdminError> {
    let raw = match password {
        Some(password) => password,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let hash = auth::hash_password(clean_password(&raw)?)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{hash}");
    }
    tracing::info!("Set ADMIN_PASSWORD_HASH to the printed value");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_password() {
        assert_eq!(clean_password("hunter2hunter2\n").unwrap(), "hunter2hunter2");
        assert_eq!(clean_password("  spaced out  \r\n").unwrap(), "  spaced out  ");
        assert!(matches!(
            clean_password("short\n"),
            Err(AdminError::PasswordTooShort)
        ));
    }

    #[test]
    fn test_hash_verifies() {
        let password = clean_password("letmein-please\n").unwrap();
        let hash = auth::hash_password(password).unwrap();
        assert!(auth::verify_password("letmein-please", &hash).is_ok());
    }
}
