//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `ADMIN_PASSWORD_HASH` - Argon2 PHC string for the admin console password
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` / `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL, decides secure cookies (default: <http://localhost:3000>)
//! - `STOREFRONT_STATIC_DIR` - Directory of frontend files (default: public)
//! - `STOREFRONT_TRUST_PROXY` - Read client addresses from proxy headers (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (default: development)
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0 to 1.0 (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use argon2::PasswordHash;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Argon2 hash of the admin password
    pub admin_password_hash: SecretString,
    /// Directory served for non-API paths
    pub static_dir: PathBuf,
    /// Take the client address from `CF-Connecting-IP`/`X-Forwarded-For`
    /// style headers. Only safe behind a proxy that overwrites them.
    pub trust_proxy_headers: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: String,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("database_url", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("admin_password_hash", &"[REDACTED]")
            .field("static_dir", &self.static_dir)
            .field("trust_proxy_headers", &self.trust_proxy_headers)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[SET]"))
            .field("sentry_environment", &self.sentry_environment)
            .finish_non_exhaustive()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFRONT_DATABASE_URL")?;
        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_port()?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        let admin_password_hash = get_password_hash("ADMIN_PASSWORD_HASH")?;
        let static_dir = PathBuf::from(get_env_or_default("STOREFRONT_STATIC_DIR", "public"));
        let trust_proxy_headers = get_flag("STOREFRONT_TRUST_PROXY")?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            admin_password_hash,
            static_dir,
            trust_proxy_headers,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_env_or_default("SENTRY_ENVIRONMENT", "development"),
            sentry_sample_rate: get_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: get_rate("SENTRY_TRACES_SAMPLE_RATE", 0.1)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies must carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// `PORT` wins over `STOREFRONT_PORT` so platform-assigned ports are honoured.
fn get_port() -> Result<u16, ConfigError> {
    let (key, value) = match std::env::var("PORT") {
        Ok(value) => ("PORT", value),
        Err(_) => (
            "STOREFRONT_PORT",
            get_env_or_default("STOREFRONT_PORT", "3000"),
        ),
    };
    parse_port(key, &value)
}

fn parse_port(key: &str, value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn get_flag(key: &str) -> Result<bool, ConfigError> {
    get_optional_env(key).map_or(Ok(false), |value| parse_flag(key, &value))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected true or false (got {other})"),
        )),
    }
}

fn get_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |value| parse_rate(key, &value))
}

fn parse_rate(key: &str, value: &str) -> Result<f32, ConfigError> {
    let rate = value
        .trim()
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

/// Load an Argon2 PHC string and check that it parses.
fn get_password_hash(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    let secret = SecretString::from(value.trim().to_owned());
    validate_password_hash(&secret, key)?;
    Ok(secret)
}

fn validate_password_hash(hash: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    PasswordHash::new(hash.expose_secret()).map_err(|e| {
        ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("not a valid Argon2 PHC string ({e}); generate one with `crocs-cli admin hash-password`"),
        )
    })?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Config suitable for router tests.
    pub(crate) fn test_config(admin_password_hash: &str) -> StorefrontConfig {
        StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/crocs_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            admin_password_hash: SecretString::from(admin_password_hash.to_owned()),
            static_dir: PathBuf::from("public"),
            trust_proxy_headers: false,
            sentry_dsn: None,
            sentry_environment: "test".to_string(),
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config("unused");
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure() {
        let mut config = test_config("unused");
        assert!(!config.is_secure());
        config.base_url = "https://crocs.rw".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("PORT", " 8080 ").unwrap(), 8080);
        assert!(matches!(
            parse_port("PORT", "eighty"),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "PORT"
        ));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("F", " TRUE ").unwrap());
        assert!(parse_flag("F", "1").unwrap());
        assert!(!parse_flag("F", "off").unwrap());
        assert!(parse_flag("F", "maybe").is_err());
    }

    #[test]
    fn test_parse_rate_bounds() {
        assert!((parse_rate("R", "0.25").unwrap() - 0.25).abs() < f32::EPSILON);
        assert!(parse_rate("R", "1.5").is_err());
        assert!(parse_rate("R", "-0.1").is_err());
    }

    #[test]
    fn test_validate_password_hash() {
        let good = SecretString::from(crate::services::auth::hash_password("letmein").unwrap());
        assert!(validate_password_hash(&good, "ADMIN_PASSWORD_HASH").is_ok());

        let bad = SecretString::from("hunter2");
        let err = validate_password_hash(&bad, "ADMIN_PASSWORD_HASH").unwrap_err();
        assert!(err.to_string().contains("ADMIN_PASSWORD_HASH"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = test_config("$argon2id$super-secret-hash");
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-hash"));
        assert!(!debug_output.contains("crocs_test"));
    }
}
