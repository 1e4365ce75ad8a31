//! Database operations for the storefront `PostgreSQL`.
//!
//! # Schema: `storefront`
//!
//! ## Tables
//!
//! - `product` - Catalog records (colors/sizes as `TEXT[]`, reviews as `JSONB`)
//! - `order` - Placed orders (customer, payment and summary as columns, items as `JSONB`)
//! - `contact_message` - Contact form submissions
//! - `stock_alert` - Back-in-stock requests
//! - `session` - Admin sessions (created by the session store)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p crocs-rwanda-cli -- migrate
//! ```

pub mod contact_messages;
pub mod orders;
pub mod products;
pub mod stock_alerts;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use contact_messages::ContactMessageRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use stock_alerts::{AlertOutcome, StockAlertRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., a second open stock alert).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a unique violation to `Conflict`, anything else to `Database`.
    pub(crate) fn from_unique(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return Self::Conflict(what.to_owned());
            }
        }
        Self::Database(err)
    }
}

/// Record counts shown on the admin overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewCounts {
    pub products: i64,
    pub orders: i64,
    pub messages: i64,
    pub open_alerts: i64,
}

/// Count the records behind the admin overview in one round trip.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
#[tracing::instrument(skip(pool))]
pub async fn overview_counts(pool: &PgPool) -> Result<OverviewCounts, RepositoryError> {
    let row: (i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            (SELECT COUNT(*) FROM storefront.product),
            (SELECT COUNT(*) FROM storefront."order"),
            (SELECT COUNT(*) FROM storefront.contact_message),
            (SELECT COUNT(*) FROM storefront.stock_alert WHERE status = 'open')
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(OverviewCounts {
        products: row.0,
        orders: row.1,
        messages: row.2,
        open_alerts: row.3,
    })
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
