//! Database operations for back-in-stock alerts.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use crocs_rwanda_core::catalog::ProductRef;
use crocs_rwanda_core::{AlertStatus, Email, StockAlertId};

use super::RepositoryError;
use crate::models::{NewStockAlert, StockAlert};

/// Internal row type for stock alert queries.
#[derive(Debug, sqlx::FromRow)]
struct StockAlertRow {
    id: i32,
    product_id: String,
    product_name: String,
    email: String,
    status: AlertStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StockAlertRow> for StockAlert {
    type Error = RepositoryError;

    fn try_from(row: StockAlertRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("stock alert {} email: {e}", row.id))
        })?;

        Ok(Self {
            id: StockAlertId::new(row.id),
            product_id: ProductRef::new(&row.product_id),
            product_name: row.product_name,
            email,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const ALERT_COLUMNS: &str = "id, product_id, product_name, email, status, created_at, updated_at";

/// Whether a stock alert was newly stored or already open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    Created(StockAlert),
    Existing(StockAlert),
}

/// Repository for stock alert database operations.
pub struct StockAlertRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StockAlertRepository<'a> {
    /// Create a new stock alert repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find the open alert for a product and email, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self, email), fields(product_id = %product_id))]
    pub async fn find_open(
        &self,
        product_id: &ProductRef,
        email: &Email,
    ) -> Result<Option<StockAlert>, RepositoryError> {
        let row: Option<StockAlertRow> = sqlx::query_as(&format!(
            "SELECT {ALERT_COLUMNS} FROM storefront.stock_alert \
             WHERE product_id = $1 AND email = $2 AND status = 'open'"
        ))
        .bind(product_id.as_str())
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(StockAlert::try_from).transpose()
    }

    /// Record an alert unless an open one already exists for the same
    /// product and email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip(self, alert), fields(product_id = %alert.product_id))]
    pub async fn create_or_existing(
        &self,
        alert: &NewStockAlert,
    ) -> Result<AlertOutcome, RepositoryError> {
        if let Some(existing) = self.find_open(&alert.product_id, &alert.email).await? {
            return Ok(AlertOutcome::Existing(existing));
        }

        let inserted: Result<StockAlertRow, sqlx::Error> = sqlx::query_as(&format!(
            r"
            INSERT INTO storefront.stock_alert (product_id, product_name, email)
            VALUES ($1, $2, $3)
            RETURNING {ALERT_COLUMNS}
            "
        ))
        .bind(alert.product_id.as_str())
        .bind(&alert.product_name)
        .bind(alert.email.as_str())
        .fetch_one(self.pool)
        .await;

        match inserted {
            Ok(row) => Ok(AlertOutcome::Created(row.try_into()?)),
            Err(e) => match RepositoryError::from_unique(e, "open stock alert") {
                // Lost a race with an identical request
                RepositoryError::Conflict(_) => self
                    .find_open(&alert.product_id, &alert.email)
                    .await?
                    .map(AlertOutcome::Existing)
                    .ok_or(RepositoryError::NotFound),
                other => Err(other),
            },
        }
    }

    /// List all alerts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<StockAlert>, RepositoryError> {
        let rows: Vec<StockAlertRow> = sqlx::query_as(&format!(
            "SELECT {ALERT_COLUMNS} FROM storefront.stock_alert ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(StockAlert::try_from).collect()
    }

    /// Open or resolve an alert.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the alert does not exist, or
    /// `RepositoryError::Conflict` when reopening would duplicate an open alert.
    #[instrument(skip(self), fields(alert_id = %id, status = %status))]
    pub async fn update_status(
        &self,
        id: StockAlertId,
        status: AlertStatus,
    ) -> Result<StockAlert, RepositoryError> {
        let row: Option<StockAlertRow> = sqlx::query_as(&format!(
            r"
            UPDATE storefront.stock_alert SET status = $2
            WHERE id = $1
            RETURNING {ALERT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_unique(e, "an open alert already exists for this email and product")
        })?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }
}
