//! Database operations for orders.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;

use crocs_rwanda_core::checkout::{Customer, OrderLine, OrderSummary, PaymentRecord, ValidatedOrder};
use crocs_rwanda_core::{Email, OrderId, OrderStatus, PaymentMethod, Price};

use super::RepositoryError;
use crate::models::Order;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    customer_full_name: String,
    customer_email: String,
    customer_phone: String,
    payment_method: PaymentMethod,
    card_last4: String,
    momo_number: String,
    momo_name: String,
    items: Json<Vec<OrderLine>>,
    subtotal: Price,
    shipping: Price,
    total: Price,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.customer_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("order {} email: {e}", row.id))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            customer: Customer {
                full_name: row.customer_full_name,
                email,
                phone: row.customer_phone,
            },
            payment: PaymentRecord {
                method: row.payment_method,
                card_last4: row.card_last4,
                momo_number: row.momo_number,
                momo_name: row.momo_name,
            },
            items: row.items.0,
            summary: OrderSummary {
                subtotal: row.subtotal,
                shipping: row.shipping,
                total: row.total,
            },
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const ORDER_COLUMNS: &str = "id, customer_full_name, customer_email, customer_phone, \
                             payment_method, card_last4, momo_number, momo_name, items, \
                             subtotal, shipping, total, status, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a validated order with status `pending`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, order), fields(items = order.items.len(), total = %order.summary.total))]
    pub async fn create(&self, order: &ValidatedOrder) -> Result<OrderId, RepositoryError> {
        let row: (i32,) = sqlx::query_as(
            r#"
            INSERT INTO storefront."order"
                (customer_full_name, customer_email, customer_phone,
                 payment_method, card_last4, momo_number, momo_name,
                 items, subtotal, shipping, total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(&order.customer.full_name)
        .bind(order.customer.email.as_str())
        .bind(&order.customer.phone)
        .bind(order.payment.method)
        .bind(&order.payment.card_last4)
        .bind(&order.payment.momo_number)
        .bind(&order.payment.momo_name)
        .bind(Json(&order.items))
        .bind(order.summary.subtotal)
        .bind(order.summary.shipping)
        .bind(order.summary.total)
        .fetch_one(self.pool)
        .await?;

        let id = OrderId::new(row.0);
        tracing::info!(order_id = %id, method = %order.payment.method, "Order placed");
        Ok(id)
    }

    /// List all orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored email is invalid.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            r#"SELECT {ORDER_COLUMNS} FROM storefront."order" ORDER BY created_at DESC, id DESC"#
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Set the payment status of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            r#"
            UPDATE storefront."order" SET status = $2
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }
}
