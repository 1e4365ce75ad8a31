//! Stored orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crocs_rwanda_core::OrderId;
use crocs_rwanda_core::OrderStatus;
use crocs_rwanda_core::checkout::{Customer, OrderLine, OrderSummary, PaymentRecord};

/// A placed order as listed in the admin console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer: Customer,
    pub payment: PaymentRecord,
    pub items: Vec<OrderLine>,
    pub summary: OrderSummary,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}
