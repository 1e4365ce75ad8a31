//! Back-in-stock alert requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crocs_rwanda_core::catalog::ProductRef;
use crocs_rwanda_core::{AlertStatus, Email, StockAlertId};

/// A shopper asking to be told when a product is back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub id: StockAlertId,
    pub product_id: ProductRef,
    pub product_name: String,
    pub email: Email,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Alert fields after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStockAlert {
    pub product_id: ProductRef,
    pub product_name: String,
    pub email: Email,
}
