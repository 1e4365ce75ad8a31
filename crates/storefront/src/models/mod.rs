//! Records stored by the storefront and returned by the admin API.
//!
//! Products are the shared [`crocs_rwanda_core::catalog::Product`] type; the
//! remaining records only exist server-side.

pub mod contact_message;
pub mod order;
pub mod session;
pub mod stock_alert;

pub use contact_message::{ContactMessage, MessageUpdate, NewContactMessage};
pub use order::Order;
pub use session::{CurrentAdmin, keys as session_keys};
pub use stock_alert::{NewStockAlert, StockAlert};
