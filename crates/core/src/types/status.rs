//! Status enums for stored records.
//!
//! Every enum serialises in `snake_case`, matching both the JSON API and the
//! Postgres enum labels created by the storefront migrations.

use serde::{Deserialize, Serialize};

/// Error returned when a status string is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct InvalidStatus {
    /// Which status family was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Implements `Display`, `FromStr` and `as_str` for a unit enum from a list of
/// `Variant => "label"` pairs.
macro_rules! status_strings {
    ($name:ident, $kind:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            /// All values, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The wire label for this value.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidStatus;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($label => Ok(Self::$variant),)+
                    other => Err(InvalidStatus {
                        kind: $kind,
                        value: other.to_owned(),
                    }),
                }
            }
        }
    };
}

/// Order payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "storefront.order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

status_strings!(OrderStatus, "order status", {
    Pending => "pending",
    Paid => "paid",
    Failed => "failed",
});

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "storefront.payment_method", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Debit or credit card.
    #[default]
    Card,
    /// MTN Mobile Money.
    Momo,
}

status_strings!(PaymentMethod, "payment method", {
    Card => "card",
    Momo => "momo",
});

impl PaymentMethod {
    /// Human-readable label shown in the admin console.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Card => "Card",
            Self::Momo => "MTN MoMo",
        }
    }
}

/// Admin handling state of a contact message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "storefront.message_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    #[default]
    New,
    Read,
    Replied,
}

status_strings!(MessageStatus, "message status", {
    New => "new",
    Read => "read",
    Replied => "replied",
});

/// Back-in-stock alert state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "storefront.alert_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    #[default]
    Open,
    Resolved,
}

status_strings!(AlertStatus, "alert status", {
    Open => "open",
    Resolved => "resolved",
});

impl AlertStatus {
    /// The state an admin toggles to from this one.
    #[must_use]
    pub const fn toggled(&self) -> Self {
        match self {
            Self::Open => Self::Resolved,
            Self::Resolved => Self::Open,
        }
    }
}
