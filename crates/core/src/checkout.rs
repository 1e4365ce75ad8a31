//! Checkout submission and server-side order validation.
//!
//! [`OrderRequest`] is the JSON body posted by the cart page. The server
//! never trusts the client's arithmetic: [`OrderRequest::validate`] checks
//! every field, recomputes the summary and keeps only the last four card
//! digits.

use serde::{Deserialize, Serialize};

use crate::catalog::ProductRef;
use crate::types::{Email, PaymentMethod, Price};

/// Card numbers must have this many digits once spaces and dashes are removed.
pub const CARD_DIGITS: core::ops::RangeInclusive<usize> = 12..=19;

/// Largest accepted difference between client and server totals.
const TOTAL_TOLERANCE_CENTS: i64 = 1;

/// Why an order was rejected. Messages are shown to the shopper verbatim.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Your order has no items.")]
    NoItems,
    #[error("Order item {position} is missing a product, name, price or quantity.")]
    InvalidItem { position: usize },
    #[error("Please fill in your name, email, and phone number.")]
    MissingCustomer,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please complete your card payment details.")]
    IncompleteCard,
    #[error("Card number must contain 12 to 19 digits.")]
    InvalidCardNumber,
    #[error("Please complete your MTN MoMo details.")]
    IncompleteMomo,
    #[error("Shipping cost cannot be negative.")]
    NegativeShipping,
    #[error("Order totals do not match the items in your order.")]
    TotalsMismatch,
}

// =============================================================================
// Wire types
// =============================================================================

/// Customer contact fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Payment fields as submitted. Only the fields of the chosen method matter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    #[serde(default)]
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momo_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momo_name: Option<String>,
}

impl PaymentDetails {
    #[must_use]
    pub fn card(number: impl Into<String>) -> Self {
        Self {
            method: PaymentMethod::Card,
            card_number: Some(number.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn momo(number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            method: PaymentMethod::Momo,
            momo_number: Some(number.into()),
            momo_name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// A line item as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    #[serde(default)]
    pub product_id: ProductRef,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub image: String,
}

/// Subtotal, shipping and total of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    #[serde(default)]
    pub subtotal: Price,
    #[serde(default)]
    pub shipping: Price,
    #[serde(default)]
    pub total: Price,
}

impl OrderSummary {
    /// Summary for the given subtotal and shipping.
    #[must_use]
    pub fn compute(subtotal: Price, shipping: Price) -> Self {
        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    #[serde(default)]
    pub customer: CustomerDetails,
    #[serde(default)]
    pub payment: PaymentDetails,
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
    #[serde(default)]
    pub summary: OrderSummary,
}

// =============================================================================
// Validated order
// =============================================================================

/// Customer fields after trimming and email normalisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub full_name: String,
    pub email: Email,
    pub phone: String,
}

/// Payment fields that are safe to store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub method: PaymentMethod,
    #[serde(default)]
    pub card_last4: String,
    #[serde(default)]
    pub momo_number: String,
    #[serde(default)]
    pub momo_name: String,
}

/// A checked line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductRef,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    #[serde(default)]
    pub image: String,
}

impl OrderLine {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.line_total(self.quantity)
    }
}

/// An order that passed validation, with a server-computed summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrder {
    pub customer: Customer,
    pub payment: PaymentRecord,
    pub items: Vec<OrderLine>,
    pub summary: OrderSummary,
}

impl OrderRequest {
    /// Validate the submission.
    ///
    /// Items are checked first, then customer fields, payment fields and
    /// finally the summary. The returned order carries the recomputed
    /// summary rather than the client's.
    ///
    /// # Errors
    ///
    /// Returns the first [`CheckoutError`] encountered.
    pub fn validate(self) -> Result<ValidatedOrder, CheckoutError> {
        let items = validate_items(self.items)?;
        let customer = validate_customer(self.customer)?;
        let payment = validate_payment(self.payment)?;

        if self.summary.shipping.is_negative() {
            return Err(CheckoutError::NegativeShipping);
        }
        let subtotal: Price = items.iter().map(OrderLine::line_total).sum();
        let summary = OrderSummary::compute(subtotal.round_cents(), self.summary.shipping);

        let tolerance = Price::from_cents(TOTAL_TOLERANCE_CENTS);
        if self.summary.subtotal.abs_diff(summary.subtotal) > tolerance
            || self.summary.total.abs_diff(summary.total) > tolerance
        {
            return Err(CheckoutError::TotalsMismatch);
        }

        Ok(ValidatedOrder {
            customer,
            payment,
            items,
            summary,
        })
    }
}

fn validate_items(items: Vec<OrderItemInput>) -> Result<Vec<OrderLine>, CheckoutError> {
    if items.is_empty() {
        return Err(CheckoutError::NoItems);
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let invalid = CheckoutError::InvalidItem {
                position: index + 1,
            };
            let name = item.name.trim().to_owned();
            if item.product_id.is_empty() || name.is_empty() || item.price.is_negative() {
                return Err(invalid);
            }
            let quantity = u32::try_from(item.quantity)
                .ok()
                .filter(|q| *q >= 1)
                .ok_or(invalid)?;
            Ok(OrderLine {
                product_id: item.product_id,
                name,
                price: item.price,
                quantity,
                image: item.image.trim().to_owned(),
            })
        })
        .collect()
}

fn validate_customer(customer: CustomerDetails) -> Result<Customer, CheckoutError> {
    let full_name = customer.full_name.trim();
    let email = customer.email.trim();
    let phone = customer.phone.trim();
    if full_name.is_empty() || email.is_empty() || phone.is_empty() {
        return Err(CheckoutError::MissingCustomer);
    }
    let email = Email::parse(email).map_err(|_| CheckoutError::InvalidEmail)?;

    Ok(Customer {
        full_name: full_name.to_owned(),
        email,
        phone: phone.to_owned(),
    })
}

fn validate_payment(payment: PaymentDetails) -> Result<PaymentRecord, CheckoutError> {
    match payment.method {
        PaymentMethod::Card => {
            let number = payment.card_number.unwrap_or_default();
            if number.trim().is_empty() {
                return Err(CheckoutError::IncompleteCard);
            }
            let card_last4 = card_last4(&number)?;
            Ok(PaymentRecord {
                method: PaymentMethod::Card,
                card_last4,
                ..PaymentRecord::default()
            })
        }
        PaymentMethod::Momo => {
            let number = payment.momo_number.unwrap_or_default();
            let name = payment.momo_name.unwrap_or_default();
            if number.trim().is_empty() || name.trim().is_empty() {
                return Err(CheckoutError::IncompleteMomo);
            }
            Ok(PaymentRecord {
                method: PaymentMethod::Momo,
                momo_number: number.trim().to_owned(),
                momo_name: name.trim().to_owned(),
                ..PaymentRecord::default()
            })
        }
    }
}

/// Last four digits of a card number.
///
/// # Errors
///
/// Returns [`CheckoutError::InvalidCardNumber`] if the number contains
/// anything other than digits, spaces and dashes, or has the wrong length.
pub fn card_last4(number: &str) -> Result<String, CheckoutError> {
    let digits: String = number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) || !CARD_DIGITS.contains(&digits.len()) {
        return Err(CheckoutError::InvalidCardNumber);
    }
    digits
        .get(digits.len() - 4..)
        .map(str::to_owned)
        .ok_or(CheckoutError::InvalidCardNumber)
}
