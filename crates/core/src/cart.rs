//! Selection-aware shopping cart.
//!
//! The cart lives in the shopper's browser storage as a JSON array of
//! [`CartLine`]s. A line is identified by its [`LineId`], which combines the
//! product reference with the chosen size and color, so the same product in
//! two variants occupies two lines. A subset of lines is *selected*; totals
//! shown at checkout and the submitted order cover only the selection.

use std::collections::HashSet;

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::{Product, ProductRef, coerce_decimal};
use crate::checkout::{CustomerDetails, OrderItemInput, OrderRequest, OrderSummary, PaymentDetails};
use crate::types::Price;

const VARIANT_SEPARATOR: &str = "::";
const NO_SIZE: &str = "nosize";
const NO_COLOR: &str = "nocolor";

/// Cart operations that cannot proceed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("{name} is out of stock.")]
    OutOfStock { name: String },
    #[error("Select at least one product to place order.")]
    NothingSelected,
    #[error("Select required size/color for: {}", .0.join(", "))]
    MissingVariants(Vec<String>),
}

// =============================================================================
// Line identity
// =============================================================================

/// Identity of a cart line: `"{base}::{size|nosize}::{color|nocolor}"`, or a
/// bare product reference for lines added before any variant was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LineId(String);

impl LineId {
    /// Build the id of a product variant. Blank size or color use the
    /// `nosize` / `nocolor` placeholders.
    #[must_use]
    pub fn for_variant(product: &ProductRef, size: &str, color: &str) -> Self {
        let base = Self::new(product.as_str()).base();
        let size = non_blank(size).unwrap_or(NO_SIZE);
        let color = non_blank(color).unwrap_or(NO_COLOR);
        Self(format!(
            "{base}{VARIANT_SEPARATOR}{size}{VARIANT_SEPARATOR}{color}"
        ))
    }

    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The product part of the id (everything before the first `::`).
    #[must_use]
    pub fn base(&self) -> ProductRef {
        let base = self
            .0
            .split_once(VARIANT_SEPARATOR)
            .map_or(self.0.as_str(), |(base, _)| base);
        ProductRef::new(base)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&ProductRef> for LineId {
    fn from(product: &ProductRef) -> Self {
        Self::new(product.as_str())
    }
}

impl<'de> Deserialize<'de> for LineId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Older carts stored numeric product ids directly.
        ProductRef::deserialize(deserializer).map(|r| Self::new(r.as_str()))
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

// =============================================================================
// Lines
// =============================================================================

const fn one() -> u32 {
    1
}

/// One entry of the cart (or of the saved-for-later list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: LineId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductRef>,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Price,
    #[serde(default = "one")]
    pub quantity: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub available_sizes: Vec<String>,
    #[serde(default)]
    pub available_colors: Vec<String>,
    #[serde(default)]
    pub selected_size: String,
    #[serde(default)]
    pub selected_color: String,
}

/// Stored prices may be null, numeric strings or junk; junk counts as zero.
fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Price, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(Price::new(coerce_decimal(&value)))
}

impl CartLine {
    /// A quantity-one line for `product` with no variant chosen.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: LineId::from(&product.id),
            product_id: Some(product.id.clone()),
            name: product.name.clone(),
            price: product.price,
            quantity: 1,
            image: product.image.clone(),
            description: product.description.clone(),
            available_sizes: product.sizes.clone(),
            available_colors: product.colors.clone(),
            selected_size: String::new(),
            selected_color: String::new(),
        }
    }

    /// The product this line refers to.
    #[must_use]
    pub fn product_ref(&self) -> ProductRef {
        self.product_id
            .as_ref()
            .filter(|r| !r.is_empty())
            .cloned()
            .unwrap_or_else(|| self.id.base())
    }

    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.line_total(self.quantity)
    }

    /// Whether the product offers sizes or colors that have not been chosen.
    #[must_use]
    pub fn is_missing_variant(&self) -> bool {
        let needs_size = !self.available_sizes.is_empty() && non_blank(&self.selected_size).is_none();
        let needs_color =
            !self.available_colors.is_empty() && non_blank(&self.selected_color).is_none();
        needs_size || needs_color
    }

    fn variant_id(&self) -> LineId {
        LineId::for_variant(&self.product_ref(), &self.selected_size, &self.selected_color)
    }
}

/// Items the shopper set aside, stored next to the cart.
pub type SavedItems = Vec<CartLine>;

/// A size or color picked for a cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantChange {
    Size(String),
    Color(String),
}

// =============================================================================
// Shipping
// =============================================================================

/// Shipping choices offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShippingOption {
    #[default]
    Standard,
    Express,
}

impl ShippingOption {
    #[must_use]
    pub fn cost(&self) -> Price {
        match self {
            Self::Standard => Price::from_cents(500),
            Self::Express => Price::from_cents(1500),
        }
    }
}

impl FromStr for ShippingOption {
    type Err = core::convert::Infallible;

    /// Parses the shipping radio value (`"5"`, `"15"`, `standard`,
    /// `express`). Anything unrecognised is standard shipping.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "15" | "15.00" | "express" => Self::Express,
            _ => Self::Standard,
        })
    }
}

/// Totals for the selected lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub item_count: u32,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
}

impl From<CheckoutSummary> for OrderSummary {
    fn from(summary: CheckoutSummary) -> Self {
        Self {
            subtotal: summary.subtotal,
            shipping: summary.shipping,
            total: summary.total,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A cart plus the set of lines selected for checkout.
///
/// Every mutating operation leaves the selection referring only to lines
/// that exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingCart {
    lines: Vec<CartLine>,
    selected: HashSet<LineId>,
}

impl ShoppingCart {
    /// Restore a stored cart with every line selected.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Self {
            lines,
            selected: HashSet::new(),
        };
        cart.select_all();
        cart
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    #[must_use]
    pub fn line(&self, id: &LineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == *id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of `product`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] when the product has no stock.
    pub fn add_product(&mut self, product: &Product) -> Result<LineId, CartError> {
        if !product.is_in_stock() {
            return Err(CartError::OutOfStock {
                name: product.name.clone(),
            });
        }

        let id = LineId::from(&product.id);
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine::from_product(product));
        }
        Ok(id)
    }

    pub fn remove(&mut self, id: &LineId) {
        self.lines.retain(|line| line.id != *id);
        self.selected.remove(id);
    }

    /// Change a line's quantity by `delta`, never going below one.
    pub fn update_quantity(&mut self, id: &LineId, delta: i64) {
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == *id) {
            let next = i64::from(line.quantity).saturating_add(delta).max(1);
            line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        }
    }

    /// Pick a size or color for a line and re-key it.
    ///
    /// If another line already has the resulting id the two are merged and
    /// the surviving line is selected. Returns the id of the line now
    /// holding the edited item, or `None` if `id` is unknown.
    pub fn update_variant(&mut self, id: &LineId, change: VariantChange) -> Option<LineId> {
        let index = self.lines.iter().position(|line| line.id == *id)?;
        let line = self.lines.get_mut(index)?;
        match change {
            VariantChange::Size(size) => line.selected_size = size.trim().to_owned(),
            VariantChange::Color(color) => line.selected_color = color.trim().to_owned(),
        }

        let next_id = line.variant_id();
        if next_id == *id {
            return Some(next_id);
        }

        let quantity = line.quantity;
        if let Some(existing) = self.lines.iter().position(|other| other.id == next_id) {
            if let Some(survivor) = self.lines.get_mut(existing) {
                survivor.quantity = survivor.quantity.saturating_add(quantity);
            }
            self.lines.remove(index);
            self.selected.remove(id);
            self.selected.insert(next_id.clone());
        } else {
            if let Some(line) = self.lines.get_mut(index) {
                line.id = next_id.clone();
            }
            if self.selected.remove(id) {
                self.selected.insert(next_id.clone());
            }
        }
        Some(next_id)
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Select or deselect a line. Unknown ids are ignored.
    pub fn toggle(&mut self, id: &LineId, selected: bool) {
        if !selected {
            self.selected.remove(id);
        } else if self.line(id).is_some() {
            self.selected.insert(id.clone());
        }
    }

    /// Select exactly one line (the "Buy This" button).
    pub fn select_only(&mut self, id: &LineId) {
        self.selected.clear();
        self.toggle(id, true);
    }

    pub fn select_all(&mut self) {
        self.selected = self.lines.iter().map(|line| line.id.clone()).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Drop selections that no longer match a line.
    pub fn sync_selection(&mut self) {
        let lines = &self.lines;
        self.selected
            .retain(|id| lines.iter().any(|line| line.id == *id));
    }

    #[must_use]
    pub fn is_selected(&self, id: &LineId) -> bool {
        self.selected.contains(id)
    }

    /// Selected lines, in cart order.
    #[must_use]
    pub fn selected_lines(&self) -> Vec<&CartLine> {
        self.lines
            .iter()
            .filter(|line| self.selected.contains(&line.id))
            .collect()
    }

    #[must_use]
    pub fn is_all_selected(&self) -> bool {
        !self.lines.is_empty() && self.lines.iter().all(|line| self.selected.contains(&line.id))
    }

    // -------------------------------------------------------------------------
    // Totals
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    #[must_use]
    pub fn selected_subtotal(&self) -> Price {
        self.selected_lines()
            .into_iter()
            .map(CartLine::line_total)
            .sum()
    }

    /// Total units in the cart (the header badge).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |sum, line| sum.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn selected_item_count(&self) -> u32 {
        self.selected_lines()
            .into_iter()
            .fold(0, |sum, line| sum.saturating_add(line.quantity))
    }

    /// Shipping for the current selection; free when nothing is selected.
    #[must_use]
    pub fn shipping_for(&self, option: ShippingOption) -> Price {
        if self.selected_lines().is_empty() {
            Price::ZERO
        } else {
            option.cost()
        }
    }

    #[must_use]
    pub fn checkout_summary(&self, option: ShippingOption) -> CheckoutSummary {
        let subtotal = self.selected_subtotal();
        let shipping = self.shipping_for(option);
        CheckoutSummary {
            item_count: self.selected_item_count(),
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }

    // -------------------------------------------------------------------------
    // Checkout
    // -------------------------------------------------------------------------

    /// Check that every selected line has its required size and color.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MissingVariants`] with the names of the offending
    /// products, deduplicated, in cart order.
    pub fn validate_selected_variants(&self) -> Result<(), CartError> {
        let mut names: Vec<String> = Vec::new();
        for line in self.selected_lines() {
            if line.is_missing_variant() && !names.contains(&line.name) {
                names.push(line.name.clone());
            }
        }
        if names.is_empty() {
            Ok(())
        } else {
            Err(CartError::MissingVariants(names))
        }
    }

    /// Move a saved item into the cart and select it.
    ///
    /// Returns the id of the receiving line, or `None` if `index` is out of
    /// range.
    pub fn move_saved_to_cart(&mut self, saved: &mut SavedItems, index: usize) -> Option<LineId> {
        if index >= saved.len() {
            return None;
        }
        let mut item = saved.remove(index);
        let quantity = item.quantity.max(1);

        if let Some(line) = self.lines.iter_mut().find(|line| line.id == item.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            item.quantity = quantity;
            self.lines.push(item.clone());
        }
        self.selected.insert(item.id.clone());
        Some(item.id)
    }

    /// Build the order payload for the selected lines.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NothingSelected`] or
    /// [`CartError::MissingVariants`].
    pub fn build_order(
        &self,
        customer: CustomerDetails,
        payment: PaymentDetails,
        shipping: ShippingOption,
    ) -> Result<OrderRequest, CartError> {
        let selected = self.selected_lines();
        if selected.is_empty() {
            return Err(CartError::NothingSelected);
        }
        self.validate_selected_variants()?;

        let items = selected
            .into_iter()
            .map(|line| OrderItemInput {
                product_id: line.product_ref(),
                name: line.name.clone(),
                price: line.price,
                quantity: i64::from(line.quantity),
                image: line.image.clone(),
            })
            .collect();

        Ok(OrderRequest {
            customer,
            payment,
            items,
            summary: self.checkout_summary(shipping).into(),
        })
    }

    /// Drop the purchased (selected) lines and select everything left.
    pub fn complete_checkout(&mut self) {
        let purchased = std::mem::take(&mut self.selected);
        self.lines.retain(|line| !purchased.contains(&line.id));
        self.select_all();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::PaymentMethod;

    fn product(id: &str, cents: i64, stock: i32) -> Product {
        Product {
            id: ProductRef::new(id),
            name: format!("Clog {id}"),
            price: Price::from_cents(cents),
            description: String::new(),
            image: String::new(),
            stock,
            category: "Classic".to_owned(),
            colors: vec!["green".to_owned()],
            sizes: vec!["US 7".to_owned(), "US 8".to_owned()],
            rating: 0.0,
            reviews: Vec::new(),
        }
    }

    fn line(id: &str) -> LineId {
        LineId::new(id)
    }

    #[test]
    fn test_line_id_format_and_base() {
        let id = LineId::for_variant(&ProductRef::new("3"), " US 7 ", "");
        assert_eq!(id.as_str(), "3::US 7::nocolor");
        assert_eq!(id.base().as_str(), "3");

        let rekeyed = LineId::for_variant(&ProductRef::new("3::US 7::nocolor"), "", "navy");
        assert_eq!(rekeyed.as_str(), "3::nosize::navy");
    }

    #[test]
    fn test_add_product_merges_and_rejects_out_of_stock() {
        let mut cart = ShoppingCart::default();
        cart.add_product(&product("1", 4999, 5)).unwrap();
        cart.add_product(&product("1", 4999, 5)).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 2);

        let err = cart.add_product(&product("4", 5250, 0)).unwrap_err();
        assert_eq!(err.to_string(), "Clog 4 is out of stock.");
    }

    #[test]
    fn test_from_lines_selects_everything() {
        let mut cart = ShoppingCart::default();
        cart.add_product(&product("1", 100, 1)).unwrap();
        cart.add_product(&product("2", 200, 1)).unwrap();
        let restored = ShoppingCart::from_lines(cart.into_lines());
        assert!(restored.is_all_selected());
        assert_eq!(restored.selected_subtotal(), Price::from_cents(300));
    }

    #[test]
    fn test_update_quantity_floor_and_unknown() {
        let mut cart = ShoppingCart::default();
        cart.add_product(&product("1", 100, 3)).unwrap();
        cart.update_quantity(&line("1"), 4);
        assert_eq!(cart.item_count(), 5);
        cart.update_quantity(&line("1"), -10);
        assert_eq!(cart.item_count(), 1);
        cart.update_quantity(&line("missing"), 3);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_remove_drops_selection() {
        let mut cart = ShoppingCart::default();
        let id = cart.add_product(&product("1", 100, 3)).unwrap();
        cart.select_all();
        cart.remove(&id);
        assert!(cart.is_empty());
        assert!(!cart.is_selected(&id));
    }

    #[test]
    fn test_update_variant_rekeys_and_selection_follows() {
        let mut cart = ShoppingCart::default();
        let id = cart.add_product(&product("1", 100, 3)).unwrap();
        cart.select_all();

        let sized = cart
            .update_variant(&id, VariantChange::Size("US 8".to_owned()))
            .unwrap();
        assert_eq!(sized.as_str(), "1::US 8::nocolor");
        assert!(cart.is_selected(&sized));
        assert!(!cart.is_selected(&id));

        let colored = cart
            .update_variant(&sized, VariantChange::Color("green".to_owned()))
            .unwrap();
        assert_eq!(colored.as_str(), "1::US 8::green");
        assert_eq!(cart.line(&colored).unwrap().product_ref().as_str(), "1");
    }

    #[test]
    fn test_update_variant_merges_into_existing_line() {
        let mut first = CartLine::from_product(&product("1", 100, 3));
        first.id = line("1::US 7::nocolor");
        first.selected_size = "US 7".to_owned();
        first.quantity = 2;
        let mut second = CartLine::from_product(&product("1", 100, 3));
        second.id = line("1::US 8::nocolor");
        second.selected_size = "US 8".to_owned();
        second.quantity = 3;

        let mut cart = ShoppingCart::from_lines(vec![first, second]);
        cart.toggle(&line("1::US 7::nocolor"), false);

        let survivor = cart
            .update_variant(&line("1::US 8::nocolor"), VariantChange::Size("US 7".to_owned()))
            .unwrap();
        assert_eq!(survivor.as_str(), "1::US 7::nocolor");
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 5);
        assert!(cart.is_selected(&survivor));
        assert!(!cart.is_selected(&line("1::US 8::nocolor")));
    }

    #[test]
    fn test_update_variant_unknown_line() {
        let mut cart = ShoppingCart::default();
        assert!(cart
            .update_variant(&line("nope"), VariantChange::Size("US 7".to_owned()))
            .is_none());
    }

    #[test]
    fn test_selection_tools() {
        let mut cart = ShoppingCart::default();
        let a = cart.add_product(&product("1", 1000, 3)).unwrap();
        let b = cart.add_product(&product("2", 2000, 3)).unwrap();
        cart.select_all();
        assert!(cart.is_all_selected());

        cart.select_only(&b);
        assert_eq!(cart.selected_subtotal(), Price::from_cents(2000));
        assert_eq!(cart.subtotal(), Price::from_cents(3000));

        cart.toggle(&a, true);
        cart.toggle(&line("ghost"), true);
        assert_eq!(cart.selected_lines().len(), 2);

        cart.clear_selection();
        assert_eq!(cart.shipping_for(ShippingOption::Express), Price::ZERO);
    }

    #[test]
    fn test_sync_selection_drops_stale_ids() {
        let lines = vec![CartLine::from_product(&product("1", 100, 1))];
        let mut cart = ShoppingCart::from_lines(lines);
        cart.selected.insert(line("stale"));
        cart.sync_selection();
        assert_eq!(cart.selected.len(), 1);
    }

    #[test]
    fn test_checkout_summary() {
        let mut cart = ShoppingCart::default();
        let id = cart.add_product(&product("1", 4999, 3)).unwrap();
        cart.update_quantity(&id, 1);
        cart.select_all();

        let summary = cart.checkout_summary(ShippingOption::Standard);
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.subtotal, Price::from_cents(9998));
        assert_eq!(summary.shipping, Price::from_cents(500));
        assert_eq!(summary.total, Price::from_cents(10498));
    }

    #[test]
    fn test_validate_selected_variants_lists_names_once() {
        let mut cart = ShoppingCart::default();
        cart.add_product(&product("1", 100, 3)).unwrap();
        let mut sized = CartLine::from_product(&product("1", 100, 3));
        sized.id = line("1::US 7::nocolor");
        sized.selected_size = "US 7".to_owned();
        cart.lines.push(sized);
        cart.add_product(&product("2", 100, 3)).unwrap();
        cart.select_all();

        let err = cart.validate_selected_variants().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Select required size/color for: Clog 1, Clog 2"
        );
    }

    #[test]
    fn test_move_saved_to_cart() {
        let mut cart = ShoppingCart::default();
        let id = cart.add_product(&product("1", 100, 3)).unwrap();
        cart.clear_selection();

        let mut saved_line = CartLine::from_product(&product("1", 100, 3));
        saved_line.quantity = 0;
        let mut saved: SavedItems = vec![saved_line, CartLine::from_product(&product("9", 100, 3))];

        let moved = cart.move_saved_to_cart(&mut saved, 0).unwrap();
        assert_eq!(moved, id);
        assert_eq!(cart.item_count(), 2);
        assert!(cart.is_selected(&id));
        assert_eq!(saved.len(), 1);
        assert!(cart.move_saved_to_cart(&mut saved, 5).is_none());
    }

    #[test]
    fn test_build_order_and_complete_checkout() {
        let mut cart = ShoppingCart::default();
        let a = cart.add_product(&product("1", 4999, 3)).unwrap();
        let b = cart.add_product(&product("2", 3750, 3)).unwrap();

        let customer = CustomerDetails {
            full_name: "Aline".to_owned(),
            email: "aline@example.com".to_owned(),
            phone: "0788".to_owned(),
        };
        assert_eq!(
            cart.build_order(customer.clone(), PaymentDetails::card("4111111111111111"), ShippingOption::Standard),
            Err(CartError::NothingSelected)
        );

        for id in [&a, &b] {
            let next = cart
                .update_variant(id, VariantChange::Size("US 7".to_owned()))
                .unwrap();
            let next = cart
                .update_variant(&next, VariantChange::Color("green".to_owned()))
                .unwrap();
            if next.base().as_str() == "1" {
                cart.select_only(&next);
            }
        }

        let order = cart
            .build_order(customer, PaymentDetails::momo("0788", "Aline"), ShippingOption::Express)
            .unwrap();
        assert_eq!(order.payment.method, PaymentMethod::Momo);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items.first().unwrap().product_id.as_str(), "1");
        assert_eq!(order.summary.total, Price::from_cents(6499));
        assert!(order.validate().is_ok());

        cart.complete_checkout();
        assert_eq!(cart.lines().len(), 1);
        assert!(cart.is_all_selected());
        assert_eq!(cart.lines().first().unwrap().product_ref().as_str(), "2");
    }

    #[test]
    fn test_shipping_option_from_radio() {
        assert_eq!("15".parse::<ShippingOption>().unwrap(), ShippingOption::Express);
        assert_eq!("5".parse::<ShippingOption>().unwrap(), ShippingOption::Standard);
        assert_eq!("".parse::<ShippingOption>().unwrap(), ShippingOption::Standard);
    }

    #[test]
    fn test_stored_cart_with_numeric_id() {
        let lines: Vec<CartLine> =
            serde_json::from_str(r#"[{"id": 2, "name": "Urban Black Slide", "price": 39.99}]"#)
                .unwrap();
        let cart = ShoppingCart::from_lines(lines);
        let first = cart.lines().first().unwrap();
        assert_eq!(first.id.as_str(), "2");
        assert_eq!(first.quantity, 1);
        assert_eq!(cart.subtotal(), Price::from_cents(3999));
    }

    #[test]
    fn test_stored_cart_with_bad_prices_loads_as_zero() {
        let lines: Vec<CartLine> = serde_json::from_str(
            r#"[
                {"id": "1", "name": "Null Price", "price": null},
                {"id": "2", "name": "Junk Price", "price": "ask"},
                {"id": "3", "name": "Text Price", "price": "12.50", "quantity": 2}
            ]"#,
        )
        .unwrap();
        let cart = ShoppingCart::from_lines(lines);
        assert_eq!(cart.lines().len(), 3);
        assert_eq!(cart.lines().first().unwrap().price, Price::ZERO);
        assert_eq!(cart.subtotal(), Price::from_cents(2500));
    }
}
