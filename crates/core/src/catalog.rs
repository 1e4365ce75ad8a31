//! Product catalog records, normalisation, merging and filtering.
//!
//! The storefront receives products from several places: the REST API, a
//! locally cached copy kept by the browser, and loosely typed seed files.
//! Everything funnels into [`Product`] through the helpers in this module.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::types::{Price, ProductId};

/// Products with fewer units than this are flagged as low stock.
pub const LOW_STOCK_THRESHOLD: i32 = 10;

/// Category assigned when none is given.
pub const DEFAULT_CATEGORY: &str = "General";

/// Maximum length of a product name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Errors raised while normalising or validating catalog data.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Product record has no id.")]
    MissingId,
    #[error("Product name is required.")]
    NameRequired,
    #[error("Product name must be at most {max} characters.")]
    NameTooLong { max: usize },
    #[error("Price must be zero or more.")]
    NegativePrice,
    #[error("Stock must be zero or more.")]
    NegativeStock,
    #[error("Stock is too large.")]
    StockTooLarge,
    #[error("Unknown price range: {0}")]
    InvalidPriceBand(String),
}

// =============================================================================
// ProductRef
// =============================================================================

/// Normalised product reference.
///
/// Stored products are addressed by their numeric [`ProductId`], but cart
/// lines and cached catalogs may carry other references (for example
/// `local-1700000000` for products saved while offline), so the catalog
/// works with trimmed strings. JSON input may be a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ProductRef(String);

impl ProductRef {
    /// Build a reference from any string, trimming surrounding whitespace.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The stored product id, if this reference is numeric.
    #[must_use]
    pub fn product_id(&self) -> Option<ProductId> {
        self.0.parse().ok()
    }
}

impl fmt::Display for ProductRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ProductId> for ProductRef {
    fn from(id: ProductId) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ProductRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProductRef {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl AsRef<str> for ProductRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for ProductRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProductRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Number(i64),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Text(s) => Self::new(&s),
            Repr::Number(n) => Self(n.to_string()),
        })
    }
}

// =============================================================================
// Loose lists
// =============================================================================

/// Parse a loosely typed list value.
///
/// Accepts a JSON array, a string holding a JSON array, or a comma-separated
/// string. Entries are trimmed and empty entries dropped. Anything else
/// yields an empty list.
#[must_use]
pub fn parse_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(list_entry).collect(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.starts_with('[') {
                if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
                    return items.iter().filter_map(list_entry).collect();
                }
            }
            split_list(trimmed)
        }
        _ => Vec::new(),
    }
}

/// Split a comma-separated string into trimmed, non-empty entries.
#[must_use]
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}

fn list_entry(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// A list field that accepts any of the shapes understood by [`parse_list`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct StringList(pub Vec<String>);

impl StringList {
    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl<'de> Deserialize<'de> for StringList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self(parse_list(&value)))
    }
}

impl From<Vec<String>> for StringList {
    fn from(items: Vec<String>) -> Self {
        Self(items)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A customer review shown on the product card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub user: String,
    pub rating: f32,
    #[serde(default)]
    pub comment: String,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: ProductRef,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub stock: i32,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_owned()
}

impl Product {
    #[must_use]
    pub const fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }
}

// =============================================================================
// Admin input
// =============================================================================

/// Product fields submitted from the admin form.
///
/// Colors and sizes may be sent as lists or comma-separated strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub colors: StringList,
    #[serde(default)]
    pub sizes: StringList,
    #[serde(default)]
    pub description: String,
}

/// Validated product fields, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub price: Price,
    pub stock: i32,
    pub category: String,
    pub image: String,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub description: String,
}

impl ProductInput {
    /// Trim and check the submitted fields.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: missing or overlong name, negative
    /// price, or a stock count outside `0..=i32::MAX`.
    pub fn validate(self) -> Result<ProductDraft, CatalogError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(CatalogError::NameRequired);
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(CatalogError::NameTooLong {
                max: MAX_NAME_LENGTH,
            });
        }
        if self.price.is_negative() {
            return Err(CatalogError::NegativePrice);
        }
        if self.stock < 0 {
            return Err(CatalogError::NegativeStock);
        }
        let stock = i32::try_from(self.stock).map_err(|_| CatalogError::StockTooLarge)?;

        let category = match self.category.trim() {
            "" => default_category(),
            other => other.to_owned(),
        };

        Ok(ProductDraft {
            name,
            price: self.price,
            stock,
            category,
            image: self.image.trim().to_owned(),
            colors: self.colors.into_inner(),
            sizes: self.sizes.into_inner(),
            description: self.description.trim().to_owned(),
        })
    }
}

impl ProductDraft {
    /// A new product with no rating or reviews yet.
    #[must_use]
    pub fn into_product(self, id: ProductRef) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            description: self.description,
            image: self.image,
            stock: self.stock,
            category: self.category,
            colors: self.colors,
            sizes: self.sizes,
            rating: 0.0,
            reviews: Vec::new(),
        }
    }

    /// Overwrite the editable fields of `product`, keeping its id, rating
    /// and reviews.
    pub fn apply_to(self, product: &mut Product) {
        product.name = self.name;
        product.price = self.price;
        product.description = self.description;
        product.image = self.image;
        product.stock = self.stock;
        product.category = self.category;
        product.colors = self.colors;
        product.sizes = self.sizes;
    }
}

// =============================================================================
// Loosely typed records
// =============================================================================

/// A product record from an external source with unreliable field types.
///
/// Both flat records (`{"id": 1, "name": ...}`) and wrapped records
/// (`{"id": "rec1", "fields": {"name": ...}}`) are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProduct {
    #[serde(default, alias = "_id")]
    id: Option<Value>,
    #[serde(default)]
    fields: Option<Map<String, Value>>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl RawProduct {
    /// Normalise into a [`Product`].
    ///
    /// Price and stock are coerced to numbers (0 when missing or
    /// unparseable), the image may be a string or an array of `{url}`
    /// objects, and list fields go through [`parse_list`]. The result is
    /// then held to the same rules as [`ProductInput::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingId`] when the record has no usable id,
    /// or the [`ProductInput::validate`] error for a missing or overlong
    /// name, a negative price, or a stock count out of range.
    pub fn normalize(self) -> Result<Product, CatalogError> {
        let id = self
            .id
            .as_ref()
            .and_then(list_entry)
            .map(|s| ProductRef::new(&s))
            .ok_or(CatalogError::MissingId)?;

        let fields = self.fields.unwrap_or(self.rest);
        let get = |key: &str| field(&fields, key);

        let stock = coerce_decimal(get("stock"))
            .trunc()
            .to_i64()
            .ok_or(CatalogError::StockTooLarge)?;

        let draft = ProductInput {
            name: coerce_string(get("name")),
            price: Price::new(coerce_decimal(get("price"))),
            stock,
            category: coerce_string(get("category")),
            image: coerce_image(get("image")),
            colors: StringList(parse_list(get("colors"))),
            sizes: StringList(parse_list(get("sizes"))),
            description: coerce_string(get("description")),
        }
        .validate()?;

        let mut product = draft.into_product(id);
        product.rating = coerce_decimal(get("rating")).to_f32().unwrap_or(0.0);
        product.reviews = coerce_reviews(get("reviews"));
        Ok(product)
    }
}

impl TryFrom<RawProduct> for Product {
    type Error = CatalogError;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        raw.normalize()
    }
}

static NULL: Value = Value::Null;

fn field<'a>(fields: &'a Map<String, Value>, key: &str) -> &'a Value {
    fields.get(key).unwrap_or(&NULL)
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

pub(crate) fn coerce_decimal(value: &Value) -> Decimal {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_owned(),
        _ => return Decimal::ZERO,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .unwrap_or(Decimal::ZERO)
}

fn coerce_image(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .first()
            .and_then(|first| first.get("url"))
            .map(coerce_string)
            .unwrap_or_default(),
        other => coerce_string(other),
    }
}

fn coerce_reviews(value: &Value) -> Vec<Review> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect()
}

// =============================================================================
// Merging
// =============================================================================

/// Merge a server catalog with a locally cached one.
///
/// Each reference appears once. Server records win over local ones with the
/// same reference; local-only records come first, followed by the server
/// records in server order. Duplicates inside either list collapse into the
/// position of their first occurrence, carrying the last occurrence's
/// fields. The merge is idempotent: merging the result with the same local
/// list again, or merging a catalog with itself, changes nothing.
#[must_use]
pub fn merge_catalogs(server: Vec<Product>, local: Vec<Product>) -> Vec<Product> {
    let server = dedupe(server);
    let local_only: Vec<Product> = dedupe(local)
        .into_iter()
        .filter(|product| !server.iter().any(|s| s.id == product.id))
        .collect();

    local_only.into_iter().chain(server).collect()
}

fn dedupe(products: Vec<Product>) -> Vec<Product> {
    let mut out: Vec<Product> = Vec::with_capacity(products.len());
    for product in products {
        if let Some(existing) = out.iter_mut().find(|p| p.id == product.id) {
            *existing = product;
        } else {
            out.push(product);
        }
    }
    out
}

/// Save a product into a locally cached catalog.
///
/// An entry with the same reference is updated in place (keeping its rating
/// and reviews); otherwise the product is inserted at the front.
pub fn upsert_local(catalog: &mut Vec<Product>, id: ProductRef, draft: ProductDraft) {
    if let Some(existing) = catalog.iter_mut().find(|p| p.id == id) {
        draft.apply_to(existing);
    } else {
        catalog.insert(0, draft.into_product(id));
    }
}

// =============================================================================
// Filtering
// =============================================================================

/// Price range selected in the catalog filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceBand {
    #[default]
    All,
    /// Inclusive on both ends.
    Between(Decimal, Decimal),
    AtLeast(Decimal),
}

impl PriceBand {
    /// Parse the filter value: `all`, `min-max` or `min+`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidPriceBand`] for anything else.
    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        let s = s.trim();
        let invalid = || CatalogError::InvalidPriceBand(s.to_owned());

        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        if let Some(min) = s.strip_suffix('+') {
            let min = Decimal::from_str(min.trim()).map_err(|_| invalid())?;
            return Ok(Self::AtLeast(min));
        }
        let (min, max) = s.split_once('-').ok_or_else(invalid)?;
        let min = Decimal::from_str(min.trim()).map_err(|_| invalid())?;
        let max = Decimal::from_str(max.trim()).map_err(|_| invalid())?;
        Ok(Self::Between(min, max))
    }

    #[must_use]
    pub fn contains(&self, price: Price) -> bool {
        let amount = price.amount();
        match *self {
            Self::All => true,
            Self::Between(min, max) => amount >= min && amount <= max,
            Self::AtLeast(min) => amount >= min,
        }
    }
}

impl FromStr for PriceBand {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Catalog filter. `None` (or the value `all`) disables a criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub price: PriceBand,
    pub color: Option<String>,
    pub size: Option<String>,
    pub query: Option<String>,
}

impl ProductFilter {
    /// Build a filter from raw query-string values.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidPriceBand`] for an unknown price range.
    pub fn from_params(
        category: Option<&str>,
        price: Option<&str>,
        color: Option<&str>,
        size: Option<&str>,
        query: Option<&str>,
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            category: criterion(category),
            price: price.map_or(Ok(PriceBand::All), PriceBand::parse)?,
            color: criterion(color),
            size: criterion(size),
            query: criterion(query),
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|c| product.category.eq_ignore_ascii_case(c));
        let color_ok = self
            .color
            .as_deref()
            .is_none_or(|c| product.colors.iter().any(|pc| pc.eq_ignore_ascii_case(c)));
        let size_ok = self
            .size
            .as_deref()
            .is_none_or(|s| product.sizes.iter().any(|ps| ps.eq_ignore_ascii_case(s)));
        let query_ok = self.query.as_deref().is_none_or(|q| {
            let q = q.to_lowercase();
            product.name.to_lowercase().contains(&q)
                || product.description.to_lowercase().contains(&q)
                || product.category.to_lowercase().contains(&q)
        });

        category_ok && self.price.contains(product.price) && color_ok && size_ok && query_ok
    }

    /// Keep the products matching every criterion, in their original order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

fn criterion(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
        .map(str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(id: &str, name: &str, cents: i64) -> Product {
        Product {
            id: ProductRef::new(id),
            name: name.to_owned(),
            price: Price::from_cents(cents),
            description: String::new(),
            image: String::new(),
            stock: 10,
            category: "Classic".to_owned(),
            colors: vec!["green".to_owned(), "black".to_owned()],
            sizes: vec!["US 7".to_owned()],
            rating: 4.5,
            reviews: Vec::new(),
        }
    }

    #[test]
    fn test_product_ref_accepts_number_or_string() {
        let from_number: ProductRef = serde_json::from_value(json!(3)).unwrap();
        let from_string: ProductRef = serde_json::from_value(json!(" 3 ")).unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.product_id(), Some(ProductId::new(3)));
        assert_eq!(ProductRef::new("local-17").product_id(), None);
    }

    #[test]
    fn test_parse_list_shapes() {
        assert_eq!(parse_list(&json!(["a", " b ", ""])), vec!["a", "b"]);
        assert_eq!(parse_list(&json!("[\"red\",\"blue\"]")), vec!["red", "blue"]);
        assert_eq!(parse_list(&json!("red, blue,,")), vec!["red", "blue"]);
        assert_eq!(parse_list(&json!("[not json")), vec!["[not json"]);
        assert!(parse_list(&Value::Null).is_empty());
    }

    #[test]
    fn test_raw_product_flat_record() {
        let raw: RawProduct = serde_json::from_value(json!({
            "id": 4,
            "name": "Sunset Orange Clog",
            "price": "52.5",
            "stock": "0",
            "colors": "orange, peach",
            "reviews": [{"user": "Nadia", "rating": 5, "comment": "Great"}, "junk"]
        }))
        .unwrap();
        let product = raw.normalize().unwrap();
        assert_eq!(product.id.as_str(), "4");
        assert_eq!(product.price, Price::from_cents(5250));
        assert_eq!(product.stock, 0);
        assert_eq!(product.category, DEFAULT_CATEGORY);
        assert_eq!(product.colors, vec!["orange", "peach"]);
        assert_eq!(product.reviews.len(), 1);
    }

    #[test]
    fn test_raw_product_wrapped_record() {
        let raw: RawProduct = serde_json::from_value(json!({
            "id": "rec42",
            "fields": {
                "name": "Ocean Blue Slide",
                "price": 37.5,
                "stock": 27.9,
                "image": [{"url": "https://img.example/ocean.png"}],
                "colors": "[\"#0ea5e9\"]"
            }
        }))
        .unwrap();
        let product = Product::try_from(raw).unwrap();
        assert_eq!(product.id.as_str(), "rec42");
        assert_eq!(product.stock, 27);
        assert_eq!(product.image, "https://img.example/ocean.png");
        assert_eq!(product.colors, vec!["#0ea5e9"]);
    }

    #[test]
    fn test_raw_product_garbage_numbers_default_to_zero() {
        let raw: RawProduct = serde_json::from_value(
            json!({"id": "x", "name": "Clog", "price": "cheap", "stock": null}),
        )
        .unwrap();
        let product = raw.normalize().unwrap();
        assert_eq!(product.price, Price::ZERO);
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn test_raw_product_rejects_values_the_store_refuses() {
        let normalize = |value: Value| {
            serde_json::from_value::<RawProduct>(value)
                .unwrap()
                .normalize()
        };

        assert_eq!(normalize(json!({"id": 1})), Err(CatalogError::NameRequired));
        assert_eq!(
            normalize(json!({"id": 2, "name": "Clog", "stock": -3})),
            Err(CatalogError::NegativeStock)
        );
        assert_eq!(
            normalize(json!({"id": 3, "name": "Clog", "price": "-5"})),
            Err(CatalogError::NegativePrice)
        );
        assert_eq!(
            normalize(json!({"id": 4, "name": "x".repeat(MAX_NAME_LENGTH + 1)})),
            Err(CatalogError::NameTooLong {
                max: MAX_NAME_LENGTH
            })
        );
        assert_eq!(
            normalize(json!({"id": 5, "name": "Clog", "stock": "1e12"})),
            Err(CatalogError::StockTooLarge)
        );
    }

    #[test]
    fn test_raw_product_requires_id() {
        let raw: RawProduct = serde_json::from_value(json!({"name": "No id"})).unwrap();
        assert_eq!(raw.normalize(), Err(CatalogError::MissingId));
    }

    #[test]
    fn test_merge_server_wins_and_local_only_first() {
        let server = vec![product("1", "Server One", 4999), product("2", "Two", 3999)];
        let local = vec![
            product("1", "Stale One", 100),
            product("local-9", "Offline", 2500),
        ];
        let merged = merge_catalogs(server, local);
        let ids: Vec<_> = merged.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["local-9", "1", "2"]);
        assert_eq!(merged.get(1).unwrap().name, "Server One");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let server = vec![product("1", "One", 4999), product("2", "Two", 3999)];
        let local = vec![product("3", "Three", 100), product("1", "Old", 1)];

        let once = merge_catalogs(server.clone(), local.clone());
        let twice = merge_catalogs(once.clone(), local);
        assert_eq!(once, twice);

        let self_merge = merge_catalogs(server.clone(), server.clone());
        assert_eq!(self_merge, server);
    }

    #[test]
    fn test_merge_collapses_duplicates() {
        let server = vec![
            product("1", "First", 100),
            product("2", "Two", 200),
            product("1", "Latest", 300),
        ];
        let merged = merge_catalogs(server, Vec::new());
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.first().unwrap().name, "Latest");
    }

    #[test]
    fn test_upsert_local() {
        let mut catalog = vec![product("1", "One", 100)];
        let draft = ProductInput {
            name: "  Renamed ".to_owned(),
            price: Price::from_cents(200),
            ..ProductInput::default()
        }
        .validate()
        .unwrap();

        upsert_local(&mut catalog, ProductRef::new("1"), draft.clone());
        assert_eq!(catalog.len(), 1);
        let first = catalog.first().unwrap();
        assert_eq!(first.name, "Renamed");
        assert!((first.rating - 4.5).abs() < f32::EPSILON);

        upsert_local(&mut catalog, ProductRef::new("local-2"), draft);
        assert_eq!(catalog.first().unwrap().id.as_str(), "local-2");
    }

    #[test]
    fn test_product_input_validation() {
        let input: ProductInput = serde_json::from_value(json!({
            "name": "Clog",
            "price": 10,
            "stock": 3,
            "colors": "green, blue",
            "sizes": ["US 6"]
        }))
        .unwrap();
        let draft = input.validate().unwrap();
        assert_eq!(draft.category, DEFAULT_CATEGORY);
        assert_eq!(draft.colors, vec!["green", "blue"]);

        let missing_name = ProductInput::default().validate();
        assert_eq!(missing_name, Err(CatalogError::NameRequired));

        let negative = ProductInput {
            name: "Clog".to_owned(),
            stock: -1,
            ..ProductInput::default()
        };
        assert_eq!(negative.validate(), Err(CatalogError::NegativeStock));

        let long = ProductInput {
            name: "x".repeat(MAX_NAME_LENGTH + 1),
            ..ProductInput::default()
        };
        assert!(matches!(
            long.validate(),
            Err(CatalogError::NameTooLong { .. })
        ));
    }

    #[test]
    fn test_price_band_parse_and_bounds() {
        let band = PriceBand::parse("30-50").unwrap();
        assert!(band.contains(Price::from_cents(3000)));
        assert!(band.contains(Price::from_cents(5000)));
        assert!(!band.contains(Price::from_cents(5001)));

        let over = PriceBand::parse("50+").unwrap();
        assert!(over.contains(Price::from_cents(5000)));
        assert!(!over.contains(Price::from_cents(4999)));

        assert_eq!(PriceBand::parse("all").unwrap(), PriceBand::All);
        assert!(PriceBand::parse("cheap").is_err());
    }

    #[test]
    fn test_filter_apply() {
        let mut sport = product("2", "Sport Navy Clog", 5999);
        sport.category = "Sport".to_owned();
        sport.colors = vec!["navy".to_owned()];
        let products = vec![product("1", "Classic Green Clog", 4999), sport];

        let by_category =
            ProductFilter::from_params(Some("sport"), None, None, None, None).unwrap();
        assert_eq!(by_category.apply(&products).len(), 1);

        let by_price =
            ProductFilter::from_params(Some("all"), Some("0-50"), None, None, None).unwrap();
        let names: Vec<_> = by_price.apply(&products).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Classic Green Clog"]);

        let by_color = ProductFilter::from_params(None, None, Some("NAVY"), None, None).unwrap();
        assert_eq!(by_color.apply(&products).len(), 1);

        let by_query = ProductFilter::from_params(None, None, None, None, Some("clog")).unwrap();
        assert_eq!(by_query.apply(&products).len(), 2);

        assert!(ProductFilter::from_params(None, Some("all"), None, None, None)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_stock_flags() {
        let mut p = product("1", "One", 100);
        assert!(p.is_in_stock());
        assert!(!p.is_low_stock());
        p.stock = 0;
        assert!(!p.is_in_stock());
        assert!(p.is_low_stock());
    }

    #[test]
    fn test_product_serializes_camel_case_with_string_id() {
        let json = serde_json::to_value(product("7", "Forest Trek Clog", 6399)).unwrap();
        assert_eq!(json["id"], "7");
        assert!(json.get("_id").is_none());
        assert_eq!(json["price"], "63.99");
        assert!(json.get("colors").is_some());

        let mut legacy = json;
        let id = legacy.as_object_mut().unwrap().remove("id").unwrap();
        legacy["_id"] = id;
        let back: Product = serde_json::from_value(legacy).unwrap();
        assert_eq!(back.id.as_str(), "7");
    }
}
