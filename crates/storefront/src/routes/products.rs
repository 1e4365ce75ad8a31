//! Product route handlers.
//!
//! Listing and detail are public; create, update and delete need an admin
//! session and invalidate the cached catalog.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crocs_rwanda_core::ProductId;
use crocs_rwanda_core::catalog::{Product, ProductFilter, ProductInput};

use super::{MessageResponse, parse_id};
use crate::db::ProductRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Catalog filter query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub price: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub q: Option<String>,
}

impl ProductQuery {
    fn to_filter(&self) -> std::result::Result<ProductFilter, AppError> {
        Ok(ProductFilter::from_params(
            self.category.as_deref(),
            self.price.as_deref(),
            self.color.as_deref(),
            self.size.as_deref(),
            self.q.as_deref(),
        )?)
    }
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub product: Product,
}

fn product_id(raw: &str) -> Result<ProductId> {
    parse_id(raw, "Product not found.")
}

/// List products, optionally filtered.
///
/// GET /api/products
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ProductsResponse>> {
    let filter = query.to_filter()?;
    let products = state.catalog().products(state.pool()).await?;

    let products = if filter.is_empty() {
        products.as_ref().clone()
    } else {
        filter.apply(&products).into_iter().cloned().collect()
    };

    Ok(Json(ProductsResponse { products }))
}

/// Show one product.
///
/// GET /api/products/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>> {
    let id = product_id(&id)?;
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found.".to_string()))?;

    Ok(Json(ProductResponse { product }))
}

/// Create a product.
///
/// POST /api/products
#[instrument(skip(state, payload))]
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProductInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    let Json(input) = payload?;
    let draft = input.validate()?;

    let product = ProductRepository::new(state.pool()).create(&draft).await?;
    state.catalog().invalidate().await;
    add_breadcrumb("admin", "Created product", Some(&[("product_id", product.id.as_str())]));

    Ok((StatusCode::CREATED, Json(ProductResponse { product })))
}

/// Update a product.
///
/// PUT /api/products/{id}
#[instrument(skip(state, payload))]
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<ProductResponse>> {
    let id = product_id(&id)?;
    let Json(input) = payload?;
    let draft = input.validate()?;

    let product = ProductRepository::new(state.pool())
        .update(id, &draft)
        .await
        .map_err(not_found)?;
    state.catalog().invalidate().await;

    Ok(Json(ProductResponse { product }))
}

/// Delete a product.
///
/// DELETE /api/products/{id}
#[instrument(skip(state))]
pub async fn destroy(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = product_id(&id)?;

    ProductRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found)?;
    state.catalog().invalidate().await;
    let id = id.to_string();
    add_breadcrumb("admin", "Deleted product", Some(&[("product_id", id.as_str())]));

    Ok(Json(MessageResponse::new("Product deleted.")))
}

fn not_found(err: crate::db::RepositoryError) -> AppError {
    match err {
        crate::db::RepositoryError::NotFound => AppError::NotFound("Product not found.".to_string()),
        other => other.into(),
    }
}
