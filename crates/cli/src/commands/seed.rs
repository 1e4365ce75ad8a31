//! Seed the catalog from a JSON export.
//!
//! The file holds an array of product records, or an object with a
//! `products` or `records` array. Records may be flat or wrapped in a
//! `fields` object and are normalised the same way the storefront reads
//! loose catalog data. Records without a usable id, or whose name, price
//! or stock the product table would refuse, are skipped with a warning.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crocs_rwanda_core::catalog::{Product, RawProduct};
use crocs_rwanda_storefront::db::{self, ProductRepository, RepositoryError};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Missing environment variable: STOREFRONT_DATABASE_URL")]
    MissingDatabaseUrl,

    #[error("Cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No valid product records in file")]
    Empty,

    #[error("Database connection error: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("Import failed: {0}")]
    Import(#[from] RepositoryError),
}

/// Accepted catalog file layouts.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<RawProduct>),
    Products { products: Vec<RawProduct> },
    Records { records: Vec<RawProduct> },
}

impl CatalogFile {
    fn into_records(self) -> Vec<RawProduct> {
        match self {
            Self::List(records)
            | Self::Products { products: records }
            | Self::Records { records } => records,
        }
    }
}

/// Parse and normalise catalog records, skipping unusable ones.
///
/// Returns the products alongside the number of skipped records.
fn parse_catalog(content: &str) -> Result<(Vec<Product>, usize), SeedError> {
    let records = serde_json::from_str::<CatalogFile>(content)?.into_records();

    let mut products = Vec::with_capacity(records.len());
    let mut skipped = 0;
    for (index, record) in records.into_iter().enumerate() {
        match record.normalize() {
            Ok(product) => products.push(product),
            Err(e) => {
                warn!(record = index + 1, error = %e, "Skipping product record");
                skipped += 1;
            }
        }
    }
    Ok((products, skipped))
}

/// Import products from `file`.
///
/// # Arguments
///
/// * `file` - Path to the JSON export
/// * `replace` - If true, delete the existing catalog first
///
/// # Errors
///
/// Returns `SeedError` if the file cannot be read or parsed, holds no usable
/// records, or the import fails. Nothing is written on failure.
pub async fn products(file: &Path, replace: bool) -> Result<(), SeedError> {
    // Read and validate before connecting to database
    let content = tokio::fs::read_to_string(file)
        .await
        .map_err(|source| SeedError::Read {
            path: file.display().to_string(),
            source,
        })?;
    let (products, skipped) = parse_catalog(&content)?;
    if products.is_empty() {
        return Err(SeedError::Empty);
    }
    info!(valid = products.len(), skipped, "Parsed catalog");

    let database_url = super::database_url().ok_or(SeedError::MissingDatabaseUrl)?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let inserted = ProductRepository::new(&pool)
        .import(&products, replace)
        .await?;

    info!(inserted, replace, "Seeding complete!");
    Ok(())
}
