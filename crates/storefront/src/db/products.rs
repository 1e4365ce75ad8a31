//! Database operations for catalog products.

use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;

use crocs_rwanda_core::catalog::{Product, ProductDraft, Review};
use crocs_rwanda_core::{Price, ProductId};

use super::RepositoryError;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    price: Price,
    description: String,
    image: String,
    stock: i32,
    category: String,
    colors: Vec<String>,
    sizes: Vec<String>,
    rating: f32,
    reviews: Json<Vec<Review>>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id).into(),
            name: row.name,
            price: row.price,
            description: row.description,
            image: row.image,
            stock: row.stock,
            category: row.category,
            colors: row.colors,
            sizes: row.sizes,
            rating: row.rating,
            reviews: row.reviews.0,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, price, description, image, stock, category, \
                               colors, sizes, rating, reviews";

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every product in catalog order (oldest first).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Insert a validated product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(&format!(
            r"
            INSERT INTO storefront.product
                (name, price, description, image, stock, category, colors, sizes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&draft.name)
        .bind(draft.price)
        .bind(&draft.description)
        .bind(&draft.image)
        .bind(draft.stock)
        .bind(&draft.category)
        .bind(&draft.colors)
        .bind(&draft.sizes)
        .fetch_one(self.pool)
        .await?;

        tracing::info!(product_id = row.id, "Product created");
        Ok(row.into())
    }

    /// Replace the editable fields of a product. Rating and reviews are kept.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            r"
            UPDATE storefront.product
            SET name = $2, price = $3, description = $4, image = $5,
                stock = $6, category = $7, colors = $8, sizes = $9
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&draft.name)
        .bind(draft.price)
        .bind(&draft.description)
        .bind(&draft.image)
        .bind(draft.stock)
        .bind(&draft.category)
        .bind(&draft.colors)
        .bind(&draft.sizes)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM storefront.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        tracing::info!("Product deleted");
        Ok(())
    }

    /// Load a batch of catalog records in one transaction.
    ///
    /// Source ids are not kept; every record gets a new id. With `replace`
    /// the existing catalog is removed first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing is
    /// written in that case.
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub async fn import(&self, products: &[Product], replace: bool) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if replace {
            let removed = sqlx::query("DELETE FROM storefront.product")
                .execute(&mut *tx)
                .await?
                .rows_affected();
            tracing::info!(removed, "Cleared existing catalog");
        }

        let mut inserted = 0u64;
        for product in products {
            sqlx::query(
                r"
                INSERT INTO storefront.product
                    (name, price, description, image, stock, category, colors, sizes, rating, reviews)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ",
            )
            .bind(&product.name)
            .bind(product.price)
            .bind(&product.description)
            .bind(&product.image)
            .bind(product.stock)
            .bind(&product.category)
            .bind(&product.colors)
            .bind(&product.sizes)
            .bind(product.rating)
            .bind(Json(&product.reviews))
            .execute(&mut *tx)
            .await?;
            inserted += 1;
        }

        tx.commit().await?;
        Ok(inserted)
    }
}
