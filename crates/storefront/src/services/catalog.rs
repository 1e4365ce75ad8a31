//! Cached product listing.
//!
//! The public catalog is read on every page load, so the full list is kept in
//! memory for a minute. Every admin write invalidates it.
//!
//! Entries are keyed by a generation number that each invalidation bumps. A
//! reader that started loading before an admin write stores its list under
//! the old generation, where no later reader looks.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::debug;

use crocs_rwanda_core::catalog::Product;

use crate::db::{ProductRepository, RepositoryError};

const CATALOG_TTL: Duration = Duration::from_secs(60);

/// In-memory copy of the product list.
#[derive(Clone)]
pub struct ProductCatalog {
    cache: Cache<u64, Arc<Vec<Product>>>,
    generation: Arc<AtomicU64>,
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductCatalog {
    #[must_use]
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(2)
            .time_to_live(CATALOG_TTL)
            .build();
        Self {
            cache,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// All products, from memory when fresh.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the list has to be reloaded and the query fails.
    pub async fn products(&self, pool: &PgPool) -> Result<Arc<Vec<Product>>, RepositoryError> {
        let generation = self.generation();
        if let Some(products) = self.cache.get(&generation).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products = Arc::new(ProductRepository::new(pool).list().await?);
        self.store(generation, Arc::clone(&products)).await;
        Ok(products)
    }

    /// Drop the cached list so the next read hits the database.
    pub async fn invalidate(&self) {
        let stale = self.generation.fetch_add(1, Ordering::AcqRel);
        self.cache.invalidate(&stale).await;
    }

    /// Whether a list is currently cached.
    pub async fn is_cached(&self) -> bool {
        self.cache.get(&self.generation()).await.is_some()
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    async fn store(&self, generation: u64, products: Arc<Vec<Product>>) {
        self.cache.insert(generation, products).await;
    }

    #[cfg(test)]
    pub(crate) async fn prime(&self, products: Vec<Product>) {
        self.store(self.generation(), Arc::new(products)).await;
    }
}
