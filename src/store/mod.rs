//! The explicit store handle shared by every request.
//!
//! A store is built once at startup by [`connect`], cloned into the router
//! state as an `Arc`, and closed when the server shuts down.

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::{
    config::{AppConfig, StorageBackend},
    database,
    error::Result,
    models::{NewProduct, Product, ProductChanges, Sale},
};

#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Human readable backend name, reported by the API descriptor.
    fn backend_name(&self) -> &'static str;

    /// Newest first.
    async fn list_products(&self) -> Result<Vec<Product>>;

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>>;

    /// Case-insensitive lookup.
    async fn find_product_by_sku(&self, sku: &str) -> Result<Option<Product>>;

    /// Fails with `Conflict` when the sku is taken.
    async fn create_product(&self, new: NewProduct) -> Result<Product>;

    /// `None` when no product has this id. Fails with `Conflict` when the
    /// new sku belongs to another product.
    async fn update_product(&self, id: Uuid, changes: ProductChanges) -> Result<Option<Product>>;

    /// Returns whether a product was removed. Sales referencing it are kept.
    async fn delete_product(&self, id: Uuid) -> Result<bool>;

    /// Newest first.
    async fn list_sales(&self) -> Result<Vec<Sale>>;

    /// Atomically checks stock, decrements it and appends the sale. Either
    /// both writes happen or neither does.
    async fn record_sale(&self, product_id: Uuid, quantity: i32) -> Result<(Sale, Product)>;

    async fn ping(&self) -> Result<()>;

    async fn close(&self);
}

pub type SharedStore = Arc<dyn InventoryStore>;

pub async fn connect(config: &AppConfig) -> Result<SharedStore> {
    match config.storage {
        StorageBackend::Postgres => {
            let pool = database::create_pool(&config.database).await?;
            Ok(Arc::new(PgStore::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
