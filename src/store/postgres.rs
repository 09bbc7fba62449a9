use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::InventoryStore;
use crate::{
    database,
    error::Result,
    models::{NewProduct, Product, ProductChanges, Sale},
    queries::{product_queries, sale_queries},
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryStore for PgStore {
    fn backend_name(&self) -> &'static str {
        "PostgreSQL"
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        product_queries::find_all(&self.pool).await
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>> {
        product_queries::find_by_id(&self.pool, id).await
    }

    async fn find_product_by_sku(&self, sku: &str) -> Result<Option<Product>> {
        product_queries::find_by_sku(&self.pool, sku).await
    }

    async fn create_product(&self, new: NewProduct) -> Result<Product> {
        product_queries::create_product(&self.pool, new).await
    }

    async fn update_product(&self, id: Uuid, changes: ProductChanges) -> Result<Option<Product>> {
        product_queries::update_product(&self.pool, id, &changes).await
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool> {
        let deleted = product_queries::delete_product(&self.pool, id).await?;
        Ok(deleted > 0)
    }

    async fn list_sales(&self) -> Result<Vec<Sale>> {
        sale_queries::find_all(&self.pool).await
    }

    async fn record_sale(&self, product_id: Uuid, quantity: i32) -> Result<(Sale, Product)> {
        sale_queries::record_sale(&self.pool, product_id, quantity).await
    }

    async fn ping(&self) -> Result<()> {
        database::check_health(&self.pool).await
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}
