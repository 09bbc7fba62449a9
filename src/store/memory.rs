use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::InventoryStore;
use crate::{
    error::{AppError, Result},
    models::{NewProduct, Product, ProductChanges, Sale, sku_key},
};

/// Process-local store. Every write holds the lock for its whole
/// read-check-write sequence.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inventory>,
}

#[derive(Default)]
struct Inventory {
    // insertion order
    products: Vec<Product>,
    sales: Vec<Sale>,
}

impl Inventory {
    fn sku_taken(&self, sku: &str, except: Option<Uuid>) -> bool {
        let key = sku_key(sku);
        self.products
            .iter()
            .any(|p| Some(p.id) != except && sku_key(&p.sku) == key)
    }

    fn product_mut(&mut self, id: Uuid) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T: Clone, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Vec<T> {
    let mut items: Vec<T> = items.iter().rev().cloned().collect();
    items.sort_by(|a, b| key(b).cmp(&key(a)));
    items
}

fn duplicate_sku() -> AppError {
    AppError::Conflict("SKU already exists".to_string())
}

#[async_trait]
impl InventoryStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "in-memory"
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let inventory = self.inner.read().await;
        Ok(newest_first(&inventory.products, |p| p.created_at))
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>> {
        let inventory = self.inner.read().await;
        Ok(inventory.products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_product_by_sku(&self, sku: &str) -> Result<Option<Product>> {
        let key = sku_key(sku);
        let inventory = self.inner.read().await;
        Ok(inventory
            .products
            .iter()
            .find(|p| sku_key(&p.sku) == key)
            .cloned())
    }

    async fn create_product(&self, new: NewProduct) -> Result<Product> {
        let mut inventory = self.inner.write().await;

        if inventory.sku_taken(&new.sku, None) {
            return Err(duplicate_sku());
        }

        let product = Product::from_new(new);
        inventory.products.push(product.clone());

        Ok(product)
    }

    async fn update_product(&self, id: Uuid, changes: ProductChanges) -> Result<Option<Product>> {
        let mut inventory = self.inner.write().await;

        if let Some(ref sku) = changes.sku {
            if inventory.sku_taken(sku, Some(id)) {
                return Err(duplicate_sku());
            }
        }

        Ok(inventory.product_mut(id).map(|product| {
            product.apply_changes(&changes);
            product.clone()
        }))
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool> {
        let mut inventory = self.inner.write().await;
        let before = inventory.products.len();
        inventory.products.retain(|p| p.id != id);
        Ok(inventory.products.len() < before)
    }

    async fn list_sales(&self) -> Result<Vec<Sale>> {
        let inventory = self.inner.read().await;
        Ok(newest_first(&inventory.sales, |s| s.timestamp))
    }

    async fn record_sale(&self, product_id: Uuid, quantity: i32) -> Result<(Sale, Product)> {
        let mut inventory = self.inner.write().await;

        let product = inventory
            .product_mut(product_id)
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let sale = product.sell(quantity)?;
        let product = product.clone();
        inventory.sales.push(sale.clone());

        Ok((sale, product))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use super::*;

    fn new_product(sku: &str, stock: i32) -> NewProduct {
        NewProduct {
            name: format!("Product {}", sku),
            sku: sku.to_string(),
            stock,
            price: Decimal::from(10),
            low_stock_alert: 2,
        }
    }

    #[tokio::test]
    async fn lists_newest_product_first() {
        let store = MemoryStore::new();
        let first = store.create_product(new_product("A", 1)).await.unwrap();
        let second = store.create_product(new_product("B", 1)).await.unwrap();

        let ids: Vec<Uuid> = store
            .list_products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();

        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn sku_is_unique_ignoring_case() {
        let store = MemoryStore::new();
        store.create_product(new_product("abc-1", 1)).await.unwrap();

        let err = store.create_product(new_product("ABC-1", 1)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let found = store.find_product_by_sku("Abc-1").await.unwrap();
        assert_eq!(found.map(|p| p.sku), Some("abc-1".to_string()));
    }

    #[tokio::test]
    async fn update_may_keep_own_sku_but_not_take_anothers() {
        let store = MemoryStore::new();
        let a = store.create_product(new_product("A", 1)).await.unwrap();
        store.create_product(new_product("B", 1)).await.unwrap();

        let renamed = store
            .update_product(
                a.id,
                ProductChanges {
                    sku: Some("a".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.sku, "a");

        let err = store
            .update_product(
                a.id,
                ProductChanges {
                    sku: Some("b".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let missing = store
            .update_product(Uuid::new_v4(), ProductChanges::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn failed_sale_changes_nothing() {
        let store = MemoryStore::new();
        let product = store.create_product(new_product("A", 2)).await.unwrap();

        let err = store.record_sale(product.id, 5).await.unwrap_err();

        assert!(matches!(err, AppError::InsufficientStock { .. }));
        assert_eq!(store.find_product(product.id).await.unwrap().unwrap().stock, 2);
        assert!(store.list_sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn overflowing_sale_writes_nothing() {
        let store = MemoryStore::new();
        let product = store
            .create_product(NewProduct {
                price: Decimal::MAX,
                ..new_product("A", 1_000_000_000)
            })
            .await
            .unwrap();

        let err = store.record_sale(product.id, 1_000_000_000).await.unwrap_err();

        assert!(matches!(err, AppError::InternalError(_)));
        assert_eq!(
            store.find_product(product.id).await.unwrap().unwrap().stock,
            1_000_000_000
        );
        assert!(store.list_sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_sales_never_oversell() {
        let store = Arc::new(MemoryStore::new());
        let product = store.create_product(new_product("A", 10)).await.unwrap();

        let handles: Vec<_> = (0..25)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.record_sale(product.id, 1).await })
            })
            .collect();

        let mut committed = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                committed += 1;
            }
        }

        assert_eq!(committed, 10);
        assert_eq!(store.find_product(product.id).await.unwrap().unwrap().stock, 0);
        assert_eq!(store.list_sales().await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn deleting_a_product_keeps_its_sales() {
        let store = MemoryStore::new();
        let product = store.create_product(new_product("A", 3)).await.unwrap();
        store.record_sale(product.id, 1).await.unwrap();

        assert!(store.delete_product(product.id).await.unwrap());
        assert!(!store.delete_product(product.id).await.unwrap());

        let sales = store.list_sales().await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].product_id, product.id);
    }
}
