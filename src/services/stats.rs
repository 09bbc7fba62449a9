use rust_decimal::Decimal;

use crate::{
    error::{AppError, Result},
    models::{InventoryStats, Product},
    store::InventoryStore,
};

pub fn summarize(products: &[Product]) -> Result<InventoryStats> {
    let mut total_inventory_value = Decimal::ZERO;
    for product in products {
        total_inventory_value = total_inventory_value
            .checked_add(product.inventory_value()?)
            .ok_or_else(|| AppError::InternalError("Inventory value overflowed".to_string()))?;
    }

    Ok(InventoryStats {
        total_products: products.len(),
        total_inventory_value,
        low_stock_count: products.iter().filter(|p| p.is_low_stock()).count(),
    })
}

/// Recomputed from a full catalog scan on every call.
pub async fn inventory_stats(store: &dyn InventoryStore) -> Result<InventoryStats> {
    let products = store.list_products().await?;
    summarize(&products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::NewProduct,
        store::{InventoryStore, MemoryStore},
    };

    fn product(stock: i32, price: Decimal, low_stock_alert: i32) -> Product {
        Product::from_new(NewProduct {
            name: "Item".to_string(),
            sku: format!("SKU-{}-{}", stock, low_stock_alert),
            stock,
            price,
            low_stock_alert,
        })
    }

    #[test]
    fn empty_catalog_is_all_zero() {
        let stats = summarize(&[]).unwrap();

        assert_eq!(stats.total_products, 0);
        assert_eq!(stats.total_inventory_value, Decimal::ZERO);
        assert_eq!(stats.low_stock_count, 0);
    }

    #[test]
    fn sums_value_and_counts_low_stock() {
        let products = vec![
            product(5, Decimal::from(100), 10),
            product(20, Decimal::new(250, 2), 10),
            product(10, Decimal::from(3), 10),
            product(0, Decimal::from(999), 0),
        ];

        let stats = summarize(&products).unwrap();

        assert_eq!(stats.total_products, 4);
        // 500 + 50 + 30 + 0
        assert_eq!(stats.total_inventory_value, Decimal::from(580));
        assert_eq!(stats.low_stock_count, 3);
    }

    #[test]
    fn overflowing_value_is_an_error_not_a_panic() {
        let products = vec![
            product(1_000_000_000, Decimal::MAX, 10),
            product(5, Decimal::from(100), 10),
        ];

        let err = summarize(&products).unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));

        let products = vec![
            product(1, Decimal::MAX, 10),
            product(1, Decimal::MAX, 1),
        ];
        assert!(matches!(summarize(&products), Err(AppError::InternalError(_))));
    }

    #[tokio::test]
    async fn stats_over_store_report_overflow() {
        let store = MemoryStore::new();
        store
            .create_product(NewProduct {
                name: "Ingot".to_string(),
                sku: "I-1".to_string(),
                stock: 1_000_000_000,
                price: Decimal::MAX,
                low_stock_alert: 10,
            })
            .await
            .unwrap();

        let err = inventory_stats(&store).await.unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));
    }
}
