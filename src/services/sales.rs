use crate::{
    error::Result,
    models::{SaleOutcome, SaleRequest, parse_product_id},
    store::InventoryStore,
};

/// Validates a sale request, commits it against the store and reports
/// whether the product has dropped to its low-stock threshold.
pub async fn process_sale(store: &dyn InventoryStore, request: SaleRequest) -> Result<SaleOutcome> {
    let request = request.validate()?;
    let product_id = parse_product_id(&request.product_id)?;

    let (sale, product) = store.record_sale(product_id, request.quantity).await?;
    let low_stock_alert = product.is_low_stock();

    tracing::info!(
        "Sold {} x {} ({}), {} left",
        sale.quantity,
        sale.product_sku,
        sale.product_id,
        sale.remaining_stock
    );

    if low_stock_alert {
        tracing::warn!(
            "Product {} is low on stock: {} left, alert at {}",
            product.sku,
            product.stock,
            product.low_stock_alert
        );
    }

    Ok(SaleOutcome {
        sale,
        product,
        low_stock_alert,
    })
}
