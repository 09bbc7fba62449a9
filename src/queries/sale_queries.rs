use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{Product, Sale},
};

pub async fn find_all(pool: &PgPool) -> Result<Vec<Sale>> {
    let sales = sqlx::query_as::<_, Sale>("SELECT * FROM sales ORDER BY \"timestamp\" DESC, id")
        .fetch_all(pool)
        .await?;

    Ok(sales)
}

/// Decrements stock and appends the ledger entry in one transaction.
///
/// The product row stays locked until commit, so concurrent sales of the
/// same product are checked one after another and cannot oversell.
pub async fn record_sale(pool: &PgPool, product_id: Uuid, quantity: i32) -> Result<(Sale, Product)> {
    let mut tx = pool.begin().await?;

    let mut product =
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1 FOR UPDATE")
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let sale = product.sell(quantity)?;

    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET stock = $1 WHERE id = $2 RETURNING *",
    )
    .bind(product.stock)
    .bind(product.id)
    .fetch_one(&mut *tx)
    .await?;

    let sale = sqlx::query_as::<_, Sale>(
        r#"
        INSERT INTO sales (
            id, product_id, product_name, product_sku, quantity,
            price_per_unit, total_price, remaining_stock, "timestamp"
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(sale.id)
    .bind(sale.product_id)
    .bind(&sale.product_name)
    .bind(&sale.product_sku)
    .bind(sale.quantity)
    .bind(sale.price_per_unit)
    .bind(sale.total_price)
    .bind(sale.remaining_stock)
    .bind(sale.timestamp)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok((sale, product))
}
