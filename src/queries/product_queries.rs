use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{NewProduct, Product, ProductChanges, sku_key},
};

pub async fn find_all(pool: &PgPool) -> Result<Vec<Product>> {
    let products =
        sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at DESC, id")
            .fetch_all(pool)
            .await?;

    Ok(products)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

pub async fn find_by_sku(pool: &PgPool, sku: &str) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE LOWER(sku) = $1")
        .bind(sku_key(sku))
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

pub async fn create_product(pool: &PgPool, new: NewProduct) -> Result<Product> {
    let product = Product::from_new(new);

    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (id, name, sku, stock, price, low_stock_alert, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(product.id)
    .bind(&product.name)
    .bind(&product.sku)
    .bind(product.stock)
    .bind(product.price)
    .bind(product.low_stock_alert)
    .bind(product.created_at)
    .fetch_one(pool)
    .await
    .map_err(sku_conflict)?;

    Ok(product)
}

pub async fn update_product(
    pool: &PgPool,
    id: Uuid,
    changes: &ProductChanges,
) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET
            name = COALESCE($1, name),
            sku = COALESCE($2, sku),
            stock = COALESCE($3, stock),
            price = COALESCE($4, price),
            low_stock_alert = COALESCE($5, low_stock_alert)
        WHERE id = $6
        RETURNING *
        "#,
    )
    .bind(&changes.name)
    .bind(&changes.sku)
    .bind(changes.stock)
    .bind(changes.price)
    .bind(changes.low_stock_alert)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(sku_conflict)?;

    Ok(product)
}

pub async fn delete_product(pool: &PgPool, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// A write that lost the race against the pre-check still reports a
/// duplicate sku instead of a bare database error.
fn sku_conflict(err: sqlx::Error) -> AppError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("SKU already exists".to_string())
        }
        _ => AppError::DatabaseError(err),
    }
}
