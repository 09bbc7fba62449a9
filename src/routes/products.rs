use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{CreateProductRequest, Product, UpdateProductRequest, parse_product_id, sku_key},
    utils::extractors::JsonBody,
};

fn not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}

fn duplicate_sku() -> AppError {
    AppError::Conflict("SKU already exists".to_string())
}

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state.store.list_products().await?;

    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id = parse_product_id(&id)?;

    let product = state.store.find_product(id).await?.ok_or_else(not_found)?;

    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    let new = payload.validate()?;

    if state.store.find_product_by_sku(&new.sku).await?.is_some() {
        return Err(duplicate_sku());
    }

    let product = state.store.create_product(new).await?;
    tracing::info!("Created product {} ({})", product.sku, product.id);

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateProductRequest>,
) -> Result<Json<Product>> {
    let id = parse_product_id(&id)?;
    let changes = payload.validate()?;

    let current = state.store.find_product(id).await?.ok_or_else(not_found)?;

    if let Some(ref sku) = changes.sku {
        if sku_key(sku) != sku_key(&current.sku) {
            if let Some(existing) = state.store.find_product_by_sku(sku).await? {
                if existing.id != id {
                    return Err(duplicate_sku());
                }
            }
        }
    }

    let product = state
        .store
        .update_product(id, changes)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_product_id(&id)?;

    if !state.store.delete_product(id).await? {
        return Err(not_found());
    }

    tracing::info!("Deleted product {}", id);

    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
