mod health;
mod index;
mod products;
mod reports;
mod sales;

use axum::{Router, routing::get};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index::api_descriptor))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/api/sales", get(sales::list_sales).post(sales::create_sale))
        .route("/api/reports/inventory-stats", get(reports::inventory_stats))
        .fallback(index::route_not_found)
        .method_not_allowed_fallback(index::route_not_found)
}
