use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::{Value, json};

use crate::AppState;

pub async fn api_descriptor(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Inventory & Sales Manager API",
        "status": "Running",
        "database": state.store.backend_name(),
        "endpoints": {
            "products": "/api/products",
            "sales": "/api/sales",
            "stats": "/api/reports/inventory-stats"
        }
    }))
}

pub async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Route not found" })),
    )
}
