use axum::{Json, extract::State};

use crate::{
    AppState,
    error::Result,
    models::{Sale, SaleOutcome, SaleRequest},
    services::sales,
    utils::extractors::JsonBody,
};

pub async fn list_sales(State(state): State<AppState>) -> Result<Json<Vec<Sale>>> {
    let sales = state.store.list_sales().await?;

    Ok(Json(sales))
}

pub async fn create_sale(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SaleRequest>,
) -> Result<Json<SaleOutcome>> {
    let outcome = sales::process_sale(state.store.as_ref(), payload).await?;

    Ok(Json(outcome))
}
