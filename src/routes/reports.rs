use axum::{Json, extract::State};

use crate::{AppState, error::Result, models::InventoryStats, services::stats};

pub async fn inventory_stats(State(state): State<AppState>) -> Result<Json<InventoryStats>> {
    let stats = stats::inventory_stats(state.store.as_ref()).await?;

    Ok(Json(stats))
}
