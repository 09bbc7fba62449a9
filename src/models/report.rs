use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_products: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_inventory_value: Decimal,
    pub low_stock_count: usize,
}
