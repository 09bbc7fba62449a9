use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::Product,
    utils::lenient::optional_number,
};

/// One committed ledger entry. Product fields are copied at sale time and
/// never follow later edits; `product_id` may outlive the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub product_sku: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_per_unit: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub remaining_stock: i32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SaleRequest {
    pub product_id: Option<String>,
    #[serde(default, deserialize_with = "optional_number")]
    pub quantity: Option<i32>,
}

/// A sale request with a positive quantity. The product id stays textual
/// until it is resolved against the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSale {
    pub product_id: String,
    pub quantity: i32,
}

impl SaleRequest {
    pub fn validate(self) -> Result<ValidSale> {
        let invalid = || AppError::BadRequest("Valid product ID and quantity required".to_string());

        let product_id = self
            .product_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(invalid)?;

        let quantity = self.quantity.filter(|q| *q > 0).ok_or_else(invalid)?;

        Ok(ValidSale {
            product_id,
            quantity,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleOutcome {
    pub sale: Sale,
    pub product: Product,
    pub low_stock_alert: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn validate(value: serde_json::Value) -> Result<ValidSale> {
        serde_json::from_value::<SaleRequest>(value).unwrap().validate()
    }

    #[test]
    fn accepts_positive_quantity() {
        let sale = validate(json!({ "productId": "abc", "quantity": "3" })).unwrap();
        assert_eq!(
            sale,
            ValidSale {
                product_id: "abc".to_string(),
                quantity: 3,
            }
        );
    }

    #[test]
    fn rejects_missing_zero_and_negative_quantity() {
        for body in [
            json!({ "productId": "abc" }),
            json!({ "productId": "abc", "quantity": 0 }),
            json!({ "productId": "abc", "quantity": -4 }),
            json!({ "quantity": 1 }),
            json!({ "productId": " ", "quantity": 1 }),
        ] {
            let err = validate(body).unwrap_err();
            assert!(
                matches!(err, AppError::BadRequest(ref msg) if msg == "Valid product ID and quantity required")
            );
        }
    }
}
