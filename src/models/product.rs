use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::Sale,
    utils::lenient::optional_number,
};

/// Upper bound for a unit price; keeps `price * i32::MAX` inside `Decimal`.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub stock: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub low_stock_alert: i32,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn from_new(new: NewProduct) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            sku: new.sku,
            stock: new.stock,
            price: new.price,
            low_stock_alert: new.low_stock_alert,
            created_at: Utc::now(),
        }
    }

    /// Stock at or below the product's own threshold counts as low.
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_alert
    }

    pub fn inventory_value(&self) -> Result<Decimal> {
        line_total(self.price, self.stock)
    }

    /// Takes `quantity` units out of stock and returns the ledger entry for
    /// it. Leaves the product untouched when the sale cannot be honoured.
    pub fn sell(&mut self, quantity: i32) -> Result<Sale> {
        if quantity <= 0 {
            return Err(AppError::BadRequest(
                "Valid product ID and quantity required".to_string(),
            ));
        }

        if self.stock < quantity {
            return Err(AppError::InsufficientStock {
                available: self.stock,
                requested: quantity,
            });
        }

        let total_price = line_total(self.price, quantity)?;
        self.stock -= quantity;

        Ok(Sale {
            id: Uuid::new_v4(),
            product_id: self.id,
            product_name: self.name.clone(),
            product_sku: self.sku.clone(),
            quantity,
            price_per_unit: self.price,
            total_price,
            remaining_stock: self.stock,
            timestamp: Utc::now(),
        })
    }

    pub fn apply_changes(&mut self, changes: &ProductChanges) {
        if let Some(ref name) = changes.name {
            self.name = name.clone();
        }
        if let Some(ref sku) = changes.sku {
            self.sku = sku.clone();
        }
        if let Some(stock) = changes.stock {
            self.stock = stock;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(low_stock_alert) = changes.low_stock_alert {
            self.low_stock_alert = low_stock_alert;
        }
    }
}

/// SKUs are unique regardless of letter case.
pub fn sku_key(sku: &str) -> String {
    sku.trim().to_lowercase()
}

fn line_total(price: Decimal, quantity: i32) -> Result<Decimal> {
    price.checked_mul(Decimal::from(quantity)).ok_or_else(|| {
        AppError::InternalError(format!("Amount overflowed: {} x {}", price, quantity))
    })
}

/// A malformed id cannot name any stored product.
pub fn parse_product_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound("Product not found".to_string()))
}

// Request types

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "optional_number")]
    pub stock: Option<i32>,
    #[serde(default, deserialize_with = "optional_number")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "optional_number")]
    pub low_stock_alert: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "optional_number")]
    pub stock: Option<i32>,
    #[serde(default, deserialize_with = "optional_number")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "optional_number")]
    pub low_stock_alert: Option<i32>,
}

/// A product payload that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub stock: i32,
    pub price: Decimal,
    pub low_stock_alert: i32,
}

/// The validated subset of fields an update touches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub stock: Option<i32>,
    pub price: Option<Decimal>,
    pub low_stock_alert: Option<i32>,
}

impl CreateProductRequest {
    pub fn validate(self) -> Result<NewProduct> {
        let missing = || AppError::BadRequest("All fields are required".to_string());

        let name = non_blank(self.name).ok_or_else(missing)?;
        let sku = non_blank(self.sku).ok_or_else(missing)?;
        let stock = self.stock.ok_or_else(missing)?;
        let price = self.price.ok_or_else(missing)?;
        let low_stock_alert = self.low_stock_alert.ok_or_else(missing)?;

        check_stock(stock)?;
        check_price(price)?;
        check_low_stock_alert(low_stock_alert)?;

        Ok(NewProduct {
            name,
            sku,
            stock,
            price,
            low_stock_alert,
        })
    }
}

impl UpdateProductRequest {
    pub fn validate(self) -> Result<ProductChanges> {
        let name = match self.name {
            Some(name) => Some(
                non_blank(Some(name))
                    .ok_or_else(|| AppError::BadRequest("name must not be empty".to_string()))?,
            ),
            None => None,
        };

        let sku = match self.sku {
            Some(sku) => Some(
                non_blank(Some(sku))
                    .ok_or_else(|| AppError::BadRequest("sku must not be empty".to_string()))?,
            ),
            None => None,
        };

        if let Some(stock) = self.stock {
            check_stock(stock)?;
        }
        if let Some(price) = self.price {
            check_price(price)?;
        }
        if let Some(low_stock_alert) = self.low_stock_alert {
            check_low_stock_alert(low_stock_alert)?;
        }

        Ok(ProductChanges {
            name,
            sku,
            stock: self.stock,
            price: self.price,
            low_stock_alert: self.low_stock_alert,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_stock(stock: i32) -> Result<()> {
    if stock < 0 {
        return Err(AppError::BadRequest("stock must not be negative".to_string()));
    }
    Ok(())
}

fn check_price(price: Decimal) -> Result<()> {
    if price <= Decimal::ZERO {
        return Err(AppError::BadRequest("price must be greater than 0".to_string()));
    }
    if price > MAX_PRICE {
        return Err(AppError::BadRequest(format!(
            "price must not exceed {}",
            MAX_PRICE
        )));
    }
    Ok(())
}

fn check_low_stock_alert(low_stock_alert: i32) -> Result<()> {
    if low_stock_alert < 0 {
        return Err(AppError::BadRequest(
            "lowStockAlert must not be negative".to_string(),
        ));
    }
    Ok(())
}
