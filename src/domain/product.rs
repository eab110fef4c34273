//! Product record and stock/expiry predicates.

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Reorder level applied when a product is created without one.
pub const DEFAULT_REORDER_LEVEL: i32 = 5;

/// A catalog product as stored and as served over the wire (camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
    pub quantity: i32,
    pub reorder_level: i32,
    pub expiry_date: Option<NaiveDate>,
    pub supplier: Option<String>,
    pub barcode: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }

    /// Low stock means on hand but at or below the threshold. Out-of-stock
    /// products are not low stock.
    pub fn is_low_stock(&self, threshold: i32) -> bool {
        self.quantity > 0 && self.quantity <= threshold
    }

    /// Whether the expiry date falls within `[today, today + window_days]`.
    /// Products without an expiry date never expire.
    pub fn expires_within(&self, today: NaiveDate, window_days: u64) -> bool {
        let until = today
            .checked_add_days(Days::new(window_days))
            .unwrap_or(NaiveDate::MAX);
        match self.expiry_date {
            Some(date) => date >= today && date <= until,
            None => false,
        }
    }
}

/// Input for product creation, from the add-product form or a CSV row.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "sku is required"))]
    pub sku: String,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    #[validate(custom = "non_negative_price")]
    pub price: Decimal,
    #[validate(range(min = 0, message = "quantity must be non-negative"))]
    pub quantity: i32,
    #[serde(default = "default_reorder_level")]
    #[validate(range(min = 0, message = "reorder level must be non-negative"))]
    pub reorder_level: i32,
    pub expiry_date: Option<NaiveDate>,
    pub supplier: Option<String>,
    pub barcode: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

fn default_reorder_level() -> i32 {
    DEFAULT_REORDER_LEVEL
}

fn non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("price must be non-negative"));
    }
    Ok(())
}
