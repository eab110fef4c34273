//! Invoice generation: price the requested lines, decrement stock, persist.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::Product;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInvoiceRequest {
    #[validate(length(min = 1, message = "customer name is required"))]
    pub customer_name: String,
    pub customer_email: Option<String>,
    #[validate(length(min = 1, message = "at least one line item is required"))]
    pub items: Vec<InvoiceItemRequest>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub product_id: Uuid,
    pub name: String,
    pub sku: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_number: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub items: serde_json::Value,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateInvoiceRequest>,
) -> Result<(StatusCode, Json<Invoice>), ApiError> {
    request.validate()?;

    let mut tx = state.db.begin().await?;
    let mut lines = Vec::with_capacity(request.items.len());
    let mut subtotal = Decimal::ZERO;

    for item in &request.items {
        if item.quantity <= 0 {
            return Err(ApiError::Validation(format!(
                "quantity for product {} must be positive",
                item.product_id
            )));
        }
        let product =
            sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1 FOR UPDATE")
                .bind(item.product_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(ApiError::NotFound("product not found"))?;
        if product.quantity < item.quantity {
            return Err(ApiError::InsufficientStock {
                sku: product.sku,
                requested: item.quantity,
                available: product.quantity,
            });
        }

        sqlx::query("UPDATE products SET quantity = quantity - $2, updated_at = NOW() WHERE id = $1")
            .bind(product.id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;

        let line_total = product.price * Decimal::from(item.quantity);
        subtotal += line_total;
        lines.push(InvoiceLine {
            product_id: product.id,
            name: product.name,
            sku: product.sku,
            quantity: item.quantity,
            unit_price: product.price,
            line_total,
        });
    }

    let invoice_number = format!("INV-{:08}", rand::random::<u32>());
    let invoice = sqlx::query_as::<_, Invoice>(
        "INSERT INTO invoices (id, invoice_number, customer_name, customer_email, items, \
         subtotal, total, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, NOW()) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&invoice_number)
    .bind(&request.customer_name)
    .bind(&request.customer_email)
    .bind(serde_json::to_value(&lines)?)
    .bind(subtotal)
    .bind(subtotal)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    tracing::info!(%invoice_number, lines = lines.len(), "invoice generated");
    Ok((StatusCode::CREATED, Json(invoice)))
}
