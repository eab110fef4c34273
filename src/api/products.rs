//! Product endpoints: listing, creation, inventory queries, CSV bulk
//! upload and export.

use axum::extract::{Multipart, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use sqlx::PgExecutor;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{NewProduct, Product};
use crate::error::ApiError;
use crate::inventory::csv;
use crate::inventory::summary::{summarize_or_empty, InventorySummary};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Exact on-hand quantity filter; `?stock=0` lists out-of-stock products.
    pub stock: Option<i32>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = match params.stock {
        Some(quantity) => state.inventory.list_by_stock(quantity).await?,
        None => state.inventory.list_all().await?,
    };
    Ok(Json(products))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    input.validate()?;
    let product = insert_product(&state.db, &input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn low_stock(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.inventory.list_low_stock().await?))
}

pub async fn expiring_soon(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.inventory.list_expiring_soon().await?))
}

pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.inventory.categories().await?))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let query = params.q.unwrap_or_default();
    let products = state
        .inventory
        .search(&query, params.category.as_deref())
        .await?;
    Ok(Json(products))
}

pub async fn summary(State(state): State<AppState>) -> Json<InventorySummary> {
    Json(summarize_or_empty(&state.inventory).await)
}

pub async fn export(State(state): State<AppState>) -> Result<Response, ApiError> {
    let products = state.inventory.list_all().await?;
    if products.is_empty() {
        return Err(ApiError::NotFound("no products to export"));
    }
    let body = csv::export(&products)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"inventory_export.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}

/// Bulk CSV upload. The whole file is parsed and validated up front and the
/// batch is inserted in a single transaction, so a bad row or a duplicate
/// SKU leaves the catalog untouched.
pub async fn bulk_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut data = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            data = Some(field.bytes().await?);
        }
    }
    let data = data.ok_or(ApiError::MissingField("file"))?;

    let batch = csv::parse(&data)?;
    let mut tx = state.db.begin().await?;
    for input in &batch {
        insert_product(&mut *tx, input).await?;
    }
    tx.commit().await?;

    tracing::info!(count = batch.len(), "bulk upload imported products");
    Ok(Json(serde_json::json!({
        "message": format!("Imported {} products", batch.len())
    })))
}

async fn insert_product(
    executor: impl PgExecutor<'_>,
    input: &NewProduct,
) -> Result<Product, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        "INSERT INTO products (id, name, sku, category, price, quantity, reorder_level, \
         expiry_date, supplier, barcode, image_url, description, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, NOW(), NOW()) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&input.name)
    .bind(&input.sku)
    .bind(&input.category)
    .bind(input.price)
    .bind(input.quantity)
    .bind(input.reorder_level)
    .bind(input.expiry_date)
    .bind(&input.supplier)
    .bind(&input.barcode)
    .bind(&input.image_url)
    .bind(&input.description)
    .fetch_one(executor)
    .await
}
