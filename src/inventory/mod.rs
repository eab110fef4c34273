//! Inventory queries over the product store.

pub mod csv;
pub mod filter;
pub mod summary;

use chrono::{Days, NaiveDate, Utc};
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::domain::Product;

/// Store-backed inventory queries. An empty result set is a valid answer,
/// never an error.
#[derive(Clone)]
pub struct Inventory {
    db: PgPool,
    low_stock_threshold: i32,
    expiry_window_days: u64,
}

impl Inventory {
    pub fn new(db: PgPool, config: &AppConfig) -> Self {
        Self {
            db,
            low_stock_threshold: config.low_stock_threshold,
            expiry_window_days: config.expiry_window_days,
        }
    }

    pub async fn list_all(&self) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at DESC")
            .fetch_all(&self.db)
            .await
    }

    /// Products with exactly `quantity` units on hand (`?stock=0` serves the
    /// out-of-stock listing).
    pub async fn list_by_stock(&self, quantity: i32) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE quantity = $1 ORDER BY created_at DESC",
        )
        .bind(quantity)
        .fetch_all(&self.db)
        .await
    }

    pub async fn list_low_stock(&self) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE quantity > 0 AND quantity <= $1 ORDER BY quantity ASC",
        )
        .bind(self.low_stock_threshold)
        .fetch_all(&self.db)
        .await
    }

    pub async fn list_out_of_stock(&self) -> Result<Vec<Product>, sqlx::Error> {
        self.list_by_stock(0).await
    }

    pub async fn list_expiring_soon(&self) -> Result<Vec<Product>, sqlx::Error> {
        let today = Utc::now().date_naive();
        let until = today
            .checked_add_days(Days::new(self.expiry_window_days))
            .unwrap_or(NaiveDate::MAX);
        sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE expiry_date BETWEEN $1 AND $2 ORDER BY expiry_date ASC",
        )
        .bind(today)
        .bind(until)
        .fetch_all(&self.db)
        .await
    }

    /// Case-insensitive substring search on name or category, optionally
    /// restricted to one category.
    pub async fn search(
        &self,
        query: &str,
        category: Option<&str>,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let pattern = format!("%{query}%");
        match category {
            Some(category) => {
                sqlx::query_as::<_, Product>(
                    "SELECT * FROM products \
                     WHERE (name ILIKE $1 OR category ILIKE $1) AND LOWER(category) = LOWER($2) \
                     ORDER BY created_at DESC",
                )
                .bind(&pattern)
                .bind(category)
                .fetch_all(&self.db)
                .await
            }
            None => {
                sqlx::query_as::<_, Product>(
                    "SELECT * FROM products \
                     WHERE name ILIKE $1 OR category ILIKE $1 \
                     ORDER BY created_at DESC",
                )
                .bind(&pattern)
                .fetch_all(&self.db)
                .await
            }
        }
    }

    pub async fn categories(&self) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT DISTINCT category FROM products ORDER BY category")
            .fetch_all(&self.db)
            .await
    }
}
