//! SmartMart Inventory - self-hosted business inventory administration.
//!
//! REST API over a Postgres product store, backing the SmartMart admin
//! dashboard:
//! - product catalog with low-stock, out-of-stock, and expiring-soon queries
//! - instant in-memory filtering for the dashboard table
//! - CSV bulk import and export
//! - user profile editing with avatar upload
//! - invoice generation with stock decrement

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod inventory;
pub mod session;

use config::AppConfig;
use inventory::Inventory;
use session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<AppConfig>,
    pub inventory: Inventory,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, config: Arc<AppConfig>) -> Self {
        let inventory = Inventory::new(db.clone(), &config);
        Self {
            db,
            config,
            inventory,
            sessions: SessionStore::default(),
        }
    }
}
