//! Runtime configuration, loaded from the environment with documented defaults.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::info;

/// Service configuration.
///
/// | Variable                         | Default   |
/// |----------------------------------|-----------|
/// | `PORT`                           | `4000`    |
/// | `DATABASE_URL`                   | required  |
/// | `SMARTMART_LOW_STOCK_THRESHOLD`  | `20`      |
/// | `SMARTMART_EXPIRY_WINDOW_DAYS`   | `7`       |
/// | `SMARTMART_UPLOAD_DIR`           | `uploads` |
/// | `SMARTMART_REQUEST_TIMEOUT_SECS` | `30`      |
/// | `SMARTMART_MAX_UPLOAD_BYTES`     | 10 MiB    |
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    /// Fleet-wide low-stock threshold. The sole source of truth for the
    /// low-stock query; per-product reorder levels do not override it.
    pub low_stock_threshold: i32,
    pub expiry_window_days: u64,
    pub upload_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Ok(Self {
            port: parse_or("PORT", 4000)?,
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL is required")?,
            low_stock_threshold: parse_or("SMARTMART_LOW_STOCK_THRESHOLD", 20)?,
            expiry_window_days: parse_or("SMARTMART_EXPIRY_WINDOW_DAYS", 7)?,
            upload_dir: PathBuf::from(
                std::env::var("SMARTMART_UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()),
            ),
            request_timeout_secs: parse_or("SMARTMART_REQUEST_TIMEOUT_SECS", 30)?,
            max_upload_bytes: parse_or("SMARTMART_MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key} value {raw:?}: {e}")),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
