//! SmartMart Inventory - self-hosted inventory admin service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smartmart_inventory::config::AppConfig;
use smartmart_inventory::{api, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(AppConfig::load()?);
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let state = AppState::new(db, config.clone());

    let app = Router::new()
        .route(
            "/health",
            get(|| async {
                Json(serde_json::json!({"status": "healthy", "service": "smartmart-inventory"}))
            }),
        )
        .route(
            "/api/v1/products",
            get(api::products::list).post(api::products::create),
        )
        .route("/api/v1/products/low-stock", get(api::products::low_stock))
        .route(
            "/api/v1/products/expiring-soon",
            get(api::products::expiring_soon),
        )
        .route(
            "/api/v1/products/categories",
            get(api::products::categories),
        )
        .route("/api/v1/products/search", get(api::products::search))
        .route("/api/v1/products/summary", get(api::products::summary))
        .route("/api/v1/products/export", get(api::products::export))
        .route(
            "/api/v1/products/bulk-upload",
            post(api::products::bulk_upload),
        )
        .route(
            "/api/v1/users/:id",
            get(api::profile::get_profile)
                .patch(api::profile::update_profile)
                .post(api::profile::update_profile),
        )
        .route("/api/v1/invoices/generate", post(api::invoices::generate))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address).await?;
    tracing::info!("smartmart-inventory listening on {address}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            tracing::info!("received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(err) => tracing::error!(error = %err, "failed to install signal handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
