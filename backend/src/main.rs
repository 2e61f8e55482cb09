//! Main entry point for the userapp backend.
//!
//! This file initializes the Axum web server, sets up the database connection,
//! and registers the authentication routes and middleware.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

use crate::api::common::ApiResponse;
use crate::auth::service::AuthService;
use crate::repositories::user_repository::UserRepository;
use anyhow::Context;
use axum::{Router, response::Json, routing::get};
use config::Config;
use database::Database;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let db = Database::new(&config).await?;
    db.migrate().await?;

    let store = Arc::new(UserRepository::new(db.pool().clone()));
    let auth_service = Arc::new(AuthService::from_config(&config, store));

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    info!("Starting userapp server on port {}", config.server_port);
    axum::serve(listener, app(auth_service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    Ok(())
}

/// Builds the full application router.
fn app(auth_service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .merge(auth::routes::auth_router(auth_service))
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "userapp backend",
            "version": env!("CARGO_PKG_VERSION")
        }),
        "Welcome to the userapp API",
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
