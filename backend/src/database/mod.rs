//! Module for database connection setup and common utilities.
//!
//! This module is responsible for initializing the database connection pool,
//! applying the embedded schema migrations and providing a central point for
//! database-related configuration.

use crate::config::Config;
use anyhow::{Context, Result};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;
use std::time::Duration;

pub mod models;

#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    /// Initializes the database connection pool from application config.
    pub async fn new(config: &Config) -> Result<Self> {
        Self::connect(
            &config.database_url,
            config.max_connections,
            Duration::from_secs(config.acquire_timeout_seconds),
        )
        .await
    }

    /// Opens a pool against `database_url`, creating the SQLite file if needed.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid DATABASE_URL: {}", database_url))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        Ok(Database { pool })
    }

    /// Applies pending schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to migrate database")?;
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection pool closed");
    }
}

/// Single-connection in-memory database with the schema applied.
///
/// One connection only: every new SQLite connection to `:memory:` opens a
/// fresh, empty database.
#[cfg(test)]
pub async fn test_database() -> Database {
    let db = Database::connect("sqlite::memory:", 1, Duration::from_secs(3))
        .await
        .expect("in-memory database");
    db.migrate().await.expect("migrations apply");
    db
}
