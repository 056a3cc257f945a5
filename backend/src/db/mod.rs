//! Postgres pool and schema setup
//!
//! Only startup code lives here. Once the pool exists, queries go through the
//! repositories and their failures surface as `StoreError`.

use crate::config::DatabaseConfig;
use crate::repositories::StoreError;
use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Open a pool sized and timed by `config`
///
/// Connects eagerly, so an unreachable database fails startup instead of the
/// first request.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let options = PgConnectOptions::from_str(&config.url)
        .context("Invalid database URL")?
        .application_name("bookshelf-api");

    let pool = pool_options(config)
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    info!(
        max = config.max_connections,
        min = config.min_connections,
        "Database pool ready"
    );
    Ok(pool)
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
}

/// Apply pending migrations from `migrations/`
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;
    info!("Migrations applied");
    Ok(())
}

/// Round-trip a trivial query; used by the readiness probe
pub async fn health_check(pool: &PgPool) -> Result<(), StoreError> {
    if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
        warn!(error = %e, "Database health check failed");
        return Err(e.into());
    }
    Ok(())
}
