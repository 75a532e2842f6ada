//! PostgreSQL connection pool management

use sqlx::postgres::{PgPool, PgPoolOptions};
use starboard_common::DatabaseConfig;
use tracing::info;

/// Schema statements, applied in order
const MIGRATIONS: &[(&str, &str)] = &[(
    "0001_starboard_mapping",
    include_str!("../../migrations/0001_starboard_mapping.sql"),
)];

/// Create a new PostgreSQL connection pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .connect(&config.url)
        .await
}

/// Create the starboard tables if they do not exist yet
///
/// Every statement is idempotent, so this runs on each startup.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    for (name, sql) in MIGRATIONS {
        sqlx::query(sql).execute(pool).await?;
        info!(migration = name, "Schema migration applied");
    }
    Ok(())
}
