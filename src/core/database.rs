use crate::core::config::DatabaseConfig;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::time::Duration;

pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// Create the rate_limiter table if it does not exist yet.
///
/// The composite primary key enforces one active record per (ip, endpoint);
/// a duplicate insert surfaces as a database error rather than a second row.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS rate_limiter (
            ip         TEXT    NOT NULL,
            endpoint   TEXT    NOT NULL,
            count      INTEGER NOT NULL DEFAULT 0,
            expires_at INTEGER NOT NULL,
            PRIMARY KEY (ip, endpoint)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
