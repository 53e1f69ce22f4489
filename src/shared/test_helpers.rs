#[cfg(test)]
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

#[cfg(test)]
use crate::core::database::init_schema;

/// Install a subscriber once so RUST_LOG works under `cargo test`.
#[cfg(test)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}

/// In-memory pool for service tests. A single connection keeps every query
/// on the same in-memory database.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    init_tracing();

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    init_schema(&pool).await.expect("failed to create schema");

    pool
}
