use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::rate_limits::dtos::{CreateRateLimitDto, UpdateRateLimitDto};
use crate::features::rate_limits::models::RateLimitRecord;
use crate::shared::validation::validate_key_parts;

/// Data-access layer for the rate_limiter table.
///
/// Holds a pool handle and performs one statement per call. No locking is
/// done here; concurrent lookup/update pairs for the same key race under the
/// backing store's native isolation.
pub struct RateLimiterStore {
    pool: SqlitePool,
}

impl RateLimiterStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new record for (ip, endpoint).
    ///
    /// The count column is left to its default of 0; callers set it through
    /// a subsequent `update`. `expires_at` is now + the dto's window length.
    /// The (ip, endpoint) primary key makes a duplicate create a database
    /// error rather than a second row.
    pub async fn create(&self, dto: &CreateRateLimitDto) -> Result<()> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let expires_at = Utc::now().timestamp() + dto.window_secs();

        sqlx::query(
            r#"
            INSERT INTO rate_limiter (ip, endpoint, expires_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&dto.ip)
        .bind(&dto.endpoint)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create rate limit record: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Rate limit record created: ip={}, endpoint={}, expires_at={}",
            dto.ip,
            dto.endpoint,
            expires_at
        );

        Ok(())
    }

    /// Fetch the record for (ip, endpoint), or None if absent.
    ///
    /// Does not filter by expires_at; callers check staleness themselves
    /// via `RateLimitRecord::is_expired`.
    pub async fn lookup(&self, ip: &str, endpoint: &str) -> Result<Option<RateLimitRecord>> {
        validate_key_parts(ip, endpoint)?;

        let record = sqlx::query_as::<_, RateLimitRecord>(
            r#"
            SELECT ip, endpoint, count, expires_at
            FROM rate_limiter
            WHERE ip = ?1 AND endpoint = ?2
            "#,
        )
        .bind(ip)
        .bind(endpoint)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up rate limit record: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(record)
    }

    /// Set count and refresh expires_at for the matching record.
    ///
    /// The window is reset unconditionally, whether or not the previous one
    /// had expired. Returns the number of rows affected; a missing key
    /// affects 0 rows and is not an error.
    pub async fn update(&self, dto: &UpdateRateLimitDto) -> Result<u64> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let expires_at = Utc::now().timestamp() + dto.window_secs();

        let result = sqlx::query(
            r#"
            UPDATE rate_limiter
            SET count = ?1, expires_at = ?2
            WHERE ip = ?3 AND endpoint = ?4
            "#,
        )
        .bind(dto.count)
        .bind(expires_at)
        .bind(&dto.ip)
        .bind(&dto.endpoint)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update rate limit record: {:?}", e);
            AppError::Database(e)
        })?;

        let rows = result.rows_affected();
        if rows == 0 {
            tracing::debug!(
                "Rate limit update matched no record: ip={}, endpoint={}",
                dto.ip,
                dto.endpoint
            );
        }

        Ok(rows)
    }
}
