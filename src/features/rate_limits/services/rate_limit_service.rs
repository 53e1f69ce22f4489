use std::sync::Arc;

use chrono::Utc;

use crate::core::config::RateLimitConfig;
use crate::core::error::{AppError, Result};
use crate::features::rate_limits::dtos::{
    CreateRateLimitDto, RateLimitStatusDto, UpdateRateLimitDto,
};
use crate::features::rate_limits::models::RateLimitRecord;
use crate::features::rate_limits::services::RateLimiterStore;

/// Fixed-window policy layer over `RateLimiterStore`.
///
/// The store resets the window on every update; this service is what keeps
/// the window fixed, by passing the remaining window length through when it
/// increments an in-window count.
pub struct RateLimitService {
    store: Arc<RateLimiterStore>,
    config: RateLimitConfig,
}

impl RateLimitService {
    pub fn new(store: Arc<RateLimiterStore>, config: RateLimitConfig) -> Self {
        Self { store, config }
    }

    /// Record one request for (ip, endpoint) and report the caller's standing.
    ///
    /// A missing or expired record starts a fresh window at count 1. A live
    /// window under the cap is incremented without moving its end. A live
    /// window at the cap is denied and left unchanged.
    pub async fn check_and_record(&self, ip: &str, endpoint: &str) -> Result<RateLimitStatusDto> {
        let now = Utc::now().timestamp();
        let window = self.config.window_secs;

        match self.store.lookup(ip, endpoint).await? {
            None => {
                self.store
                    .create(&CreateRateLimitDto::new(ip, endpoint).with_window(window))
                    .await?;
                self.store
                    .update(&UpdateRateLimitDto::new(ip, endpoint, 1).with_window(window))
                    .await?;
                Ok(self.fresh_window_status(now, 1))
            }
            Some(record) if record.is_expired(now) => {
                self.store
                    .update(&UpdateRateLimitDto::new(ip, endpoint, 1).with_window(window))
                    .await?;
                Ok(self.fresh_window_status(now, 1))
            }
            Some(record) if record.count < self.config.max_requests => {
                // keep the window end where it is
                let remaining_window = record.expires_at - now;
                self.store
                    .update(
                        &UpdateRateLimitDto::new(ip, endpoint, record.count + 1)
                            .with_window(remaining_window),
                    )
                    .await?;
                let updated = RateLimitRecord {
                    count: record.count + 1,
                    ..record
                };
                Ok(RateLimitStatusDto::from_record(
                    &updated,
                    self.config.max_requests,
                    true,
                ))
            }
            Some(record) => {
                tracing::debug!(
                    "Rate limit hit denied: ip={}, endpoint={}, count={}",
                    ip,
                    endpoint,
                    record.count
                );
                Ok(RateLimitStatusDto::from_record(
                    &record,
                    self.config.max_requests,
                    false,
                ))
            }
        }
    }

    /// Read-only view of the caller's standing; records nothing.
    ///
    /// An absent or expired record reads as a full allowance.
    pub async fn status(&self, ip: &str, endpoint: &str) -> Result<RateLimitStatusDto> {
        let now = Utc::now().timestamp();

        match self.store.lookup(ip, endpoint).await? {
            Some(record) if !record.is_expired(now) => Ok(RateLimitStatusDto::from_record(
                &record,
                self.config.max_requests,
                record.count < self.config.max_requests,
            )),
            _ => Ok(self.fresh_window_status(now, 0)),
        }
    }

    /// Like `check_and_record`, but a denied hit becomes an error.
    pub async fn enforce(&self, ip: &str, endpoint: &str) -> Result<RateLimitStatusDto> {
        let status = self.check_and_record(ip, endpoint).await?;
        if !status.allowed {
            return Err(AppError::RateLimitExceeded(format!(
                "{} requests per {}s exhausted for {} on {}",
                self.config.max_requests, self.config.window_secs, ip, endpoint
            )));
        }
        Ok(status)
    }

    fn fresh_window_status(&self, now: i64, used: i64) -> RateLimitStatusDto {
        RateLimitStatusDto {
            requests_used: used,
            requests_remaining: (self.config.max_requests - used).max(0),
            max_requests: self.config.max_requests,
            allowed: true,
            resets_at: now + self.config.window_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::test_pool;

    async fn service(max_requests: i64) -> RateLimitService {
        let store = Arc::new(RateLimiterStore::new(test_pool().await));
        let config = RateLimitConfig {
            window_secs: 3600,
            max_requests,
        };
        RateLimitService::new(store, config)
    }

    #[tokio::test]
    async fn test_first_hit_starts_window_at_one() {
        let service = service(3).await;
        let now = Utc::now().timestamp();

        let status = service.check_and_record("1.2.3.4", "/api/x").await.unwrap();

        assert!(status.allowed);
        assert_eq!(status.requests_used, 1);
        assert_eq!(status.requests_remaining, 2);
        assert!(status.resets_at >= now + 3600);
    }

    #[tokio::test]
    async fn test_hits_beyond_cap_are_denied() {
        let service = service(2).await;

        assert!(service.check_and_record("1.2.3.4", "/api/x").await.unwrap().allowed);
        assert!(service.check_and_record("1.2.3.4", "/api/x").await.unwrap().allowed);

        let status = service.check_and_record("1.2.3.4", "/api/x").await.unwrap();
        assert!(!status.allowed);
        assert_eq!(status.requests_used, 2);
        assert_eq!(status.requests_remaining, 0);

        // denied hits do not mutate the record
        let status = service.status("1.2.3.4", "/api/x").await.unwrap();
        assert_eq!(status.requests_used, 2);
    }

    #[tokio::test]
    async fn test_increment_preserves_window_end() {
        let service = service(10).await;

        let first = service.check_and_record("1.2.3.4", "/api/x").await.unwrap();
        let second = service.check_and_record("1.2.3.4", "/api/x").await.unwrap();

        assert_eq!(second.requests_used, 2);
        // the second hit must not push the window end forward
        assert!(second.resets_at <= first.resets_at + 1);
    }

    #[tokio::test]
    async fn test_expired_window_restarts_at_one() {
        let store = Arc::new(RateLimiterStore::new(test_pool().await));
        let config = RateLimitConfig {
            window_secs: 3600,
            max_requests: 2,
        };
        let service = RateLimitService::new(store.clone(), config);

        // exhaust the cap, then force the window into the past
        service.check_and_record("1.2.3.4", "/api/x").await.unwrap();
        service.check_and_record("1.2.3.4", "/api/x").await.unwrap();
        store
            .update(&UpdateRateLimitDto::new("1.2.3.4", "/api/x", 2).with_window(-10))
            .await
            .unwrap();

        let status = service.check_and_record("1.2.3.4", "/api/x").await.unwrap();
        assert!(status.allowed);
        assert_eq!(status.requests_used, 1);
    }

    #[tokio::test]
    async fn test_enforce_maps_denial_to_error() {
        let service = service(1).await;

        assert!(service.enforce("1.2.3.4", "/api/x").await.is_ok());
        let err = service.enforce("1.2.3.4", "/api/x").await.unwrap_err();
        assert!(matches!(err, AppError::RateLimitExceeded(_)));
    }

    #[tokio::test]
    async fn test_status_of_unknown_key_is_full_allowance() {
        let service = service(5).await;

        let status = service.status("9.9.9.9", "/none").await.unwrap();
        assert!(status.allowed);
        assert_eq!(status.requests_used, 0);
        assert_eq!(status.requests_remaining, 5);
    }
}
