use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::config::RateLimitConfig;
use crate::features::rate_limits::models::RateLimitRecord;

/// Request DTO for creating a rate limit record
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRateLimitDto {
    #[validate(length(min = 1, message = "ip must not be empty"))]
    pub ip: String,
    #[validate(length(min = 1, message = "endpoint must not be empty"))]
    pub endpoint: String,
    /// Window length override; defaults to the 3600s fixed window
    #[serde(default)]
    pub window_secs: Option<i64>,
}

/// Request DTO for updating a rate limit record's count
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRateLimitDto {
    #[validate(length(min = 1, message = "ip must not be empty"))]
    pub ip: String,
    #[validate(length(min = 1, message = "endpoint must not be empty"))]
    pub endpoint: String,
    #[validate(range(min = 0, message = "count must be a non-negative integer"))]
    pub count: i64,
    /// Window length override; defaults to the 3600s fixed window
    #[serde(default)]
    pub window_secs: Option<i64>,
}

impl CreateRateLimitDto {
    pub fn new(ip: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            endpoint: endpoint.into(),
            window_secs: None,
        }
    }

    pub fn with_window(mut self, window_secs: i64) -> Self {
        self.window_secs = Some(window_secs);
        self
    }

    pub fn window_secs(&self) -> i64 {
        self.window_secs
            .unwrap_or(RateLimitConfig::DEFAULT_WINDOW_SECS)
    }
}

impl UpdateRateLimitDto {
    pub fn new(ip: impl Into<String>, endpoint: impl Into<String>, count: i64) -> Self {
        Self {
            ip: ip.into(),
            endpoint: endpoint.into(),
            count,
            window_secs: None,
        }
    }

    pub fn with_window(mut self, window_secs: i64) -> Self {
        self.window_secs = Some(window_secs);
        self
    }

    pub fn window_secs(&self) -> i64 {
        self.window_secs
            .unwrap_or(RateLimitConfig::DEFAULT_WINDOW_SECS)
    }
}

/// Response DTO describing a caller's standing within the current window
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitStatusDto {
    /// Requests used in the current window
    pub requests_used: i64,
    /// Requests remaining before hitting the limit
    pub requests_remaining: i64,
    /// Maximum requests allowed per window
    pub max_requests: i64,
    /// Whether the request that produced this status was allowed
    pub allowed: bool,
    /// Unix timestamp when the window ends
    pub resets_at: i64,
}

impl RateLimitStatusDto {
    pub(crate) fn from_record(record: &RateLimitRecord, max_requests: i64, allowed: bool) -> Self {
        Self {
            requests_used: record.count,
            requests_remaining: (max_requests - record.count).max(0),
            max_requests,
            allowed,
            resets_at: record.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_create_dto_rejects_empty_ip() {
        let dto = CreateRateLimitDto::new("", "/api/x");
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_dto_rejects_negative_count() {
        let dto = UpdateRateLimitDto::new("1.2.3.4", "/api/x", -1);
        assert!(dto.validate().is_err());

        let dto = UpdateRateLimitDto::new("1.2.3.4", "/api/x", 0);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_status_dto_serializes_counts() {
        let record = RateLimitRecord {
            ip: "1.2.3.4".to_string(),
            endpoint: "/api/x".to_string(),
            count: 7,
            expires_at: 1_700_000_000,
        };
        let status = RateLimitStatusDto::from_record(&record, 10, true);

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["requests_used"], 7);
        assert_eq!(json["requests_remaining"], 3);
        assert_eq!(json["allowed"], true);
        assert_eq!(json["resets_at"], 1_700_000_000);
    }

    #[test]
    fn test_status_dto_remaining_never_negative() {
        let record = RateLimitRecord {
            ip: "1.2.3.4".to_string(),
            endpoint: "/api/x".to_string(),
            count: 12,
            expires_at: 0,
        };
        let status = RateLimitStatusDto::from_record(&record, 10, false);
        assert_eq!(status.requests_remaining, 0);
    }
}
