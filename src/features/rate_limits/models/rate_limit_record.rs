use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for one (ip, endpoint) counter in its current window
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RateLimitRecord {
    pub ip: String,
    pub endpoint: String,
    /// Requests observed in the current window; never negative
    pub count: i64,
    /// Unix timestamp marking when the current window ends
    pub expires_at: i64,
}

impl RateLimitRecord {
    /// A record past its window end is logically stale. Nothing deletes it;
    /// callers decide what staleness means for them.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}
