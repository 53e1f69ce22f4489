//! Persistent fixed-window rate limiting keyed by (ip, endpoint).
//!
//! Two layers:
//!
//! - [`RateLimiterStore`](services::RateLimiterStore) — one row per
//!   (ip, endpoint) holding a request count and the window end; create,
//!   lookup, and update-count operations, nothing else. Stale rows are
//!   never swept.
//! - [`RateLimitService`](services::RateLimitService) — check-and-record,
//!   status, and enforcement against a configured per-window cap.

pub mod dtos;
pub mod models;
pub mod services;
