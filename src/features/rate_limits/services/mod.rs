mod rate_limit_service;
mod rate_limiter_store;

pub use rate_limit_service::RateLimitService;
pub use rate_limiter_store::RateLimiterStore;
