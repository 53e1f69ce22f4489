use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Fixed-window policy knobs consumed by `RateLimitService`.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Window length in seconds; also the default for store-level expiry.
    pub window_secs: i64,
    /// Maximum requests allowed per (ip, endpoint) within one window.
    pub max_requests: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            database: DatabaseConfig::from_env()?,
            rate_limit: RateLimitConfig::from_env()?,
        })
    }
}

impl DatabaseConfig {
    // Conservative pool defaults; SQLite is effectively single-writer anyway
    const DEFAULT_MAX_CONNECTIONS: u32 = 5;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl RateLimitConfig {
    pub const DEFAULT_WINDOW_SECS: i64 = 3600; // 1 hour
    const DEFAULT_MAX_REQUESTS: i64 = 100;

    pub fn from_env() -> Result<Self, String> {
        let window_secs = env::var("RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_WINDOW_SECS.to_string())
            .parse::<i64>()
            .map_err(|_| "RATE_LIMIT_WINDOW_SECS must be a valid number".to_string())?;
        if window_secs <= 0 {
            return Err("RATE_LIMIT_WINDOW_SECS must be positive".to_string());
        }

        let max_requests = env::var("RATE_LIMIT_MAX_REQUESTS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUESTS.to_string())
            .parse::<i64>()
            .map_err(|_| "RATE_LIMIT_MAX_REQUESTS must be a valid number".to_string())?;
        if max_requests <= 0 {
            return Err("RATE_LIMIT_MAX_REQUESTS must be positive".to_string());
        }

        Ok(Self {
            window_secs,
            max_requests,
        })
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: Self::DEFAULT_WINDOW_SECS,
            max_requests: Self::DEFAULT_MAX_REQUESTS,
        }
    }
}
