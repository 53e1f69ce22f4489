pub mod rate_limits;
