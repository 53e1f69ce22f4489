//! Persistent fixed-window rate limiting backed by a relational store.
//!
//! The crate is consumed programmatically by a request-handling layer; it
//! ships no CLI or network surface of its own. Construct a pool with
//! [`create_pool`](crate::core::database::create_pool), wrap it in a
//! [`RateLimiterStore`], and either drive the store directly or layer a
//! [`RateLimitService`] on top for per-window enforcement.

pub mod core;
pub mod features;
pub mod shared;

pub use crate::core::config::{Config, DatabaseConfig, RateLimitConfig};
pub use crate::core::error::{AppError, Result};
pub use crate::features::rate_limits::dtos::{
    CreateRateLimitDto, RateLimitStatusDto, UpdateRateLimitDto,
};
pub use crate::features::rate_limits::models::RateLimitRecord;
pub use crate::features::rate_limits::services::{RateLimitService, RateLimiterStore};
