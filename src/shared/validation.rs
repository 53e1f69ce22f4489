use crate::core::error::{AppError, Result};

/// Reject empty key parts before any I/O happens.
///
/// Only emptiness is checked; the store attaches no meaning to the shape of
/// an ip or endpoint string beyond its role in the lookup key.
pub fn validate_key_parts(ip: &str, endpoint: &str) -> Result<()> {
    if ip.is_empty() {
        return Err(AppError::Validation("ip must not be empty".to_string()));
    }
    if endpoint.is_empty() {
        return Err(AppError::Validation(
            "endpoint must not be empty".to_string(),
        ));
    }
    Ok(())
}
