//! Input validation helpers
//!
//! Centralized text length constants and validation functions
//! used by the repositories before anything is written.

use crate::db::repository::{RepoError, RepoResult};

// ── Text length limits ──────────────────────────────────────────────

/// Product titles, category names
pub const MAX_NAME_LEN: usize = 200;

/// Product descriptions
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Short identifiers: product code
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is present, non-empty and within the length limit.
pub fn require_text<'a>(value: &'a Option<String>, field: &str, max_len: usize) -> RepoResult<&'a str> {
    match value {
        Some(v) => {
            validate_required_text(v, field, max_len)?;
            Ok(v)
        }
        None => Err(RepoError::Validation(format!("{field} is required"))),
    }
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> RepoResult<()> {
    if value.trim().is_empty() {
        return Err(RepoError::Validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(RepoError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is non-empty and within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> RepoResult<()> {
    if let Some(v) = value {
        validate_required_text(v, field, max_len)?;
    }
    Ok(())
}

/// Price must be a finite, non-negative number. Zero is a valid price.
pub fn validate_price(price: f64) -> RepoResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(RepoError::Validation(format!(
            "price must be a non-negative number (got {price})"
        )));
    }
    Ok(())
}

/// Stock must be non-negative. Zero is a valid stock.
pub fn validate_stock(stock: i64) -> RepoResult<()> {
    if stock < 0 {
        return Err(RepoError::Validation(format!(
            "stock must not be negative (got {stock})"
        )));
    }
    Ok(())
}

/// Every thumbnail path must be non-empty and within the URL limit.
pub fn validate_thumbnails(thumbnails: &[String]) -> RepoResult<()> {
    for thumbnail in thumbnails {
        validate_required_text(thumbnail, "thumbnails[]", MAX_URL_LEN)?;
    }
    Ok(())
}
