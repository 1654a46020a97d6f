//! Pagination defaults and clamps shared by every list endpoint.
//!
//! This module lives in `core` (zero internal deps) so the repository
//! layer can clamp user-provided values without pulling in API types.

/// Default number of rows per page.
pub const DEFAULT_PAGE_LIMIT: i64 = 25;

/// Maximum number of rows per page.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
