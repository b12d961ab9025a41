//! Page-number pagination constants and helpers for car listings.

use serde::Serialize;

use crate::error::CoreError;

/// Page size used when the client does not specify one.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Largest page size a client may request.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Maximum number of rows returned by free-text search.
pub const SEARCH_RESULT_LIMIT: i64 = 20;

/// Minimum number of characters in a search query.
pub const MIN_SEARCH_QUERY_CHARS: usize = 2;

/// A validated page request (`page` is 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    /// Number of rows to skip before this page. Saturates rather than
    /// overflowing for absurdly large page numbers.
    pub fn offset(&self) -> i64 {
        (self.page - 1).max(0).saturating_mul(self.limit)
    }

    /// Build a page request from raw query-string values.
    ///
    /// Absent or blank values take the defaults. Values are coerced the way a
    /// query string would be (`"2"` and `"2.0"` both mean page 2).
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Result<Self, CoreError> {
        let page = match non_blank(page) {
            None => 1,
            Some(raw) => {
                let n = whole_number(raw)
                    .ok_or_else(|| CoreError::Validation("Page must be a whole number".into()))?;
                if n < 1 {
                    return Err(CoreError::Validation("Page must be positive".into()));
                }
                n
            }
        };

        let limit = match non_blank(limit) {
            None => DEFAULT_PAGE_LIMIT,
            Some(raw) => {
                let n = whole_number(raw)
                    .ok_or_else(|| CoreError::Validation("Limit must be a whole number".into()))?;
                if n < 1 {
                    return Err(CoreError::Validation("Limit must be at least 1".into()));
                }
                if n > MAX_PAGE_LIMIT {
                    return Err(CoreError::Validation(format!(
                        "Limit cannot exceed {MAX_PAGE_LIMIT}"
                    )));
                }
                n
            }
        };

        Ok(Self::new(page, limit))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn whole_number(raw: &str) -> Option<i64> {
    let n: f64 = raw.parse().ok()?;
    if !n.is_finite() || n.fract() != 0.0 || n.abs() > i64::MAX as f64 {
        return None;
    }
    Some(n as i64)
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_LIMIT)
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl PageInfo {
    pub fn new(request: PageRequest, total: i64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            pages: total_pages(total, request.limit),
        }
    }
}

/// Number of pages needed to show `total` rows, `limit` at a time.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 || total <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}
