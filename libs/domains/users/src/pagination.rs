//! Page/limit validation and page metadata.

use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;
use utoipa::ToSchema;

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// Page size bounds applied to every listing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    default_limit: u64,
    max_limit: u64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }
}

impl PageLimits {
    /// Zero values fall back to the built-in defaults and the default limit
    /// never exceeds the cap.
    pub fn new(default_limit: u64, max_limit: u64) -> Self {
        let max_limit = if max_limit == 0 { MAX_LIMIT } else { max_limit };
        let default_limit = if default_limit == 0 {
            DEFAULT_LIMIT
        } else {
            default_limit
        };
        Self {
            default_limit: default_limit.min(max_limit),
            max_limit,
        }
    }

    pub fn default_limit(&self) -> u64 {
        self.default_limit
    }

    pub fn max_limit(&self) -> u64 {
        self.max_limit
    }
}

/// Requested page and limit as parsed from the query string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageRequest {
    /// Non-numeric values are treated as absent. Numbers too large for an
    /// i64 saturate so they still hit the cap or land past the last page.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: page.and_then(parse_number),
            limit: limit.and_then(parse_number),
        }
    }
}

fn parse_number(raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(n) => Some(n),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(i64::MAX),
        Err(e) if *e.kind() == IntErrorKind::NegOverflow => Some(i64::MIN),
        Err(_) => None,
    }
}

/// Page metadata returned alongside a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageMeta {
    /// Number of records matching the filters
    pub total_count: u64,
    /// 1-based page number
    pub page: u64,
    /// Effective page size
    pub limit: u64,
    /// Number of records skipped
    pub offset: u64,
    /// Total number of pages (0 when nothing matches)
    pub page_count: u64,
    pub is_last_page: bool,
}

/// Page, limit and offset resolved from a request, before the total is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
    pub offset: u64,
}

impl PageWindow {
    /// Never fails: page < 1 becomes 1, limit < 1 becomes the default and
    /// limit above the cap is clamped.
    pub fn resolve(request: PageRequest, limits: &PageLimits) -> Self {
        let page = match request.page {
            Some(p) if p >= 1 => p as u64,
            _ => 1,
        };
        let limit = match request.limit {
            Some(l) if l >= 1 => (l as u64).min(limits.max_limit),
            _ => limits.default_limit,
        }
        .max(1);

        // offset travels to the database as i64
        let offset = (page - 1).saturating_mul(limit).min(i64::MAX as u64);

        Self {
            page,
            limit,
            offset,
        }
    }

    pub fn meta(&self, total_count: u64) -> PageMeta {
        let page_count = total_count.div_ceil(self.limit);
        PageMeta {
            total_count,
            page: self.page,
            limit: self.limit,
            offset: self.offset,
            page_count,
            is_last_page: self.page >= page_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
    pub meta: PageMeta,
}

/// Resolve a page request against the total row count.
///
/// A page past the end yields an offset beyond `total_count`, which the
/// caller turns into an empty result.
pub fn paginate(request: PageRequest, total_count: u64, limits: &PageLimits) -> Pagination {
    let window = PageWindow::resolve(request, limits);
    Pagination {
        offset: window.offset,
        limit: window.limit,
        meta: window.meta(total_count),
    }
}
