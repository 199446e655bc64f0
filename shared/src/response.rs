//! List response types
//!
//! Every list endpoint answers with a [`PaginatedResponse`]:
//! ```json
//! {
//!     "items": [ ... ],
//!     "pagination": { "page": 1, "per_page": 15, "total": 42, "total_pages": 3 }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Default page size for list endpoints
pub const DEFAULT_PER_PAGE: u32 = 15;

/// Upper bound for `per_page`
pub const MAX_PER_PAGE: u32 = 100;

/// Pagination metadata
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-based)
    pub page: u32,
    /// Items per page
    pub per_page: u32,
    /// Total number of items
    pub total: u64,
    /// Total number of pages
    pub total_pages: u32,
}

impl Pagination {
    /// Create a new pagination
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page as u64) as u32
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// List of items
    pub items: Vec<T>,
    /// Pagination metadata
    pub pagination: Pagination,
}

impl<T> PaginatedResponse<T> {
    /// Create a new paginated response
    pub fn new(items: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        Self {
            items,
            pagination: Pagination::new(page, per_page, total),
        }
    }
}

/// Page request shared by all list queries (`?page=2&per_page=20`)
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageRequest {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageRequest {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self { page, per_page }
    }

    /// Normalized `(page, per_page)`: page >= 1, 1 <= per_page <= MAX_PER_PAGE
    pub fn resolve(&self) -> (u32, u32) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        (page, per_page)
    }

    /// SQL `(LIMIT, OFFSET)` pair
    pub fn limit_offset(&self) -> (i64, i64) {
        let (page, per_page) = self.resolve();
        let per_page = i64::from(per_page);
        (per_page, (i64::from(page) - 1) * per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_total_pages() {
        assert_eq!(Pagination::new(1, 15, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 15, 15).total_pages, 1);
        assert_eq!(Pagination::new(1, 15, 16).total_pages, 2);
        assert_eq!(Pagination::new(1, 0, 10).total_pages, 0);
    }

    #[test]
    fn test_page_request_defaults_and_clamps() {
        assert_eq!(PageRequest::default().resolve(), (1, DEFAULT_PER_PAGE));

        let req = PageRequest {
            page: Some(0),
            per_page: Some(1000),
        };
        assert_eq!(req.resolve(), (1, MAX_PER_PAGE));

        let req = PageRequest {
            page: Some(3),
            per_page: Some(20),
        };
        assert_eq!(req.limit_offset(), (20, 40));
    }

    #[test]
    fn test_limit_offset_on_last_page_number() {
        let req = PageRequest {
            page: Some(u32::MAX),
            per_page: Some(100),
        };
        assert_eq!(req.limit_offset(), (100, (i64::from(u32::MAX) - 1) * 100));
    }
}
