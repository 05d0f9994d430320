//! Page-based pagination
//!
//! Turns `page`/`limit` query parameters into an offset window over a
//! date-ordered result set, and checks the requested page against the number
//! of matching records.

use thiserror::Error;

/// Default number of records per page when `limit` is omitted
pub const DEFAULT_PAGE_LIMIT: u64 = 100;

/// Largest `limit` a client may ask for
pub const MAX_PAGE_LIMIT: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("{0}")]
    InvalidParameter(String),
    #[error("Requested page {page} is out of range. Only {max_pages} pages are available.")]
    OutOfRange { page: u64, max_pages: u64 },
    #[error("No stock data found for the given filters")]
    NotFound,
}

/// Configured bounds for the `limit` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationLimits {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PaginationLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_LIMIT,
            max_limit: MAX_PAGE_LIMIT,
        }
    }
}

/// A validated page request: `page >= 1`, `1 <= limit <= max_limit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

/// Rows to skip and rows to take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

/// A page request resolved against the number of matching records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPage {
    pub window: PageWindow,
    pub total: u64,
    pub max_pages: u64,
}

impl PageRequest {
    /// Validate raw query parameters, filling in defaults
    pub fn from_params(
        page: Option<i64>,
        limit: Option<i64>,
        limits: &PaginationLimits,
    ) -> Result<Self, PaginationError> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(PaginationError::InvalidParameter(
                "page must be greater than or equal to 1".to_string(),
            ));
        }

        let limit = match limit {
            Some(limit) if limit < 1 => {
                return Err(PaginationError::InvalidParameter(
                    "limit must be greater than or equal to 1".to_string(),
                ));
            }
            Some(limit) => limit as u64,
            None => limits.default_limit,
        };
        if limit > limits.max_limit {
            return Err(PaginationError::InvalidParameter(format!(
                "limit cannot exceed {}",
                limits.max_limit
            )));
        }

        Ok(Self {
            page: page as u64,
            limit,
        })
    }

    /// Zero-based window for this page, without range checks
    pub fn window(&self) -> PageWindow {
        PageWindow {
            offset: self.page.saturating_sub(1).saturating_mul(self.limit),
            limit: self.limit,
        }
    }

    /// Check the page against `total` matching records
    ///
    /// An empty result set is `NotFound` rather than out of range, so a
    /// filter that matches nothing reads as "no data" to the client.
    pub fn resolve(&self, total: u64) -> Result<ResolvedPage, PaginationError> {
        if total == 0 {
            return Err(PaginationError::NotFound);
        }

        let max_pages = max_pages(total, self.limit);
        if self.page > max_pages {
            return Err(PaginationError::OutOfRange {
                page: self.page,
                max_pages,
            });
        }

        Ok(ResolvedPage {
            window: self.window(),
            total,
            max_pages,
        })
    }
}

impl PageWindow {
    /// Apply the window to an already ordered sequence
    pub fn apply<I>(self, items: I) -> impl Iterator<Item = I::Item>
    where
        I: IntoIterator,
    {
        items
            .into_iter()
            .skip(usize::try_from(self.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(self.limit).unwrap_or(usize::MAX))
    }
}

/// Number of pages needed for `total` records at `limit` per page
pub fn max_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Window in skip/limit form
    fn skip_window(skip: u64, limit: u64) -> PageWindow {
        PageWindow { offset: skip, limit }
    }

    fn request(page: i64, limit: i64) -> Result<PageRequest, PaginationError> {
        PageRequest::from_params(Some(page), Some(limit), &PaginationLimits::default())
    }

    #[test]
    fn test_defaults_applied() {
        let req = PageRequest::from_params(None, None, &PaginationLimits::default()).unwrap();
        assert_eq!(req, PageRequest { page: 1, limit: DEFAULT_PAGE_LIMIT });
    }

    #[test]
    fn test_page_below_one_rejected() {
        assert!(matches!(request(0, 10), Err(PaginationError::InvalidParameter(_))));
        assert!(matches!(request(-3, 10), Err(PaginationError::InvalidParameter(_))));
    }

    #[test]
    fn test_limit_below_one_rejected() {
        assert!(matches!(request(1, 0), Err(PaginationError::InvalidParameter(_))));
        assert!(matches!(request(1, -1), Err(PaginationError::InvalidParameter(_))));
    }

    #[test]
    fn test_limit_above_max_rejected() {
        let limits = PaginationLimits { default_limit: 10, max_limit: 50 };
        let err = PageRequest::from_params(None, Some(51), &limits).unwrap_err();
        assert_eq!(err, PaginationError::InvalidParameter("limit cannot exceed 50".to_string()));
        assert!(PageRequest::from_params(None, Some(50), &limits).is_ok());
    }

    #[test]
    fn test_max_pages_rounds_up() {
        assert_eq!(max_pages(5, 2), 3);
        assert_eq!(max_pages(4, 2), 2);
        assert_eq!(max_pages(1, 100), 1);
        assert_eq!(max_pages(0, 10), 0);
    }

    #[test]
    fn test_offset_is_zero_based() {
        assert_eq!(request(1, 25).unwrap().window().offset, 0);
        assert_eq!(request(3, 25).unwrap().window().offset, 50);
    }

    #[test]
    fn test_page_beyond_last_is_out_of_range() {
        let req = request(4, 2).unwrap();
        assert_eq!(
            req.resolve(5),
            Err(PaginationError::OutOfRange { page: 4, max_pages: 3 })
        );
        let last = request(3, 2).unwrap().resolve(5).unwrap();
        assert_eq!(last.window, PageWindow { offset: 4, limit: 2 });
        assert_eq!(last.max_pages, 3);
    }

    #[test]
    fn test_empty_result_is_not_found() {
        assert_eq!(request(1, 10).unwrap().resolve(0), Err(PaginationError::NotFound));
    }

    #[test]
    fn test_first_page_matches_zero_skip() {
        let items: Vec<u32> = (0..17).collect();
        for limit in 1..=20u64 {
            let by_page: Vec<_> = request(1, limit as i64).unwrap().window().apply(&items).collect();
            let by_skip: Vec<_> = skip_window(0, limit).apply(&items).collect();
            assert_eq!(by_page, by_skip);
        }
    }

    #[test]
    fn test_page_size_never_exceeds_limit() {
        let items: Vec<u32> = (0..23).collect();
        for limit in 1..=10u64 {
            let resolved_pages = max_pages(items.len() as u64, limit);
            for page in 1..=resolved_pages {
                let resolved = request(page as i64, limit as i64)
                    .unwrap()
                    .resolve(items.len() as u64)
                    .unwrap();
                let taken = resolved.window.apply(&items).count() as u64;
                assert!(taken >= 1 && taken <= limit);
            }
        }
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let req = PageRequest { page: u64::MAX, limit: u64::MAX };
        assert_eq!(req.window().offset, u64::MAX);
    }
}
