//! Page bounds and in-memory pagination.

use screener_core::{Page, Window};
use serde::{Deserialize, Serialize};

/// Hard ceiling on the page size, whatever the configured limits say.
pub const MAX_PAGE_SIZE: usize = 500;

/// Page size bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLimits {
    /// Size used when none is requested
    pub default_page_size: usize,
    /// Largest allowed size
    pub max_page_size: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// A clamped page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number
    pub page: usize,
    /// Items per page, within `[1, min(max_page_size, MAX_PAGE_SIZE)]`
    pub page_size: usize,
}

impl PageRequest {
    /// Clamp a numeric request.
    pub fn new(page: i64, page_size: i64, limits: &PageLimits) -> Self {
        let max = limits.max_page_size.clamp(1, MAX_PAGE_SIZE) as i64;
        Self {
            page: page.max(1) as usize,
            page_size: page_size.clamp(1, max) as usize,
        }
    }

    /// Parse raw request values; absent or non-numeric values take defaults.
    pub fn parse(page: Option<&str>, page_size: Option<&str>, limits: &PageLimits) -> Self {
        let read = |v: Option<&str>| v.and_then(|s| s.trim().parse::<i64>().ok());
        Self::new(
            read(page).unwrap_or(1),
            read(page_size).unwrap_or(limits.default_page_size as i64),
            limits,
        )
    }

    /// Store window covering this page.
    pub fn window(&self) -> Window {
        Window {
            skip: (self.page - 1).saturating_mul(self.page_size),
            limit: Some(self.page_size),
        }
    }
}

/// Slice a fully sorted sequence into one page.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len();
    let window = request.window();
    let data = items
        .into_iter()
        .skip(window.skip)
        .take(request.page_size)
        .collect();
    Page::new(request.page, request.page_size, total, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamping() {
        let limits = PageLimits::default();
        let request = PageRequest::new(0, 1000, &limits);
        assert_eq!(request, PageRequest { page: 1, page_size: 500 });

        let request = PageRequest::new(-4, 0, &limits);
        assert_eq!(request, PageRequest { page: 1, page_size: 1 });
    }

    #[test]
    fn test_configured_limit_cannot_exceed_ceiling() {
        let limits = PageLimits {
            default_page_size: 50,
            max_page_size: 1000,
        };
        let request = PageRequest::new(1, 1000, &limits);
        assert_eq!(request.page_size, MAX_PAGE_SIZE);

        let request = PageRequest::parse(None, Some("750"), &limits);
        assert_eq!(request.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_parse_defaults() {
        let limits = PageLimits::default();
        assert_eq!(
            PageRequest::parse(None, None, &limits),
            PageRequest { page: 1, page_size: 50 }
        );
        assert_eq!(
            PageRequest::parse(Some("two"), Some("ten"), &limits),
            PageRequest { page: 1, page_size: 50 }
        );
        assert_eq!(
            PageRequest::parse(Some("3"), Some("1000"), &limits),
            PageRequest { page: 3, page_size: 500 }
        );
    }

    #[test]
    fn test_paginate() {
        let limits = PageLimits::default();
        let items: Vec<u32> = (0..7).collect();

        let page = paginate(items.clone(), PageRequest::new(2, 3, &limits));
        assert_eq!(page.data, vec![3, 4, 5]);
        assert_eq!(page.total_count, 7);
        assert_eq!(page.total_pages, 3);

        let page = paginate(items.clone(), PageRequest::new(3, 3, &limits));
        assert_eq!(page.data, vec![6]);

        let page = paginate(items, PageRequest::new(9, 3, &limits));
        assert!(page.data.is_empty());
        assert_eq!(page.page, 9);
    }
}
