//! Paginated responses.

use serde::{Deserialize, Serialize};

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// 1-based page number
    pub page: usize,
    /// Page size
    pub limit: usize,
    /// Items across all pages
    pub total_count: usize,
    /// `ceil(total_count / limit)`
    pub total_pages: usize,
    /// Items on this page
    pub data: Vec<T>,
}

impl<T> Page<T> {
    /// Build a page, deriving the page count.
    pub fn new(page: usize, limit: usize, total_count: usize, data: Vec<T>) -> Self {
        Self {
            page,
            limit,
            total_count,
            total_pages: total_pages(total_count, limit),
            data,
        }
    }
}

/// `ceil(total_count / limit)`, zero when `limit` is zero.
pub fn total_pages(total_count: usize, limit: usize) -> usize {
    if limit == 0 {
        0
    } else {
        total_count.div_ceil(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 50), 0);
        assert_eq!(total_pages(1, 50), 1);
        assert_eq!(total_pages(50, 50), 1);
        assert_eq!(total_pages(51, 50), 2);
        assert_eq!(total_pages(1001, 500), 3);
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let page = Page::new(1, 2, 3, vec![1, 2]);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalCount"], 3);
        assert_eq!(json["totalPages"], 2);
    }
}
