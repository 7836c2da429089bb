//! Common wire types shared by the client services

use serde::{Deserialize, Serialize};

/// Name of the response header carrying pagination metadata.
pub const PAGINATION_HEADER: &str = "Pagination";

/// Pagination metadata, sent as JSON in the `Pagination` response header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub items_per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }
}

/// Response payload paired with optional pagination metadata.
///
/// `pagination` is `None` when the response carried no `Pagination` header,
/// which means "unknown", not "empty".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub result: T,
    pub pagination: Option<Pagination>,
}

impl<T> PaginatedResult<T> {
    pub fn new(result: T, pagination: Option<Pagination>) -> Self {
        Self { result, pagination }
    }

    pub fn is_paginated(&self) -> bool {
        self.pagination.is_some()
    }
}

/// Ordered query-string pairs, in the order they are sent.
pub type QueryPairs = Vec<(String, String)>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_header_shape() {
        let header = r#"{"currentPage":2,"itemsPerPage":5,"totalItems":12,"totalPages":3}"#;
        let pagination: Pagination = serde_json::from_str(header).unwrap();
        assert_eq!(
            pagination,
            Pagination {
                current_page: 2,
                items_per_page: 5,
                total_items: 12,
                total_pages: 3,
            }
        );
        assert!(pagination.has_next());
        assert!(pagination.has_prev());
    }
}
