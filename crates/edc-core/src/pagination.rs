//! Pagination types for API responses

use serde::{Deserialize, Serialize};

/// Pagination parameters (from query string)
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Offset of the first element
    #[serde(default)]
    pub offset: usize,

    /// Items per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    50
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: 0,
            page_size: default_page_size(),
        }
    }
}

impl PaginationParams {
    pub const MAX_PAGE_SIZE: usize = 1000;

    pub fn new(offset: usize, page_size: usize) -> Self {
        Self {
            offset,
            page_size: page_size.clamp(1, Self::MAX_PAGE_SIZE),
        }
    }

    /// Effective page size after clamping
    pub fn limit(&self) -> usize {
        self.page_size.clamp(1, Self::MAX_PAGE_SIZE)
    }
}

/// Paginated collection response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Total count of items
    pub total: usize,
    /// Number of items in this page
    pub count: usize,
    pub page_size: usize,
    pub offset: usize,
    pub elements: Vec<T>,
}

impl<T> Page<T> {
    /// Slice an already-filtered, already-sorted list
    pub fn from_items(items: Vec<T>, params: &PaginationParams) -> Self {
        let total = items.len();
        let limit = params.limit();
        let elements: Vec<T> = items.into_iter().skip(params.offset).take(limit).collect();
        Self {
            total,
            count: elements.len(),
            page_size: limit,
            offset: params.offset,
            elements,
        }
    }

    pub fn has_next(&self) -> bool {
        self.offset + self.count < self.total
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            total: self.total,
            count: self.count,
            page_size: self.page_size,
            offset: self.offset,
            elements: self.elements.into_iter().map(f).collect(),
        }
    }
}
