use serde::{Deserialize, Serialize};

/// In-memory filters for a loaded page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageFilters {
    /// Case-insensitive substring over name, email and status
    pub search_term: Option<String>,
    /// Exact listing type; `None` or "All" disables the filter
    pub listing_type: Option<String>,
}

impl PageFilters {
    pub fn is_empty(&self) -> bool {
        self.search_needle().is_none() && self.type_filter().is_none()
    }

    pub(crate) fn search_needle(&self) -> Option<String> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }

    pub(crate) fn type_filter(&self) -> Option<&str> {
        self.listing_type
            .as_deref()
            .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("all"))
    }
}

/// Pagination unit sent to the remote API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page_number: u32,
    pub page_size: u32,
    pub filters: PageFilters,
}

impl PageRequest {
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
            filters: PageFilters::default(),
        }
    }

    #[must_use]
    pub fn with_filters(mut self, filters: PageFilters) -> Self {
        self.filters = filters;
        self
    }

    #[must_use]
    pub fn with_page(mut self, page_number: u32) -> Self {
        self.page_number = page_number;
        self
    }

    /// Page number and size are what the server sees; filters stay local.
    pub fn same_server_page(&self, other: &PageRequest) -> bool {
        self.page_number == other.page_number && self.page_size == other.page_size
    }
}

/// One page of a resource collection as returned by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    /// Unfiltered total across all pages
    pub total_count: u64,
    pub page_count: u64,
}

impl<T> PageResult<T> {
    /// `page_count` is always derived as `ceil(total / page_size)`.
    pub fn new(items: Vec<T>, page_number: u32, page_size: u32, total_count: u64) -> Self {
        Self {
            items,
            page_number,
            page_size,
            total_count,
            page_count: page_count(total_count, page_size),
        }
    }
}

pub fn page_count(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size))
}
