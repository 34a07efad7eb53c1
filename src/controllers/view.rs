//! In-memory filtering of a loaded page and the view model handed to the
//! presentation layer.

use crate::api::{PageFilters, PageResult};
use crate::models::{Broker, Listing};
use serde::Serialize;

/// Items that can be matched by the search box and type selector
pub trait Searchable {
    /// Fields the search term is matched against
    fn search_fields(&self) -> Vec<&str>;

    /// Value compared against the type selector; `None` means the
    /// selector does not apply to this resource.
    fn type_label(&self) -> Option<&str> {
        None
    }
}

impl Searchable for Listing {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.broker.name.as_str(),
            self.broker.email.as_deref().unwrap_or(""),
            self.admin_status.as_str(),
        ]
    }

    fn type_label(&self) -> Option<&str> {
        Some(self.listing_type.as_str())
    }
}

impl Searchable for Broker {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.email.as_deref().unwrap_or(""),
            self.status.as_deref().unwrap_or(""),
        ]
    }
}

pub fn matches<T: Searchable>(item: &T, filters: &PageFilters) -> bool {
    let matches_search = match filters.search_needle() {
        Some(needle) => item
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle)),
        None => true,
    };

    let matches_type = match (filters.type_filter(), item.type_label()) {
        (Some(wanted), Some(label)) => label == wanted,
        _ => true,
    };

    matches_search && matches_type
}

/// A loaded page after client-side filtering.
///
/// `total_count` and `page_count` describe the unfiltered server collection;
/// `matched_count` only covers the items of this page that passed the filters.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageView<T> {
    pub items: Vec<T>,
    pub matched_count: usize,
    pub page_number: u32,
    pub total_count: u64,
    pub page_count: u64,
}

impl<T: Searchable + Clone> PageView<T> {
    pub fn new(page: &PageResult<T>, filters: &PageFilters) -> Self {
        let items: Vec<T> = page
            .items
            .iter()
            .filter(|item| matches(*item, filters))
            .cloned()
            .collect();

        Self {
            matched_count: items.len(),
            items,
            page_number: page.page_number,
            total_count: page.total_count,
            page_count: page.page_count,
        }
    }
}

impl<T> PageView<T> {
    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page_number) < self.page_count
    }

    /// Numbered buttons of the pagination strip
    pub fn pages(&self) -> std::ops::RangeInclusive<u64> {
        1..=self.page_count
    }
}
