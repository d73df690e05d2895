//! Search and pagination over fetched listings

use super::models::{MusicItem, PortfolioItem, VideoItem};

/// Items that can be matched against a free-text search
pub trait Searchable {
    /// `needle` is already lowercased
    fn matches(&self, needle: &str) -> bool;
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl Searchable for MusicItem {
    fn matches(&self, needle: &str) -> bool {
        contains_ci(&self.title, needle) || contains_ci(&self.category, needle)
    }
}

impl Searchable for VideoItem {
    fn matches(&self, needle: &str) -> bool {
        contains_ci(&self.title, needle) || contains_ci(&self.category, needle)
    }
}

impl Searchable for PortfolioItem {
    fn matches(&self, needle: &str) -> bool {
        contains_ci(&self.title, needle) || contains_ci(&self.category, needle)
    }
}

/// Keep items matching `search`; blank searches keep everything
pub fn search<T: Searchable>(items: Vec<T>, search: Option<&str>) -> Vec<T> {
    match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(needle) => {
            let needle = needle.to_lowercase();
            items
                .into_iter()
                .filter(|item| item.matches(&needle))
                .collect()
        }
        None => items,
    }
}

/// One page of `items` plus the total before slicing
///
/// Pages are 1-based; a page past the end is empty.
pub fn paginate<T>(items: Vec<T>, page: u32, per_page: u32) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let per_page = per_page.max(1) as usize;
    let start = (page.max(1) as usize - 1).saturating_mul(per_page);

    let page_items = items.into_iter().skip(start).take(per_page).collect();
    (page_items, total)
}
