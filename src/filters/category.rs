//! Exact-match category filter.

use super::Filter;
use crate::catalog::Product;

/// Selection value meaning "every category".
pub const ALL_CATEGORIES: &str = "all";

/// Interprets a category selection; `"all"` (or blank) selects nothing.
pub fn parse_category(selection: &str) -> Option<String> {
    let selection = selection.trim();
    if selection.is_empty() || selection.eq_ignore_ascii_case(ALL_CATEGORIES) {
        None
    } else {
        Some(selection.to_string())
    }
}

pub struct CategoryFilter {
    category: String,
}

impl CategoryFilter {
    pub fn new(category: impl Into<String>) -> Self {
        Self { category: category.into() }
    }
}

impl Filter for CategoryFilter {
    fn matches(&self, product: &Product) -> bool {
        product.category == self.category
    }

    fn description(&self) -> String {
        format!("Category: {}", self.category)
    }
}
