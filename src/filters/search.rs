//! Free-text search over name and description.

use super::Filter;
use crate::catalog::Product;

/// Case-insensitive substring match against the name or the description.
pub struct SearchFilter {
    term: String,
}

impl SearchFilter {
    /// Creates a search filter; the term is trimmed and lowercased.
    pub fn new(term: &str) -> Self {
        Self { term: term.trim().to_lowercase() }
    }

    /// Returns true if the term is blank and the filter would match everything.
    pub fn is_blank(&self) -> bool {
        self.term.is_empty()
    }
}

impl Filter for SearchFilter {
    fn matches(&self, product: &Product) -> bool {
        product.name.to_lowercase().contains(&self.term)
            || product.description.to_lowercase().contains(&self.term)
    }

    fn description(&self) -> String {
        format!("Search: \"{}\"", self.term)
    }
}
