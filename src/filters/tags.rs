//! Tag filter with OR semantics.

use super::Filter;
use crate::catalog::Product;

/// Keeps products carrying at least one of the selected tags.
pub struct TagFilter {
    tags: Vec<String>,
}

impl TagFilter {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { tags: tags.into_iter().map(Into::into).collect() }
    }
}

impl Filter for TagFilter {
    fn matches(&self, product: &Product) -> bool {
        self.tags.iter().any(|tag| product.has_tag(tag))
    }

    fn description(&self) -> String {
        format!("Tags (any): {}", self.tags.join(", "))
    }
}
