//! Favorites-only filter.

use super::Filter;
use crate::catalog::Product;
use std::collections::HashSet;

/// Keeps products whose id is in the favorites set.
pub struct FavoritesFilter {
    ids: HashSet<String>,
}

impl FavoritesFilter {
    pub fn new(ids: HashSet<String>) -> Self {
        Self { ids }
    }
}

impl Filter for FavoritesFilter {
    fn matches(&self, product: &Product) -> bool {
        self.ids.contains(&product.id)
    }

    fn description(&self) -> String {
        format!("Favorites only ({})", self.ids.len())
    }
}
