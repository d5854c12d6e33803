//! Product filtering system with composable filters.
//!
//! [`apply`] runs the stages in a fixed order: favorites-only, free-text
//! search, category, price range, availability, tags. Stages whose selection
//! is permissive are left out of the chain, and filtering is stable, so the
//! output keeps the snapshot's relative order.

pub mod availability;
pub mod category;
pub mod facets;
pub mod favorites;
pub mod price;
pub mod search;
pub mod tags;

use crate::catalog::Product;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

pub use availability::{Availability, AvailabilityFilter};
pub use category::{parse_category, CategoryFilter, ALL_CATEGORIES};
pub use facets::{FacetCount, Facets};
pub use favorites::FavoritesFilter;
pub use price::{PriceFilter, PriceRange};
pub use search::SearchFilter;
pub use tags::TagFilter;

/// Trait for filtering products.
pub trait Filter: Send + Sync {
    /// Returns true if the product passes the filter.
    fn matches(&self, product: &Product) -> bool;

    /// Returns a description of this filter.
    fn description(&self) -> String;
}

/// Every user-selectable filter dimension. The default selects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    /// Selected category; `None` means all
    pub category: Option<String>,
    pub price_range: PriceRange,
    pub availability: Availability,
    /// Selected tags, OR-combined
    pub tags: BTreeSet<String>,
    /// Free-text search term
    pub search: String,
    pub favorites_only: bool,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores every dimension to its permissive default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Adds `tag` if absent, removes it if present. Returns true if now selected.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if self.tags.remove(tag) {
            false
        } else {
            self.tags.insert(tag.to_string());
            true
        }
    }

    /// Returns true if a sidebar filter (category, price, availability or tags) is set.
    pub fn has_active_filters(&self) -> bool {
        self.category.is_some()
            || self.price_range != PriceRange::All
            || self.availability != Availability::All
            || !self.tags.is_empty()
    }

    /// Returns true if every stage would pass everything through.
    pub fn is_permissive(&self) -> bool {
        !self.has_active_filters() && self.search.trim().is_empty() && !self.favorites_only
    }
}

/// A chain of filters that must all pass.
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    /// Creates an empty filter chain.
    pub fn new() -> Self {
        Self { filters: Vec::new() }
    }

    /// Adds a filter to the chain.
    pub fn add(&mut self, filter: impl Filter + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Checks if a product passes all filters, in chain order.
    pub fn matches(&self, product: &Product) -> bool {
        self.filters.iter().all(|f| f.matches(product))
    }

    /// Filters a collection of products, keeping their relative order.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        products.iter().filter(|p| self.matches(p)).cloned().collect()
    }

    /// Returns true if no filters are configured.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns the number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns descriptions of all filters.
    pub fn descriptions(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.description()).collect()
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing a FilterChain. Permissive selections add nothing.
pub struct FilterChainBuilder {
    chain: FilterChain,
}

impl FilterChainBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self { chain: FilterChain::new() }
    }

    /// Builds the chain for `state` in pipeline order.
    pub fn from_state(state: &FilterState, favorites: &HashSet<String>) -> FilterChain {
        Self::new()
            .favorites_only(state.favorites_only, favorites)
            .search(&state.search)
            .category(state.category.as_deref())
            .price_range(state.price_range)
            .availability(state.availability)
            .tags(&state.tags)
            .build()
    }

    /// Adds a favorites-only filter.
    pub fn favorites_only(mut self, enabled: bool, favorites: &HashSet<String>) -> Self {
        if enabled {
            self.chain.add(FavoritesFilter::new(favorites.clone()));
        }
        self
    }

    /// Adds a free-text search filter.
    pub fn search(mut self, term: &str) -> Self {
        let filter = SearchFilter::new(term);
        if !filter.is_blank() {
            self.chain.add(filter);
        }
        self
    }

    /// Adds a category filter.
    pub fn category(mut self, category: Option<&str>) -> Self {
        if let Some(category) = category {
            self.chain.add(CategoryFilter::new(category));
        }
        self
    }

    /// Adds a price bracket filter.
    pub fn price_range(mut self, range: PriceRange) -> Self {
        if range != PriceRange::All {
            self.chain.add(PriceFilter::new(range));
        }
        self
    }

    /// Adds an availability filter.
    pub fn availability(mut self, availability: Availability) -> Self {
        if availability != Availability::All {
            self.chain.add(AvailabilityFilter::new(availability));
        }
        self
    }

    /// Adds a tag filter (any of `tags`).
    pub fn tags(mut self, tags: &BTreeSet<String>) -> Self {
        if !tags.is_empty() {
            self.chain.add(TagFilter::new(tags.iter().cloned()));
        }
        self
    }

    /// Builds the filter chain.
    pub fn build(self) -> FilterChain {
        self.chain
    }
}

impl Default for FilterChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the filter pipeline over `products`.
pub fn apply(products: &[Product], favorites: &HashSet<String>, state: &FilterState) -> Vec<Product> {
    if state.is_permissive() {
        return products.to_vec();
    }

    let chain = FilterChainBuilder::from_state(state, favorites);
    debug!("Active filters: {}", chain.descriptions().join(", "));
    let filtered = chain.apply(products);
    debug!("{} of {} products match", filtered.len(), products.len());
    filtered
}
