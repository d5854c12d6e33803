//! Catalog controller: load -> normalize -> filter -> paginate.
//!
//! Every mutation goes through a named method that recomputes what it
//! affects. Filter changes recompute the filtered sequence and go back to
//! page 1, so a stale page number can never point past the end of a shrunk
//! result set. Page navigation only moves the page.
//!
//! Loads are ticketed. Only the most recently started load may apply its
//! result; a slower, older load that finishes late is discarded.

use crate::catalog::{CatalogStore, Normalizer, Product, ProductSource, RawProduct, Snapshot};
use crate::error::CatalogError;
use crate::favorites::FavoritesRegistry;
use crate::filters::{self, Availability, Facets, FilterState, PriceRange};
use crate::pager::{self, Page, PageMarker, PAGE_SIZE};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where the controller is in its load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Identifies one load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Everything the presentation layer needs to render the catalog.
#[derive(Debug, Serialize)]
pub struct CatalogView<'a> {
    pub state: LoadState,
    pub error: Option<&'a str>,
    pub page: Option<Page<'a>>,
    pub page_links: Vec<PageMarker>,
    pub filters: &'a FilterState,
    pub categories: &'a [String],
    pub total_products: usize,
    pub favorites: &'a [String],
}

pub struct CatalogController {
    source: Box<dyn ProductSource>,
    favorites: FavoritesRegistry,
    store: CatalogStore,
    filters: FilterState,
    filtered: Vec<Product>,
    current_page: usize,
    state: LoadState,
    error: Option<String>,
    generation: u64,
}

impl CatalogController {
    pub fn new(source: impl ProductSource + 'static, favorites: FavoritesRegistry) -> Self {
        Self::from_boxed(Box::new(source), favorites)
    }

    /// Like [`CatalogController::new`] for a source chosen at runtime.
    pub fn from_boxed(source: Box<dyn ProductSource>, favorites: FavoritesRegistry) -> Self {
        Self {
            source,
            favorites,
            store: CatalogStore::new(),
            filters: FilterState::default(),
            filtered: Vec::new(),
            current_page: 1,
            state: LoadState::Idle,
            error: None,
            generation: 0,
        }
    }

    /// Starts with `filters` instead of the permissive defaults.
    pub fn with_filters(mut self, filters: FilterState) -> Self {
        self.filters = filters;
        self.recompute();
        self
    }

    // Loading

    /// Fetches, normalizes and installs a fresh snapshot.
    pub async fn load(&mut self) -> LoadState {
        let ticket = self.begin_load();
        let result = self.source.fetch_products().await;
        self.complete_load(ticket, result);
        self.state
    }

    /// Loads again after a failure. Does nothing in other states.
    pub async fn retry(&mut self) -> LoadState {
        if self.state != LoadState::Failed {
            debug!("Retry ignored in state {:?}", self.state);
            return self.state;
        }
        self.load().await
    }

    /// Enters `Loading` and issues a ticket that supersedes all earlier ones.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        self.error = None;
        info!("Loading products from {}", self.source.describe());
        LoadTicket(self.generation)
    }

    /// Applies the outcome of a load. Returns false if `ticket` is stale.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<RawProduct>, CatalogError>,
    ) -> bool {
        if ticket.0 != self.generation {
            debug!("Discarding stale load {} (current is {})", ticket.0, self.generation);
            return false;
        }

        match result {
            Ok(records) => {
                let products = Normalizer::new().normalize_all(&records);
                info!("Loaded {} products", products.len());
                self.store.replace(products);
                self.state = LoadState::Ready;
                self.error = None;
            }
            Err(e) => {
                warn!("Failed to load products: {}", e);
                self.store.clear();
                self.state = LoadState::Failed;
                self.error = Some(e.to_string());
            }
        }

        self.recompute();
        true
    }

    // Filter mutations

    /// Selects one category; `None` selects all.
    pub fn set_category(&mut self, category: Option<String>) {
        self.filters.category = category;
        self.recompute();
    }

    pub fn set_price_range(&mut self, range: PriceRange) {
        self.filters.price_range = range;
        self.recompute();
    }

    pub fn set_availability(&mut self, availability: Availability) {
        self.filters.availability = availability;
        self.recompute();
    }

    /// Adds or removes one tag from the selection.
    pub fn toggle_tag(&mut self, tag: &str) {
        self.filters.toggle_tag(tag);
        self.recompute();
    }

    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.tags = tags.into_iter().map(Into::into).collect();
        self.recompute();
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filters.search = term.into();
        self.recompute();
    }

    pub fn toggle_favorites_only(&mut self) {
        self.filters.favorites_only = !self.filters.favorites_only;
        self.recompute();
    }

    /// Replaces the whole filter state at once.
    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.recompute();
    }

    /// Resets every filter, the search term and favorites-only.
    pub fn clear_filters(&mut self) {
        self.filters.reset();
        self.recompute();
    }

    // Favorites

    /// Flips `id` in the favorites registry. Returns whether it is now a favorite.
    ///
    /// A persistence failure is returned but the toggle stays applied, and the
    /// view is refreshed either way when favorites-only is active.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, CatalogError> {
        let result = self.favorites.toggle(id);
        if self.filters.favorites_only {
            self.recompute();
        }
        result
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn favorites(&self) -> &FavoritesRegistry {
        &self.favorites
    }

    // Navigation

    /// Moves to page `n`, clamped to the available pages.
    pub fn go_to_page(&mut self, n: usize) {
        self.current_page = pager::clamp_page(n, self.total_pages());
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.current_page + 1);
    }

    pub fn previous_page(&mut self) {
        self.go_to_page(self.current_page.saturating_sub(1));
    }

    // Read side

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filters
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        pager::total_pages(self.filtered.len(), PAGE_SIZE)
    }

    /// The current page, or `None` when nothing matches.
    pub fn page(&self) -> Option<Page<'_>> {
        pager::paginate(&self.filtered, self.current_page, PAGE_SIZE)
    }

    /// The full filtered sequence.
    pub fn filtered(&self) -> &[Product] {
        &self.filtered
    }

    pub fn total_filtered(&self) -> usize {
        self.filtered.len()
    }

    pub fn categories(&self) -> &[String] {
        self.store.categories()
    }

    /// The unfiltered snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.snapshot()
    }

    /// Per-option counts over the unfiltered snapshot.
    pub fn facets(&self) -> Facets {
        Facets::from_products(self.store.products())
    }

    pub fn view(&self) -> CatalogView<'_> {
        CatalogView {
            state: self.state,
            error: self.error_message(),
            page: self.page(),
            page_links: pager::page_window(self.current_page, self.total_pages()),
            filters: &self.filters,
            categories: self.categories(),
            total_products: self.filtered.len(),
            favorites: self.favorites.ids(),
        }
    }

    fn recompute(&mut self) {
        let favorites = if self.filters.favorites_only {
            self.favorites.get_all()
        } else {
            Default::default()
        };
        self.filtered = filters::apply(self.store.products(), &favorites, &self.filters);
        self.current_page = 1;
        debug!("{} products after filtering", self.filtered.len());
    }
}
