//! Holds the most recently loaded product snapshot.

use crate::catalog::models::Product;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// An immutable, fully normalized product set with its derived metadata.
#[derive(Debug, Default)]
pub struct Snapshot {
    products: Vec<Product>,
    categories: Vec<String>,
}

impl Snapshot {
    /// Builds a snapshot, deriving the sorted distinct category list.
    pub fn new(products: Vec<Product>) -> Self {
        let categories = products
            .iter()
            .map(|p| p.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Self { products, categories }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Distinct categories in lexicographic order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Catalog store. Replacement swaps the whole snapshot at once, so a reader
/// holding a [`Snapshot`] never observes a partially updated set.
#[derive(Debug, Default)]
pub struct CatalogStore {
    current: Arc<Snapshot>,
}

impl CatalogStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the snapshot with `products`.
    pub fn replace(&mut self, products: Vec<Product>) {
        let snapshot = Snapshot::new(products);
        debug!(
            "Replacing catalog snapshot: {} products, {} categories",
            snapshot.len(),
            snapshot.categories().len()
        );
        self.current = Arc::new(snapshot);
    }

    /// Installs an empty snapshot.
    pub fn clear(&mut self) {
        self.current = Arc::new(Snapshot::default());
    }

    /// Returns a shared handle to the current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current)
    }

    pub fn products(&self) -> &[Product] {
        self.current.products()
    }

    pub fn categories(&self) -> &[String] {
        self.current.categories()
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}
