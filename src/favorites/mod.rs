//! Favorites registry: product ids the user has marked, persisted best-effort.
//!
//! The in-memory set is authoritative for the session. A failed read starts
//! the session empty; a failed write is reported to the caller but the
//! toggle it belonged to stays applied.

pub mod store;

use crate::error::CatalogError;
use std::collections::HashSet;
use tracing::{debug, warn};

pub use store::{FavoritesStore, JsonFileStore, MemoryStore};

/// Favorite product ids backed by a [`FavoritesStore`].
///
/// Ids are kept in the order they were added and may reference products
/// that are not in the current catalog.
pub struct FavoritesRegistry {
    store: Box<dyn FavoritesStore>,
    ids: Vec<String>,
}

impl FavoritesRegistry {
    /// Creates a registry, reading the persisted set from `store`.
    pub fn load(store: impl FavoritesStore + 'static) -> Self {
        let mut registry = Self { store: Box::new(store), ids: Vec::new() };
        registry.reload();
        registry
    }

    /// Re-reads the persisted set, replacing the in-memory one.
    pub fn reload(&mut self) {
        self.ids = match self.store.read() {
            Ok(ids) => {
                let mut seen = HashSet::new();
                ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
            }
            Err(e) => {
                warn!("{}; starting with no favorites", e);
                Vec::new()
            }
        };
        debug!("Loaded {} favorites", self.ids.len());
    }

    /// Returns a copy of the current id set.
    pub fn get_all(&self) -> HashSet<String> {
        self.ids.iter().cloned().collect()
    }

    /// Ids in the order they were added.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|fav| fav == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Flips membership of `id` and persists the new set.
    ///
    /// Returns whether `id` is now a favorite. On a write failure the error
    /// is returned and the in-memory change is kept.
    pub fn toggle(&mut self, id: &str) -> Result<bool, CatalogError> {
        let added = match self.ids.iter().position(|fav| fav == id) {
            Some(index) => {
                self.ids.remove(index);
                false
            }
            None => {
                self.ids.push(id.to_string());
                true
            }
        };
        debug!("Favorite {} {}", id, if added { "added" } else { "removed" });

        self.store.write(&self.ids).map_err(|e| {
            warn!("{}", e);
            e
        })?;

        Ok(added)
    }
}

impl std::fmt::Debug for FavoritesRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesRegistry").field("ids", &self.ids).finish()
    }
}
