//! Favorites command implementation.

use crate::config::Config;
use crate::favorites::{FavoritesRegistry, FavoritesStore};
use crate::format::Formatter;
use anyhow::{Context, Result};
use tracing::info;

/// Toggles and lists persisted favorites. Works without loading the catalog.
pub struct FavoritesCommand {
    config: Config,
}

impl FavoritesCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Adds `id` to favorites, or removes it if already present.
    pub fn toggle(&self, id: &str) -> Result<String> {
        self.toggle_with_store(self.config.favorites_store()?, id)
    }

    pub fn toggle_with_store(&self, store: impl FavoritesStore + 'static, id: &str) -> Result<String> {
        let mut registry = FavoritesRegistry::load(store);
        let added = registry.toggle(id).context("Failed to save favorites")?;

        info!("{} favorites stored", registry.len());
        Ok(if added {
            format!("Added {} to favorites", id)
        } else {
            format!("Removed {} from favorites", id)
        })
    }

    /// Lists every favorite id, including ids not present in the current catalog.
    pub fn list(&self) -> Result<String> {
        self.list_with_store(self.config.favorites_store()?)
    }

    pub fn list_with_store(&self, store: impl FavoritesStore + 'static) -> Result<String> {
        let registry = FavoritesRegistry::load(store);
        Ok(Formatter::new(self.config.format).format_favorites(registry.ids()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::favorites::{JsonFileStore, MemoryStore};
    use tempfile::TempDir;

    #[test]
    fn test_toggle_adds_then_removes() {
        let cmd = FavoritesCommand::new(Config::default());
        let store = MemoryStore::new();

        let output = cmd.toggle_with_store(store.clone(), "lamp-1").unwrap();
        assert_eq!(output, "Added lamp-1 to favorites");
        assert_eq!(store.persisted(), vec!["lamp-1"]);

        let output = cmd.toggle_with_store(store.clone(), "lamp-1").unwrap();
        assert_eq!(output, "Removed lamp-1 from favorites");
        assert!(store.persisted().is_empty());
    }

    #[test]
    fn test_toggle_write_failure() {
        let cmd = FavoritesCommand::new(Config::default());
        let store = MemoryStore::new();
        store.set_fail_writes(true);

        let err = cmd.toggle_with_store(store, "lamp-1").unwrap_err();
        assert!(err.to_string().contains("Failed to save favorites"));
    }

    #[test]
    fn test_list() {
        let cmd = FavoritesCommand::new(Config::default());
        let output = cmd.list_with_store(MemoryStore::with_ids(&["a", "b"])).unwrap();
        assert_eq!(output, "a\nb");

        let output = cmd.list_with_store(MemoryStore::new()).unwrap();
        assert_eq!(output, "No favorites.");
    }

    #[test]
    fn test_configured_file_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("favorites.json");
        let config = Config {
            favorites_path: Some(path.clone()),
            format: OutputFormat::Json,
            ..Config::default()
        };
        let cmd = FavoritesCommand::new(config);

        cmd.toggle("x1").unwrap();
        cmd.toggle("x2").unwrap();
        assert_eq!(cmd.list().unwrap(), r#"{"favorites":["x1","x2"]}"#);

        // A fresh command sees what the previous one persisted
        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.read().unwrap(), vec!["x1", "x2"]);
    }
}
