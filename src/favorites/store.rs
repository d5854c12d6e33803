//! Persistence backends for favorite product ids.

use crate::error::CatalogError;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Read-all / write-all persistence for favorite ids.
pub trait FavoritesStore: Send + Sync {
    fn read(&self) -> Result<Vec<String>, CatalogError>;

    fn write(&self, ids: &[String]) -> Result<(), CatalogError>;
}

/// Stores favorites as a JSON array of ids in a file.
///
/// A missing file reads as an empty set.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the user's data directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("catalog-view").join("favorites.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read_error(&self, reason: impl ToString) -> CatalogError {
        CatalogError::PersistenceRead {
            location: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    fn write_error(&self, reason: impl ToString) -> CatalogError {
        CatalogError::PersistenceWrite {
            location: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl FavoritesStore for JsonFileStore {
    fn read(&self) -> Result<Vec<String>, CatalogError> {
        if !self.path.exists() {
            debug!("No favorites file at {}", self.path.display());
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| self.read_error(e))?;
        serde_json::from_str(&content).map_err(|e| self.read_error(e))
    }

    fn write(&self, ids: &[String]) -> Result<(), CatalogError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
            }
        }

        // Readers must never observe a partially written file
        let content = serde_json::to_string(ids).map_err(|e| self.write_error(e))?;
        let tmp = self.temp_path();
        std::fs::write(&tmp, content).map_err(|e| self.write_error(e))?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(self.write_error(e));
        }
        debug!("Saved {} favorites to {}", ids.len(), self.path.display());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    ids: Vec<String>,
    fail_reads: bool,
    fail_writes: bool,
}

/// Shared in-memory store. Clones see the same data, which makes it handy
/// for simulating a reload; reads and writes can be made to fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `ids`.
    pub fn with_ids(ids: &[&str]) -> Self {
        let store = Self::new();
        if let Ok(mut state) = store.state.lock() {
            state.ids = ids.iter().map(|id| id.to_string()).collect();
        }
        store
    }

    pub fn set_fail_reads(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_reads = fail;
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_writes = fail;
        }
    }

    /// Ids as last written.
    pub fn persisted(&self) -> Vec<String> {
        self.state.lock().map(|state| state.ids.clone()).unwrap_or_default()
    }
}

impl FavoritesStore for MemoryStore {
    fn read(&self) -> Result<Vec<String>, CatalogError> {
        let state = self.state.lock().map_err(|_| CatalogError::PersistenceRead {
            location: "memory".to_string(),
            reason: "lock poisoned".to_string(),
        })?;

        if state.fail_reads {
            return Err(CatalogError::PersistenceRead {
                location: "memory".to_string(),
                reason: "read failure injected".to_string(),
            });
        }
        Ok(state.ids.clone())
    }

    fn write(&self, ids: &[String]) -> Result<(), CatalogError> {
        let mut state = self.state.lock().map_err(|_| CatalogError::PersistenceWrite {
            location: "memory".to_string(),
            reason: "lock poisoned".to_string(),
        })?;

        if state.fail_writes {
            return Err(CatalogError::PersistenceWrite {
                location: "memory".to_string(),
                reason: "write failure injected".to_string(),
            });
        }
        state.ids = ids.to_vec();
        Ok(())
    }
}
