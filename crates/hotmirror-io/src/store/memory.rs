//! In-memory store for testing.
//!
//! Every write replaces the whole entry under one lock, which gives the same
//! all-or-nothing visibility as the filesystem rename.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use super::Store;
use crate::error::{Error, Result};

/// Thread-safe in-memory store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<BTreeMap<PathBuf, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate data for a path (used by tests)
    pub fn insert(&self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
        if let Ok(mut data) = self.lock() {
            data.insert(path.into(), bytes.into());
        }
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<PathBuf, Vec<u8>>>> {
        self.data
            .lock()
            .map_err(|_| Error::Store("memory store lock poisoned".into()))
    }
}

impl Store for MemoryStore {
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.lock()?.insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.lock()?
            .get(path)
            .cloned()
            .ok_or_else(|| Error::Store(format!("path not found: {}", path.display())))
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().map(|d| d.contains_key(path)).unwrap_or(false)
    }

    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(self
            .lock()?
            .keys()
            .filter(|k| k.parent() == Some(dir))
            .cloned()
            .collect())
    }
}
