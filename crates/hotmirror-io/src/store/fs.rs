use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::Store;
use crate::error::{Error, Result};

/// Local filesystem store (rooted at the host filesystem).
#[derive(Debug, Clone, Default)]
pub struct FsStore;

impl FsStore {
    pub fn new() -> Self {
        Self
    }
}

impl Store for FsStore {
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        // The temp file must live in the destination directory so the final
        // rename never crosses a filesystem boundary.
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| Error::io(&parent, e))?;

        let mut tmp = NamedTempFile::new_in(&parent).map_err(|e| Error::io(&parent, e))?;
        tmp.write_all(bytes).map_err(|e| Error::io(tmp.path(), e))?;
        tmp.flush().map_err(|e| Error::io(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| Error::io(tmp.path(), e))?;
        tmp.persist(path).map_err(|e| Error::io(path, e.error))?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "replaced file");
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| Error::io(path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut results = Vec::new();
        if !dir.is_dir() {
            return Ok(results);
        }
        for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
            let entry = entry.map_err(|e| Error::io(dir, e))?;
            let path = entry.path();
            if path.is_file() {
                results.push(path);
            }
        }
        results.sort();
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_creates_parents_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/file.json");
        let store = FsStore::new();

        store.write_atomic(&path, b"first").unwrap();
        assert_eq!(store.read(&path).unwrap(), b"first");

        store.write_atomic(&path, b"second, longer").unwrap();
        assert_eq!(store.read(&path).unwrap(), b"second, longer");

        store.write_atomic(&path, b"3").unwrap();
        assert_eq!(store.read(&path).unwrap(), b"3");
    }

    #[test]
    fn no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        let store = FsStore::new();
        store.write_atomic(&path, b"{}").unwrap();
        store.write_atomic(&path, b"{}").unwrap();

        let listed = store.list(dir.path()).unwrap();
        assert_eq!(listed, vec![path]);
    }

    #[test]
    fn unwritable_destination_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();

        let err = FsStore::new()
            .write_atomic(&blocker.join("manifest.json"), b"{}")
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }), "got {err:?}");
    }

    #[test]
    fn missing_file_read_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsStore::new().read(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(!FsStore::new().exists(&dir.path().join("nope")));
    }
}
