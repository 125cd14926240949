//! Store adapters for published artifacts.
//!
//! - `fs`: local filesystem, atomic replace via a same-directory temp file.
//! - `memory`: HashMap-backed store for tests.

mod fs;
mod memory;

pub use fs::FsStore;
pub use memory::MemoryStore;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Abstract storage for artifacts and manifests.
pub trait Store: Send + Sync {
    /// Replace the contents of `path` in one step. Readers observe either the
    /// previous bytes or the new bytes, never a partial write. Creates parent
    /// directories if needed.
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()>;

    /// Read the full contents of `path`.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Whether `path` currently exists.
    fn exists(&self, path: &Path) -> bool;

    /// List file paths directly under `dir` (for cleanup/debugging).
    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}
