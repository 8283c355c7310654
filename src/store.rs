use crate::{HarvestError, Result};
use std::path::Path;

/// Destination for downloaded bytes.
pub trait FileStore {
    /// Creates `dir` and its parents; existing directories are fine.
    fn ensure_dir(&self, dir: &Path) -> Result<()>;

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()>;
}

/// Writes straight to the local filesystem, creating parent directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskStore;

impl FileStore for DiskStore {
    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir).map_err(|source| HarvestError::Persistence {
            path: dir.to_path_buf(),
            source,
        })
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let persist = |source: std::io::Error| HarvestError::Persistence {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(persist)?;
        }
        std::fs::write(path, bytes).map_err(persist)
    }
}
