//! Archive loaders
//!
//! [`ArchiveLoader`] is the seam between the cache and the archive format: it
//! opens the archive stored at a path. Every failure is reported as
//! [`StrataError::OpenFailure`] so that callers can tell "could not open" apart
//! from errors raised later while reading an already open archive.

use std::path::Path;

use strata_core::{Result, StrataError};

use crate::archive::SceneArchive;
use crate::document::ArchiveDocument;

/// Opens archives by path.
pub trait ArchiveLoader: Send + Sync {
    /// Opens the archive at `path`.
    fn open(&self, path: &Path) -> Result<SceneArchive>;
}

impl<F> ArchiveLoader for F
where
    F: Fn(&Path) -> Result<SceneArchive> + Send + Sync,
{
    fn open(&self, path: &Path) -> Result<SceneArchive> {
        self(path)
    }
}

/// Reads archive documents from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl FileLoader {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveLoader for FileLoader {
    fn open(&self, path: &Path) -> Result<SceneArchive> {
        let bytes = std::fs::read(path).map_err(|e| StrataError::open_failure(path, e))?;

        let archive = ArchiveDocument::from_slice(&bytes)
            .and_then(|document| SceneArchive::from_document(path, document))
            .map_err(|e| StrataError::open_failure(path, e))?;

        log::debug!(
            "Opened archive '{}' ({} nodes, {} bytes)",
            path.display(),
            archive.len(),
            bytes.len()
        );
        Ok(archive)
    }
}
