//! Scene Archive Cache
//!
//! [`SceneCache`] keeps archives open across queries. Each archive is opened
//! at most once per path and shared by every caller; a per-archive mutex
//! serializes all reads of one archive while different archives are read in
//! parallel.
//!
//! # Ownership
//!
//! The cache is an ordinary value: build one at a defined point and hand it
//! (by reference or inside an `Arc`) to every consumer that needs it.
//!
//! ```rust,ignore
//! let cache = Arc::new(SceneCache::new());
//!
//! let entry = cache.entry("/shots/a.mdc", "/set/table")?;
//! let names = entry.descendant_names();
//! // dropping `entry` releases the archive for other threads
//! ```
//!
//! # Handles
//!
//! [`EntryHandle`] owns a shared reference to the archive and holds its lock.
//! Erasing or evicting the archive only drops the cache's own reference, so a
//! handle in use keeps its archive alive until it is dropped.
//!
//! The archive lock is not re-entrant. While a thread holds a handle, any
//! other access to the same file from that thread ([`SceneCache::entry`],
//! [`SceneCache::transform`], [`root_menu`](crate::menu::root_menu), or
//! locking [`EntryHandle::entry`] directly) blocks forever. Drop the handle
//! first:
//!
//! ```rust,ignore
//! {
//!     let entry = cache.entry(file, "/a/c")?;
//!     // ...
//! }
//! let entry = cache.entry(file, "/a")?;
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::DMat4;
use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};
use serde_json::Value;
use strata_archive::{ArchiveLoader, FileLoader, NodeId, SceneArchive};
use strata_core::path::ROOT_PATH;
use strata_core::{Result, StrataError};

use crate::compose::{Space, TransformComposer};
use crate::enumerate;
use crate::lru::{CacheStats, LruCache};
use crate::resolve::resolve_from;
use crate::settings::CacheSettings;

/// An open archive together with the lock that guards it.
pub type SharedArchive = Arc<Mutex<SceneArchive>>;

/// Every archive costs one unit, whatever its size.
const ARCHIVE_COST: usize = 1;

/// Process-wide cache of open scene archives.
pub struct SceneCache {
    files: LruCache<PathBuf, Mutex<SceneArchive>, StrataError>,
    settings: CacheSettings,
}

impl Default for SceneCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneCache {
    /// A cache with default settings reading archives from disk.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(CacheSettings::default())
    }

    #[must_use]
    pub fn with_settings(settings: CacheSettings) -> Self {
        Self::with_loader(settings, FileLoader::new())
    }

    /// A cache opening archives through `loader`.
    pub fn with_loader(settings: CacheSettings, loader: impl ArchiveLoader + 'static) -> Self {
        let files = LruCache::new(settings.capacity, move |path: &PathBuf| {
            match loader.open(path) {
                Ok(archive) => {
                    log::debug!("Cached archive '{}'", path.display());
                    Ok((Mutex::new(archive), ARCHIVE_COST))
                }
                Err(err) => {
                    log::warn!("Could not open archive '{}': {err}", path.display());
                    Err(if err.is_open_failure() {
                        err
                    } else {
                        StrataError::open_failure(path.as_path(), err)
                    })
                }
            }
        });

        Self { files, settings }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Returns the shared archive for `file`, opening it on first use.
    ///
    /// Concurrent calls for the same missing file open it only once.
    pub fn get(&self, file: impl AsRef<Path>) -> Result<SharedArchive> {
        self.files.get(&file.as_ref().to_path_buf())
    }

    /// Opens (or reuses) `file`, locks it and resolves `path` from its root.
    ///
    /// Blocks while another handle into the same archive is alive. The lock is
    /// released when the returned handle is dropped, including when
    /// resolution fails.
    pub fn entry(&self, file: impl AsRef<Path>, path: &str) -> Result<EntryHandle> {
        let shared = self.get(file)?;
        let guard = shared.lock_arc();
        let node = resolve_from(&guard, guard.root(), path)?;
        Ok(EntryHandle { guard, node })
    }

    /// World transform of `path` inside `file`.
    pub fn world_transform(&self, file: impl AsRef<Path>, path: &str) -> Result<DMat4> {
        self.transform(file, Space::World, ROOT_PATH, path)
    }

    /// Transform of `path` inside `file` in the requested space.
    pub fn transform(
        &self,
        file: impl AsRef<Path>,
        space: Space,
        root_path: &str,
        path: &str,
    ) -> Result<DMat4> {
        let entry = self.entry(file, ROOT_PATH)?;
        TransformComposer::new(entry.archive()).in_space(space, root_path, path)
    }

    /// Drops `file` from the cache so that the next access reopens it.
    ///
    /// Handles already held keep working on the old archive.
    pub fn erase(&self, file: impl AsRef<Path>) -> bool {
        let file = file.as_ref();
        let erased = self.files.erase(&file.to_path_buf());
        log::debug!("Erased archive '{}' (was cached: {erased})", file.display());
        erased
    }

    /// Drops every cached archive.
    pub fn clear(&self) {
        self.files.clear();
        log::debug!("Cleared scene cache");
    }

    #[must_use]
    pub fn contains(&self, file: impl AsRef<Path>) -> bool {
        self.files.contains(&file.as_ref().to_path_buf())
    }

    /// Number of resident archives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.files.stats()
    }
}

/// Exclusive access to one node of a cached archive.
///
/// Holds the archive's lock for its whole lifetime.
pub struct EntryHandle {
    guard: ArcMutexGuard<RawMutex, SceneArchive>,
    node: NodeId,
}

impl EntryHandle {
    /// The shared archive this handle locks.
    ///
    /// Already locked by this handle: locking it again deadlocks.
    #[inline]
    #[must_use]
    pub fn entry(&self) -> &SharedArchive {
        ArcMutexGuard::mutex(&self.guard)
    }

    #[inline]
    #[must_use]
    pub fn archive(&self) -> &SceneArchive {
        &self.guard
    }

    /// The node reached by path resolution.
    #[inline]
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    #[inline]
    #[must_use]
    pub fn file_path(&self) -> &Path {
        self.guard.file_path()
    }

    /// Absolute hierarchy path of the current node.
    #[must_use]
    pub fn path(&self) -> String {
        self.guard.node_path(self.node)
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.guard.name(self.node)
    }

    pub fn child_names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.guard.child_names(self.node)
    }

    #[inline]
    #[must_use]
    pub fn has_payload(&self) -> bool {
        self.guard.has_payload(self.node)
    }

    #[inline]
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        self.guard.payload(self.node)
    }

    #[inline]
    #[must_use]
    pub fn local_transform(&self) -> DMat4 {
        self.guard.transform(self.node)
    }

    /// World transform of the current node.
    #[must_use]
    pub fn world_transform(&self) -> DMat4 {
        TransformComposer::new(&self.guard).world_of(self.node)
    }

    /// Moves the handle to the node at `path` relative to the current node.
    pub fn descend(&mut self, path: &str) -> Result<()> {
        self.node = resolve_from(&self.guard, self.node, path)?;
        Ok(())
    }

    /// See [`enumerate::descendant_names`].
    #[must_use]
    pub fn descendant_names(&self) -> Vec<String> {
        enumerate::descendant_names(&self.guard, self.node)
    }

    /// See [`enumerate::object_names`].
    #[must_use]
    pub fn object_names(&self) -> Vec<String> {
        enumerate::object_names(&self.guard, self.node)
    }

    /// Returns `true` if both handles point into the same open archive.
    #[must_use]
    pub fn shares_archive(&self, other: &SharedArchive) -> bool {
        Arc::ptr_eq(self.entry(), other)
    }
}

impl std::fmt::Debug for EntryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryHandle")
            .field("file", &self.file_path())
            .field("path", &self.path())
            .finish()
    }
}
