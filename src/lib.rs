//! # strata
//!
//! A read-only, thread-safe cache of open hierarchical scene archives.
//!
//! Archives are opened once per path and shared; each open archive is guarded
//! by its own lock. On top of the cache sit hierarchy path resolution,
//! transform composition and hierarchy listings for selection menus.
//!
//! ```rust,ignore
//! use strata::{SceneCache, Space};
//!
//! let cache = SceneCache::new();
//! let world = cache.world_transform("/shots/a.mdc", "/set/table/cup")?;
//! let local = cache.transform("/shots/a.mdc", Space::Path, "/set", "/set/table/cup")?;
//! ```
//!
//! The workspace is split into:
//! - [`strata_core`]: errors and hierarchy path utilities
//! - [`strata_archive`]: the in-memory archive model and its on-disk format
//! - [`strata_cache`]: the cache, handles and hierarchy queries

pub use strata_archive as archive;
pub use strata_cache as cache;
pub use strata_core::{errors, path};

pub use errors::{Result, StrataError};
pub use path::{HierarchyPath, ROOT_PATH};

pub use archive::{
    ArchiveDocument, ArchiveLoader, ArchiveNode, FileLoader, NodeDocument, NodeId, SceneArchive,
};
pub use cache::{
    CacheSettings, CacheStats, EntryHandle, LruCache, SceneCache, SharedArchive, Space,
    TransformComposer, is_valid_archive_path, reload, root_menu,
};
