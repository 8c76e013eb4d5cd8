//! Cache Configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use strata_cache::{CacheSettings, SceneCache};
//!
//! // A smaller cache for a memory constrained host
//! let cache = SceneCache::with_settings(CacheSettings {
//!     capacity: 32,
//!     ..Default::default()
//! });
//! ```

/// Default number of cost units the cache may hold (one unit per archive).
pub const DEFAULT_CAPACITY: usize = 200;

/// Default archive file extension, without the dot.
pub const DEFAULT_ARCHIVE_EXTENSION: &str = "mdc";

/// Hosts render menus badly past this many rows.
pub const DEFAULT_MENU_LIMIT: usize = 1500;

/// Configuration consumed once when a [`SceneCache`](crate::SceneCache) is built.
///
/// | Field               | Description                                   | Default |
/// |---------------------|-----------------------------------------------|---------|
/// | `capacity`          | Cost units kept before idle archives are evicted | `200` |
/// | `archive_extension` | Case-sensitive extension of valid archive files | `"mdc"` |
/// | `menu_limit`        | Maximum rows of a root menu, `/` included     | `1500`  |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Every archive costs one unit regardless of its size.
    pub capacity: usize,

    /// Files with any other extension are treated as "no file" by
    /// [`is_valid_archive_path`](crate::menu::is_valid_archive_path).
    pub archive_extension: String,

    pub menu_limit: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            archive_extension: DEFAULT_ARCHIVE_EXTENSION.to_string(),
            menu_limit: DEFAULT_MENU_LIMIT,
        }
    }
}
