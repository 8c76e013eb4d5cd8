//! Scene archive cache.
//!
//! - [`lru`]: generic bounded cache with single-flight loading
//! - [`store`]: [`SceneCache`] and the [`EntryHandle`]s it hands out
//! - [`resolve`]: hierarchy path resolution
//! - [`compose`]: world / relative / local transform composition
//! - [`enumerate`]: descendant and object listings
//! - [`menu`]: file validation, root menus and reloading for host nodes
//! - [`settings`]: [`CacheSettings`]

pub mod compose;
pub mod enumerate;
pub mod lru;
pub mod menu;
pub mod resolve;
pub mod settings;
pub mod store;

pub use compose::{Space, TransformComposer};
pub use enumerate::{descendant_names, object_names};
pub use lru::{CacheStats, LruCache};
pub use menu::{is_valid_archive_path, reload, root_menu};
pub use resolve::{resolve, resolve_chain, resolve_from};
pub use settings::CacheSettings;
pub use store::{EntryHandle, SceneCache, SharedArchive};
