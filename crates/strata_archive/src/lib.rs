//! Hierarchical scene archives.
//!
//! An archive is a read-only tree of named nodes. Every node carries a local
//! transform and, optionally, a payload object:
//! - [`SceneArchive`]: the opened archive, an arena of [`ArchiveNode`]s addressed by [`NodeId`]
//! - [`ArchiveDocument`]: the on-disk representation
//! - [`ArchiveLoader`]: opens archives from a path ([`FileLoader`] reads from disk)

pub mod archive;
pub mod document;
pub mod loader;
pub mod node;

pub use archive::SceneArchive;
pub use document::{ArchiveDocument, FORMAT_TAG, FORMAT_VERSION, NodeDocument};
pub use loader::{ArchiveLoader, FileLoader};
pub use node::{ArchiveNode, NodeId};
