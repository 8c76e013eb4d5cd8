//! Hierarchy path resolution
//!
//! Walks a `/`-delimited path from a starting node, one exact,
//! case-sensitive child lookup per segment. Empty segments are skipped, so
//! `""` and `"/"` resolve to the starting node itself.

use strata_archive::{NodeId, SceneArchive};
use strata_core::path::segments;
use strata_core::{Result, StrataError};

/// Resolves `path` below `from`.
pub fn resolve_from(archive: &SceneArchive, from: NodeId, path: &str) -> Result<NodeId> {
    segments(path).try_fold(from, |node, segment| step(archive, node, segment, path))
}

/// Resolves an absolute `path` from the archive root.
#[inline]
pub fn resolve(archive: &SceneArchive, path: &str) -> Result<NodeId> {
    resolve_from(archive, archive.root(), path)
}

/// Resolves `path` from the root and returns every node visited, root first.
pub fn resolve_chain(archive: &SceneArchive, path: &str) -> Result<Vec<NodeId>> {
    let mut chain = vec![archive.root()];
    let mut node = archive.root();
    for segment in segments(path) {
        node = step(archive, node, segment, path)?;
        chain.push(node);
    }
    Ok(chain)
}

fn step(archive: &SceneArchive, node: NodeId, segment: &str, path: &str) -> Result<NodeId> {
    archive
        .child(node, segment)
        .ok_or_else(|| StrataError::PathNotFound {
            path: path.to_string(),
            segment: segment.to_string(),
        })
}
