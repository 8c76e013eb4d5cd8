//! Opened archives
//!
//! [`SceneArchive`] owns every node of one archive in a flat arena. Callers
//! never own nodes: they hold [`NodeId`]s that are only valid for the archive
//! that produced them, for as long as that archive is alive.

use std::path::{Path, PathBuf};

use glam::DMat4;
use serde_json::Value;
use slotmap::SlotMap;
use strata_core::path::join_child;
use strata_core::{ROOT_PATH, Result, StrataError};

use crate::document::{ArchiveDocument, NodeDocument};
use crate::node::{ArchiveNode, NodeId};

/// A read-only hierarchical scene archive.
#[derive(Debug)]
pub struct SceneArchive {
    file_path: PathBuf,
    nodes: SlotMap<NodeId, ArchiveNode>,
    root: NodeId,
}

impl SceneArchive {
    /// Builds an archive from a decoded document.
    ///
    /// Fails with [`StrataError::InvalidFormat`] if the header is invalid, a
    /// child name is empty or contains `/`, or two siblings share a name.
    pub fn from_document(file_path: impl Into<PathBuf>, document: ArchiveDocument) -> Result<Self> {
        document.validate()?;

        let ArchiveDocument { root, .. } = document;
        let mut nodes = SlotMap::with_key();

        let NodeDocument {
            name,
            transform,
            payload,
            children,
        } = root;
        let root_id = nodes.insert(ArchiveNode::new(
            name,
            DMat4::from_cols_array(&transform),
            payload,
        ));

        // Explicit work stack: (parent, children still to attach)
        let mut stack: Vec<(NodeId, Vec<NodeDocument>)> = vec![(root_id, children)];

        while let Some((parent_id, children)) = stack.pop() {
            for child in children {
                let NodeDocument {
                    name,
                    transform,
                    payload,
                    children,
                } = child;

                if name.is_empty() || name.contains('/') {
                    return Err(StrataError::InvalidFormat(format!(
                        "invalid child name {name:?} under '{}'",
                        nodes[parent_id].name
                    )));
                }
                if nodes[parent_id].child_lookup.contains_key(&name) {
                    return Err(StrataError::InvalidFormat(format!(
                        "duplicate child name '{name}' under '{}'",
                        nodes[parent_id].name
                    )));
                }

                let mut node =
                    ArchiveNode::new(name.clone(), DMat4::from_cols_array(&transform), payload);
                node.parent = Some(parent_id);
                let child_id = nodes.insert(node);

                let parent = &mut nodes[parent_id];
                parent.children.push(child_id);
                parent.child_lookup.insert(name, child_id);

                if !children.is_empty() {
                    stack.push((child_id, children));
                }
            }
        }

        Ok(Self {
            file_path: file_path.into(),
            nodes,
            root: root_id,
        })
    }

    /// Path of the file this archive was opened from.
    #[inline]
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Total number of nodes, root included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&ArchiveNode> {
        self.nodes.get(id)
    }

    /// Returns the node for `id`. **Panics** if `id` belongs to another archive.
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &ArchiveNode {
        &self.nodes[id]
    }

    #[inline]
    #[must_use]
    pub fn name(&self, id: NodeId) -> &str {
        self.node(id).name()
    }

    #[inline]
    #[must_use]
    pub fn transform(&self, id: NodeId) -> DMat4 {
        self.node(id).transform()
    }

    #[inline]
    #[must_use]
    pub fn has_payload(&self, id: NodeId) -> bool {
        self.node(id).has_payload()
    }

    #[inline]
    #[must_use]
    pub fn payload(&self, id: NodeId) -> Option<&Value> {
        self.node(id).payload()
    }

    #[inline]
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).children()
    }

    /// Names of the direct children of `id`, in on-disk order.
    pub fn child_names(&self, id: NodeId) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.node(id)
            .children()
            .iter()
            .map(move |&child| self.nodes[child].name())
    }

    /// Exact, case-sensitive child lookup.
    #[inline]
    #[must_use]
    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.node(id).child(name)
    }

    /// Absolute hierarchy path of `id` (`/` for the root).
    #[must_use]
    pub fn node_path(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut current = id;
        while let Some(parent) = self.nodes[current].parent {
            names.push(self.nodes[current].name());
            current = parent;
        }

        if names.is_empty() {
            return ROOT_PATH.to_string();
        }
        names
            .iter()
            .rev()
            .fold(String::new(), |path, name| join_child(&path, name))
    }
}
