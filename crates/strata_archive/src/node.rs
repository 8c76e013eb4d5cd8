use glam::DMat4;
use rustc_hash::FxHashMap;
use serde_json::Value;
use slotmap::new_key_type;

new_key_type! {
    /// Lightweight identifier of a node inside one [`SceneArchive`](crate::SceneArchive).
    ///
    /// Ids are only meaningful for the archive that produced them.
    pub struct NodeId;
}

/// A single entry of an archive hierarchy.
///
/// # Hierarchy
///
/// - `parent`: handle to the parent node (None for the archive root)
/// - `children`: child handles in on-disk order
///
/// Children are also indexed by name for exact, case-sensitive lookup.
#[derive(Debug, Clone)]
pub struct ArchiveNode {
    pub(crate) name: String,
    pub(crate) transform: DMat4,
    pub(crate) payload: Option<Value>,

    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) child_lookup: FxHashMap<String, NodeId>,
}

impl ArchiveNode {
    pub(crate) fn new(name: String, transform: DMat4, payload: Option<Value>) -> Self {
        Self {
            name,
            transform,
            payload,
            parent: None,
            children: Vec::new(),
            child_lookup: FxHashMap::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local transform relative to the parent node.
    #[inline]
    #[must_use]
    pub fn transform(&self) -> DMat4 {
        self.transform
    }

    #[inline]
    #[must_use]
    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    #[inline]
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child handles in on-disk order.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Looks up a direct child by exact name.
    #[inline]
    #[must_use]
    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.child_lookup.get(name).copied()
    }
}
