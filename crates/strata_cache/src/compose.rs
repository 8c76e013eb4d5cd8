//! Transform Composition
//!
//! Accumulates local transforms along a hierarchy path.
//!
//! # Convention
//!
//! Matrices are `glam::DMat4`: column-major storage, column vectors
//! (`p' = M * p`). Composing a child under its parent is therefore
//! `parent_world * child_local`. This is the same product as the row-vector
//! form `child_local * parent_world` used by archives written with row
//! vectors: the child transform is always applied to points first.
//!
//! The fold starts from the archive root's own transform, so a world
//! transform is expressed in the coordinate space the root lives in.

use glam::DMat4;
use strata_archive::{NodeId, SceneArchive};
use strata_core::path::HierarchyPath;
use strata_core::{Result, StrataError};

use crate::resolve::{resolve, resolve_chain};

/// How a resolved object is oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Space {
    /// Transforms composed from the archive root (`/`) down to the object.
    #[default]
    World,
    /// Transforms composed from below the chosen root path down to the object.
    Path,
    /// The object's own local transform only.
    Local,
    /// Identity.
    Object,
}

impl Space {
    /// Maps the host menu index (0..=3) to a space.
    #[must_use]
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::World),
            1 => Some(Self::Path),
            2 => Some(Self::Local),
            3 => Some(Self::Object),
            _ => None,
        }
    }

    #[must_use]
    pub fn index(self) -> i32 {
        match self {
            Self::World => 0,
            Self::Path => 1,
            Self::Local => 2,
            Self::Object => 3,
        }
    }
}

/// Composes transforms of one archive. Holds no state besides the archive.
#[derive(Clone, Copy)]
pub struct TransformComposer<'a> {
    archive: &'a SceneArchive,
}

impl<'a> TransformComposer<'a> {
    #[must_use]
    pub fn new(archive: &'a SceneArchive) -> Self {
        Self { archive }
    }

    /// Folds the local transforms of `nodes`, outermost first.
    #[must_use]
    pub fn fold(&self, nodes: &[NodeId]) -> DMat4 {
        nodes
            .iter()
            .fold(DMat4::IDENTITY, |acc, &node| acc * self.archive.transform(node))
    }

    /// World transform of the node at `path`, root transform included.
    pub fn world(&self, path: &str) -> Result<DMat4> {
        Ok(self.fold(&resolve_chain(self.archive, path)?))
    }

    /// World transform of an already resolved node.
    #[must_use]
    pub fn world_of(&self, node: NodeId) -> DMat4 {
        let mut chain = vec![node];
        let mut current = node;
        while let Some(parent) = self.archive.node(current).parent() {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        self.fold(&chain)
    }

    /// Transform of `path` relative to `root_path`.
    ///
    /// Only the segments below `root_path` contribute; the root path node's
    /// own transform and everything above it are left out.
    pub fn relative(&self, root_path: &str, path: &str) -> Result<DMat4> {
        let root = HierarchyPath::parse(root_path);
        let object = HierarchyPath::parse(path);
        let below = object
            .strip_prefix(&root)
            .ok_or_else(|| StrataError::OutsideRoot {
                path: object.to_string(),
                root: root.to_string(),
            })?;

        let chain = resolve_chain(self.archive, path)?;
        Ok(self.fold(&chain[chain.len() - below.depth()..]))
    }

    /// Local transform of the node at `path`.
    pub fn local(&self, path: &str) -> Result<DMat4> {
        Ok(self.archive.transform(resolve(self.archive, path)?))
    }

    /// Transform of `path` in `space`. `root_path` is only used by [`Space::Path`].
    ///
    /// The path is resolved in every space, so a bad path is an error even for
    /// [`Space::Object`].
    pub fn in_space(&self, space: Space, root_path: &str, path: &str) -> Result<DMat4> {
        match space {
            Space::World => self.world(path),
            Space::Path => self.relative(root_path, path),
            Space::Local => self.local(path),
            Space::Object => resolve(self.archive, path).map(|_| DMat4::IDENTITY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DQuat, DVec3};
    use strata_archive::{ArchiveDocument, NodeDocument};

    fn archive(root_transform: DMat4) -> SceneArchive {
        let root = NodeDocument::new("/").with_transform(root_transform).with_child(
            NodeDocument::new("a")
                .with_translation(DVec3::X)
                .with_child(NodeDocument::new("c").with_translation(DVec3::Y)),
        );
        SceneArchive::from_document("compose.mdc", ArchiveDocument::new(root)).unwrap()
    }

    #[test]
    fn translations_accumulate() {
        let archive = archive(DMat4::IDENTITY);
        let world = TransformComposer::new(&archive).world("/a/c").unwrap();
        assert_eq!(world, DMat4::from_translation(DVec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn root_transform_is_included_in_world() {
        let archive = archive(DMat4::from_scale(DVec3::splat(2.0)));
        let world = TransformComposer::new(&archive).world("/a/c").unwrap();
        let origin = world.transform_point3(DVec3::ZERO);
        assert!(origin.abs_diff_eq(DVec3::new(2.0, 2.0, 0.0), 1e-12));
    }

    #[test]
    fn child_is_applied_before_parent() {
        let root = NodeDocument::new("/").with_child(
            NodeDocument::new("spin")
                .with_transform(DMat4::from_quat(DQuat::from_rotation_z(
                    std::f64::consts::FRAC_PI_2,
                )))
                .with_child(NodeDocument::new("arm").with_translation(DVec3::X)),
        );
        let archive = SceneArchive::from_document("rot.mdc", ArchiveDocument::new(root)).unwrap();
        let world = TransformComposer::new(&archive).world("/spin/arm").unwrap();

        // The arm's +X offset is rotated by its parent onto +Y.
        let p = world.transform_point3(DVec3::ZERO);
        assert!(p.abs_diff_eq(DVec3::Y, 1e-12));
    }

    #[test]
    fn world_of_matches_world() {
        let archive = archive(DMat4::from_translation(DVec3::Z));
        let composer = TransformComposer::new(&archive);
        let c = resolve(&archive, "/a/c").unwrap();
        assert_eq!(composer.world_of(c), composer.world("/a/c").unwrap());
    }

    #[test]
    fn relative_skips_root_path_transforms() {
        let archive = archive(DMat4::from_translation(DVec3::Z));
        let composer = TransformComposer::new(&archive);
        assert_eq!(
            composer.relative("/a", "/a/c").unwrap(),
            DMat4::from_translation(DVec3::Y)
        );
        assert_eq!(composer.relative("/a", "/a").unwrap(), DMat4::IDENTITY);
        assert_eq!(
            composer.relative("/", "/a/c").unwrap(),
            DMat4::from_translation(DVec3::new(1.0, 1.0, 0.0))
        );
    }

    #[test]
    fn relative_outside_root_is_an_error() {
        let archive = archive(DMat4::IDENTITY);
        let err = TransformComposer::new(&archive).relative("/a/c", "/a").unwrap_err();
        assert!(matches!(err, StrataError::OutsideRoot { .. }));
    }

    #[test]
    fn spaces() {
        let archive = archive(DMat4::IDENTITY);
        let composer = TransformComposer::new(&archive);
        assert_eq!(
            composer.in_space(Space::Local, "/", "/a/c").unwrap(),
            DMat4::from_translation(DVec3::Y)
        );
        assert_eq!(composer.in_space(Space::Object, "/", "/a/c").unwrap(), DMat4::IDENTITY);
        assert!(composer.in_space(Space::Object, "/", "/nope").is_err());
        assert_eq!(Space::from_index(Space::Path.index()), Some(Space::Path));
        assert_eq!(Space::from_index(7), None);
    }
}
