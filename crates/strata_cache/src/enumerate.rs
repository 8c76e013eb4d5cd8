//! Hierarchy enumeration for selection menus.
//!
//! Both listings are uncapped; truncating to a displayable number of rows is
//! up to the consumer (see [`root_menu`](crate::menu::root_menu)).
//!
//! Both traversals are iterative; hierarchy depth is not bounded by the
//! thread stack.

use strata_archive::{NodeId, SceneArchive};
use strata_core::ROOT_PATH;
use strata_core::path::join_child;

/// Absolute paths of every node below `node`.
///
/// Each node lists all of its direct children before descending into the
/// first child's subtree, then the second child's, and so on. For a root with
/// children `[a, b]` where `a` has a child `c` the result is
/// `["/a", "/b", "/a/c"]`: a level's siblings always precede their own
/// descendants.
#[must_use]
pub fn descendant_names(archive: &SceneArchive, node: NodeId) -> Vec<String> {
    let mut names = Vec::new();

    let start = archive.node_path(node);
    let start = if start == ROOT_PATH { String::new() } else { start };
    let mut stack: Vec<(NodeId, String)> = vec![(node, start)];

    while let Some((current, prefix)) = stack.pop() {
        let children = archive.children(current);
        let first = names.len();
        names.extend(
            children
                .iter()
                .map(|&child| join_child(&prefix, archive.name(child))),
        );

        // Expand children in order: push in reverse so the first pops first.
        for (offset, &child) in children.iter().enumerate().rev() {
            if !archive.children(child).is_empty() {
                stack.push((child, names[first + offset].clone()));
            }
        }
    }

    names
}

/// Names of every node at or below `node` that carries a payload.
///
/// Depth-first, a node before its children, children in on-disk order.
#[must_use]
pub fn object_names(archive: &SceneArchive, node: NodeId) -> Vec<String> {
    let mut names = Vec::new();
    let mut stack = vec![node];

    while let Some(current) = stack.pop() {
        if archive.has_payload(current) {
            names.push(archive.name(current).to_string());
        }
        stack.extend(archive.children(current).iter().rev().copied());
    }

    names
}
