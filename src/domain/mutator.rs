//! Tree mutator: pure remove / insert / update operations.
//!
//! Every operation borrows its input and builds a new tree, so a caller that
//! still holds the previous tree keeps a valid, unchanged value.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::domain::entities::{MenuNode, MenuTree, NodePatch};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::id::IdGenerator;
use crate::domain::locator;

/// Delete the node with `id` and its whole subtree, wherever it occurs.
///
/// Unknown ids yield a tree equal to the input.
#[instrument(level = "debug", skip(tree))]
pub fn remove(tree: &MenuTree, id: &str) -> MenuTree {
    MenuTree::new(remove_from(&tree.roots, id))
}

fn remove_from(nodes: &[MenuNode], id: &str) -> Vec<MenuNode> {
    nodes
        .iter()
        .filter(|node| node.id() != id)
        .map(|node| MenuNode {
            item: node.item.clone(),
            children: remove_from(&node.children, id),
        })
        .collect()
}

/// Insert `node` at `index` under `parent_id`, or into the root sequence.
///
/// The index is clamped to `[0, len]`. An unknown parent or a divider parent
/// is reported as an error and the input tree is left as it was.
#[instrument(level = "debug", skip(tree, node), fields(node_id = node.id()))]
pub fn insert(
    tree: &MenuTree,
    parent_id: Option<&str>,
    index: usize,
    node: MenuNode,
) -> DomainResult<MenuTree> {
    check_insertable(tree, &node)?;

    let Some(parent_id) = parent_id else {
        let mut roots = tree.roots.clone();
        let at = index.min(roots.len());
        roots.insert(at, node);
        return Ok(MenuTree::new(roots));
    };

    let parent = locator::locate(tree, parent_id)
        .ok_or_else(|| DomainError::NodeNotFound(parent_id.to_string()))?;
    if !parent.node.item_type().accepts_children() {
        return Err(DomainError::NotAContainer(parent_id.to_string()));
    }

    let mut roots = tree.roots.clone();
    let mut slot = Some(node);
    insert_into(&mut roots, &parent.path, index, &mut slot);
    debug!("inserted under {} at path {:?}", parent_id, parent.path);
    Ok(MenuTree::new(roots))
}

// `nodes` is already a fresh copy, so writing into it never touches the input.
fn insert_into(nodes: &mut [MenuNode], path: &[usize], index: usize, slot: &mut Option<MenuNode>) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };
    let Some(target) = nodes.get_mut(*first) else {
        return;
    };
    if rest.is_empty() {
        if let Some(node) = slot.take() {
            let at = index.min(target.children.len());
            target.children.insert(at, node);
        }
    } else {
        insert_into(&mut target.children, rest, index, slot);
    }
}

fn check_insertable(tree: &MenuTree, node: &MenuNode) -> DomainResult<()> {
    let existing: HashSet<&str> = tree.iter().map(|n| n.id()).collect();
    let mut incoming = HashSet::new();
    for n in node.iter() {
        n.check_shape()?;
        if existing.contains(n.id()) || !incoming.insert(n.id()) {
            return Err(DomainError::DuplicateId(n.id().to_string()));
        }
    }
    Ok(())
}

/// Apply `patch` to the node with `id`, keeping its other fields and children.
///
/// Unknown ids yield a tree equal to the input.
#[instrument(level = "debug", skip(tree, patch))]
pub fn update(tree: &MenuTree, id: &str, patch: &NodePatch) -> MenuTree {
    MenuTree::new(update_in(&tree.roots, id, patch, &mut false))
}

fn update_in(nodes: &[MenuNode], id: &str, patch: &NodePatch, done: &mut bool) -> Vec<MenuNode> {
    nodes
        .iter()
        .map(|node| {
            let mut copy = MenuNode {
                item: node.item.clone(),
                children: Vec::new(),
            };
            // only the first match in pre-order is edited
            if !*done && node.id() == id {
                patch.apply_to(&mut copy.item);
                *done = true;
            }
            copy.children = update_in(&node.children, id, patch, done);
            copy
        })
        .collect()
}

/// Deep copy the node with `id` under fresh identifiers and place the copy
/// right after the original.
#[instrument(level = "debug", skip(tree, ids))]
pub fn duplicate(tree: &MenuTree, id: &str, ids: &dyn IdGenerator) -> DomainResult<MenuTree> {
    let loc = locator::locate(tree, id).ok_or_else(|| DomainError::NodeNotFound(id.to_string()))?;
    let copy = reissue_ids(loc.node, ids);
    let parent_id = loc.parent_id().map(str::to_string);
    insert(tree, parent_id.as_deref(), loc.index + 1, copy)
}

/// Copy a subtree giving every node a new identifier.
pub fn reissue_ids(node: &MenuNode, ids: &dyn IdGenerator) -> MenuNode {
    let mut item = node.item.clone();
    item.id = ids.new_id();
    MenuNode {
        item,
        children: node.children.iter().map(|c| reissue_ids(c, ids)).collect(),
    }
}

/// Total number of nodes in the tree.
pub fn count_nodes(tree: &MenuTree) -> usize {
    tree.iter().count()
}

/// Height of a subtree in edges: 0 for a leaf.
pub fn height(node: &MenuNode) -> usize {
    node.children
        .iter()
        .map(|c| 1 + height(c))
        .max()
        .unwrap_or(0)
}

/// Deepest level present in the tree, None for an empty tree.
pub fn max_level(tree: &MenuTree) -> Option<usize> {
    tree.roots.iter().map(height).max()
}
