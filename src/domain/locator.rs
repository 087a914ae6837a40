//! Tree locator: find a node, its parent and its index path by traversal.

use crate::domain::entities::{MenuNode, MenuTree};

/// Where a node sits in a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location<'a> {
    /// The matched node
    pub node: &'a MenuNode,
    /// Index among its siblings
    pub index: usize,
    /// Direct parent, None for root-level nodes
    pub parent: Option<&'a MenuNode>,
    /// Sibling indices from the root sequence down to the node
    pub path: Vec<usize>,
}

impl Location<'_> {
    /// Level of the node, 0 for root-level nodes.
    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent.map(|p| p.id())
    }
}

/// Locate the first node with `id` in pre-order.
///
/// Earlier siblings win, and children are searched before the next sibling,
/// so duplicated ids resolve to the first occurrence in pre-order.
pub fn locate<'a>(tree: &'a MenuTree, id: &str) -> Option<Location<'a>> {
    locate_in(&tree.roots, None, id)
}

fn locate_in<'a>(
    nodes: &'a [MenuNode],
    parent: Option<&'a MenuNode>,
    id: &str,
) -> Option<Location<'a>> {
    for (index, node) in nodes.iter().enumerate() {
        if node.id() == id {
            return Some(Location {
                node,
                index,
                parent,
                path: vec![index],
            });
        }
        if let Some(mut found) = locate_in(&node.children, Some(node), id) {
            found.path.insert(0, index);
            return Some(found);
        }
    }
    None
}

/// Follow an index path from the root sequence.
pub fn node_at_path<'a>(tree: &'a MenuTree, path: &[usize]) -> Option<&'a MenuNode> {
    let (first, rest) = path.split_first()?;
    let mut node = tree.roots.get(*first)?;
    for &index in rest {
        node = node.children.get(index)?;
    }
    Some(node)
}

/// Whether `id` is `node` itself or one of its descendants.
pub fn contains(node: &MenuNode, id: &str) -> bool {
    node.iter().any(|n| n.id() == id)
}

/// The children sequence a new node would be inserted into.
pub fn sequence<'a>(tree: &'a MenuTree, parent_id: Option<&str>) -> Option<&'a [MenuNode]> {
    match parent_id {
        None => Some(&tree.roots),
        Some(id) => locate(tree, id).map(|loc| loc.node.children.as_slice()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::sample_menu;

    #[test]
    fn given_root_node_when_locating_then_has_no_parent() {
        let tree = sample_menu();
        let loc = locate(&tree, "2").unwrap();
        assert_eq!(loc.index, 1);
        assert!(loc.parent.is_none());
        assert_eq!(loc.path, vec![1]);
        assert_eq!(loc.depth(), 0);
    }

    #[test]
    fn given_nested_node_when_locating_then_returns_parent_and_path() {
        let tree = sample_menu();
        let loc = locate(&tree, "22").unwrap();
        assert_eq!(loc.node.label(), "Best Sellers");
        assert_eq!(loc.index, 1);
        assert_eq!(loc.parent_id(), Some("2"));
        assert_eq!(loc.path, vec![1, 1]);
        assert_eq!(node_at_path(&tree, &loc.path).unwrap().id(), "22");
    }

    #[test]
    fn given_unknown_id_when_locating_then_none() {
        assert!(locate(&sample_menu(), "missing").is_none());
    }

    #[test]
    fn given_duplicate_ids_when_locating_then_first_in_preorder_wins() {
        use crate::domain::entities::{MenuItemType, MenuNode};
        let tree = MenuTree::new(vec![
            MenuNode::new("a", "A", MenuItemType::Dropdown)
                .with_children(vec![MenuNode::new("x", "nested", MenuItemType::Link)]),
            MenuNode::new("x", "root", MenuItemType::Link),
        ]);
        assert_eq!(locate(&tree, "x").unwrap().node.label(), "nested");
    }

    #[test]
    fn given_invalid_path_when_following_then_none() {
        let tree = sample_menu();
        assert!(node_at_path(&tree, &[]).is_none());
        assert!(node_at_path(&tree, &[0, 0]).is_none());
        assert!(node_at_path(&tree, &[9]).is_none());
    }
}
