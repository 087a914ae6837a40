use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{FlatMenuItem, MenuItem, MenuNode, MenuTree};
use crate::domain::error::{DomainError, DomainResult};

/// Slot of the arena: item data plus explicit parent/child indices.
#[derive(Debug)]
pub struct ArenaNode {
    pub item: MenuItem,
    /// Index of parent node in the arena, None for root-level nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in order
    pub children: Vec<Index>,
}

/// Index-based view of a menu tree with an explicit parent table.
///
/// The arena is built from a [`MenuTree`] and is never shared with it: the
/// parent indices live only here, so tree values stay free of back-pointers.
#[derive(Debug, Default)]
pub struct MenuArena {
    arena: Arena<ArenaNode>,
    roots: Vec<Index>,
    by_id: HashMap<String, Index>,
}

impl MenuArena {
    /// Build the arena, rejecting duplicated identifiers and malformed dividers.
    #[instrument(level = "debug", skip(tree))]
    pub fn from_tree(tree: &MenuTree) -> DomainResult<Self> {
        let mut arena = Self::default();
        let mut stack: Vec<(&MenuNode, Option<Index>)> =
            tree.roots.iter().rev().map(|n| (n, None)).collect();

        while let Some((node, parent)) = stack.pop() {
            node.check_shape()?;
            if arena.by_id.contains_key(node.id()) {
                return Err(DomainError::DuplicateId(node.id().to_string()));
            }
            let idx = arena.arena.insert(ArenaNode {
                item: node.item.clone(),
                parent,
                children: Vec::new(),
            });
            arena.by_id.insert(node.id().to_string(), idx);
            match parent.and_then(|p| arena.arena.get_mut(p)) {
                Some(parent_node) => parent_node.children.push(idx),
                None => arena.roots.push(idx),
            }
            // reversed so children come off the stack left to right
            for child in node.children.iter().rev() {
                stack.push((child, Some(idx)));
            }
        }
        Ok(arena)
    }

    pub fn get(&self, id: &str) -> Option<&ArenaNode> {
        self.by_id.get(id).and_then(|&idx| self.arena.get(idx))
    }

    /// Items from the root down to `id`, inclusive. Empty for unknown ids.
    pub fn ancestry(&self, id: &str) -> Vec<&MenuItem> {
        let mut chain = Vec::new();
        let mut current = self.get(id);
        while let Some(node) = current {
            chain.push(&node.item);
            current = node.parent.and_then(|p| self.arena.get(p));
        }
        chain.reverse();
        chain
    }

    /// Pre-order rows with parent id, depth and sibling index.
    pub fn flatten(&self) -> Vec<FlatMenuItem> {
        let mut rows = Vec::with_capacity(self.arena.len());
        let mut stack: Vec<(Index, usize, usize)> = self
            .roots
            .iter()
            .enumerate()
            .rev()
            .map(|(i, &idx)| (idx, 0, i))
            .collect();

        while let Some((idx, depth, index)) = stack.pop() {
            let Some(node) = self.arena.get(idx) else {
                continue;
            };
            rows.push(FlatMenuItem {
                item: node.item.clone(),
                parent_id: node
                    .parent
                    .and_then(|p| self.arena.get(p))
                    .map(|p| p.item.id.clone()),
                depth,
                index,
            });
            for (i, &child) in node.children.iter().enumerate().rev() {
                stack.push((child, depth + 1, i));
            }
        }
        rows
    }

    /// Rebuild the nested tree.
    pub fn to_tree(&self) -> MenuTree {
        MenuTree::new(self.roots.iter().filter_map(|&idx| self.build(idx)).collect())
    }

    fn build(&self, idx: Index) -> Option<MenuNode> {
        let node = self.arena.get(idx)?;
        Some(MenuNode {
            item: node.item.clone(),
            children: node.children.iter().filter_map(|&c| self.build(c)).collect(),
        })
    }
}

/// Check the whole-tree invariants: unique ids, divider shape, depth bound.
pub fn validate(tree: &MenuTree, max_depth: usize) -> DomainResult<MenuArena> {
    let arena = MenuArena::from_tree(tree)?;
    let max_level = max_depth.max(1) - 1;
    if let Some(row) = arena.flatten().into_iter().find(|r| r.depth > max_level) {
        return Err(DomainError::DepthExceeded {
            id: row.item.id,
            depth: row.depth,
            max: max_level,
        });
    }
    Ok(arena)
}

/// Rebuild a nested tree from flat rows (pre-order or any order where
/// parents come before their children). Rows are placed by their `index`.
pub fn unflatten(rows: &[FlatMenuItem]) -> DomainResult<MenuTree> {
    let mut sorted: Vec<&FlatMenuItem> = rows.iter().collect();
    sorted.sort_by_key(|r| (r.depth, r.index));

    let mut arena = MenuArena::default();
    for row in sorted {
        if arena.by_id.contains_key(&row.item.id) {
            return Err(DomainError::DuplicateId(row.item.id.clone()));
        }
        let parent = match &row.parent_id {
            None => None,
            Some(pid) => Some(
                *arena
                    .by_id
                    .get(pid)
                    .ok_or_else(|| DomainError::NodeNotFound(pid.clone()))?,
            ),
        };
        let idx = arena.arena.insert(ArenaNode {
            item: row.item.clone(),
            parent,
            children: Vec::new(),
        });
        arena.by_id.insert(row.item.id.clone(), idx);
        match parent.and_then(|p| arena.arena.get_mut(p)) {
            Some(p) => p.children.push(idx),
            None => arena.roots.push(idx),
        }
    }
    let tree = arena.to_tree();
    MenuArena::from_tree(&tree)?;
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::MenuItemType;
    use crate::util::testing::sample_menu;
    use pretty_assertions::assert_eq;

    #[test]
    fn given_tree_when_flattening_then_rows_are_preorder_with_parents() {
        let arena = MenuArena::from_tree(&sample_menu()).unwrap();
        let rows = arena.flatten();
        let summary: Vec<_> = rows
            .iter()
            .map(|r| (r.item.id.as_str(), r.parent_id.as_deref(), r.depth, r.index))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("1", None, 0, 0),
                ("2", None, 0, 1),
                ("21", Some("2"), 1, 0),
                ("22", Some("2"), 1, 1),
                ("3", None, 0, 2),
            ]
        );
    }

    #[test]
    fn given_flat_rows_when_unflattening_then_tree_is_rebuilt() {
        let tree = sample_menu();
        let rows = MenuArena::from_tree(&tree).unwrap().flatten();
        assert_eq!(unflatten(&rows).unwrap(), tree);
    }

    #[test]
    fn given_nested_node_when_querying_ancestry_then_root_first() {
        let arena = MenuArena::from_tree(&sample_menu()).unwrap();
        let ids: Vec<_> = arena.ancestry("21").iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "21"]);
        assert!(arena.get("22").and_then(|n| n.parent).is_some());
        assert!(arena.ancestry("ghost").is_empty());
    }

    #[test]
    fn given_duplicate_ids_when_building_arena_then_rejected() {
        let tree = MenuTree::new(vec![
            MenuNode::new("a", "A", MenuItemType::Link),
            MenuNode::new("a", "B", MenuItemType::Link),
        ]);
        assert_eq!(
            MenuArena::from_tree(&tree).unwrap_err(),
            DomainError::DuplicateId("a".into())
        );
    }

    #[test]
    fn given_tree_deeper_than_limit_when_validating_then_depth_exceeded() {
        let tree = sample_menu();
        assert!(validate(&tree, 2).is_ok());
        assert!(matches!(
            validate(&tree, 1).unwrap_err(),
            DomainError::DepthExceeded { depth: 1, max: 0, .. }
        ));
    }

    #[test]
    fn given_divider_with_children_when_validating_then_invalid_node() {
        let mut divider = MenuNode::new("d", "Divider", MenuItemType::Divider);
        divider.children.push(MenuNode::new("x", "X", MenuItemType::Link));
        let tree = MenuTree::new(vec![divider]);
        assert!(matches!(
            validate(&tree, 4).unwrap_err(),
            DomainError::InvalidNode { .. }
        ));
    }
}
