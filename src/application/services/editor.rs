//! Editor state container
//!
//! Owns the current menu tree and turns one gesture into one state
//! transition. Every transition computes a complete new tree first and only
//! then replaces the held one, so a failed gesture leaves the state as it was.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    locate, mutator, validate, DomainError, FlatMenuItem, IdGenerator, Library,
    LibraryTemplate, Location, MenuTree, MoveKind, MovePlanner, MoveRequest, NodePatch,
};

/// Where a dragged item was released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Released on an existing node: placed next to it, at the same level
    Adjacent { over_id: String },
    /// Released on a container's child drop zone: nested under it
    Into {
        parent_id: String,
        index: Option<usize>,
    },
    /// Released on the root drop zone
    Root { index: Option<usize> },
}

/// Menu tree plus the collaborators needed to edit it.
pub struct MenuEditor {
    tree: MenuTree,
    planner: MovePlanner,
    library: Library,
    ids: Arc<dyn IdGenerator>,
}

impl MenuEditor {
    /// Create an editor over an existing tree.
    ///
    /// The tree is validated against the depth limit and identifier
    /// uniqueness before it is accepted.
    pub fn new(
        tree: MenuTree,
        max_depth: usize,
        library: Library,
        ids: Arc<dyn IdGenerator>,
    ) -> ApplicationResult<Self> {
        let planner = MovePlanner::new(max_depth);
        validate(&tree, planner.max_depth())?;
        Ok(Self {
            tree,
            planner,
            library,
            ids,
        })
    }

    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    pub fn into_tree(self) -> MenuTree {
        self.tree
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn planner(&self) -> &MovePlanner {
        &self.planner
    }

    pub fn locate(&self, id: &str) -> Option<Location<'_>> {
        locate(&self.tree, id)
    }

    pub fn node_count(&self) -> usize {
        mutator::count_nodes(&self.tree)
    }

    /// Pre-order rows for list views.
    pub fn flat_items(&self) -> ApplicationResult<Vec<FlatMenuItem>> {
        Ok(validate(&self.tree, self.planner.max_depth())?.flatten())
    }

    /// Labels from the root item down to `id`, for breadcrumb display.
    pub fn breadcrumb(&self, id: &str) -> ApplicationResult<Vec<String>> {
        let arena = validate(&self.tree, self.planner.max_depth())?;
        let trail: Vec<String> = arena.ancestry(id).iter().map(|i| i.label.clone()).collect();
        if trail.is_empty() {
            return Err(DomainError::NodeNotFound(id.to_string()).into());
        }
        Ok(trail)
    }

    /// Drop a library template by key. Returns the new node's id.
    pub fn drop_template(&mut self, key: &str, target: &DropTarget) -> ApplicationResult<String> {
        let template = self
            .library
            .template(key)
            .ok_or_else(|| ApplicationError::UnknownTemplate(key.to_string()))?;
        self.drop_new(&template, target)
    }

    /// Instantiate `template` and insert it at `target`. Returns the new id.
    ///
    /// Dropping onto an existing node inserts right after it.
    #[instrument(level = "debug", skip(self, template), fields(template = %template.key))]
    pub fn drop_new(
        &mut self,
        template: &LibraryTemplate,
        target: &DropTarget,
    ) -> ApplicationResult<String> {
        let node = template.instantiate(self.ids.as_ref());
        let new_id = node.id().to_string();

        let (parent_id, index) = match target {
            DropTarget::Root { index } => (None, index.unwrap_or(self.tree.roots.len())),
            DropTarget::Into { parent_id, index } => {
                (Some(parent_id.clone()), index.unwrap_or(usize::MAX))
            }
            DropTarget::Adjacent { over_id } => {
                let over = locate(&self.tree, over_id)
                    .ok_or_else(|| DomainError::NodeNotFound(over_id.clone()))?;
                (over.parent_id().map(str::to_string), over.index + 1)
            }
        };

        let depth = match parent_id.as_deref() {
            None => 0,
            Some(pid) => {
                locate(&self.tree, pid)
                    .ok_or_else(|| DomainError::NodeNotFound(pid.to_string()))?
                    .depth()
                    + 1
            }
        };
        if depth > self.planner.max_level() {
            return Err(DomainError::DepthExceeded {
                id: new_id,
                depth,
                max: self.planner.max_level(),
            }
            .into());
        }

        self.tree = mutator::insert(&self.tree, parent_id.as_deref(), index, node)?;
        info!("dropped {} as {} under {:?}", template.key, new_id, parent_id);
        Ok(new_id)
    }

    /// Move an existing node to `target`.
    #[instrument(level = "debug", skip(self))]
    pub fn move_item(&mut self, active_id: &str, target: &DropTarget) -> ApplicationResult<MoveKind> {
        let request = match target {
            DropTarget::Root { index } => MoveRequest {
                active_id: active_id.to_string(),
                over_id: None,
                target_parent_id: None,
                target_index: *index,
            },
            DropTarget::Into { parent_id, index } => MoveRequest {
                active_id: active_id.to_string(),
                over_id: None,
                target_parent_id: Some(parent_id.clone()),
                target_index: *index,
            },
            DropTarget::Adjacent { over_id } => {
                let Some(over) = locate(&self.tree, over_id) else {
                    warn!("drop target not found: {}", over_id);
                    return Ok(MoveKind::Unchanged);
                };
                MoveRequest {
                    active_id: active_id.to_string(),
                    over_id: Some(over_id.clone()),
                    target_parent_id: over.parent_id().map(str::to_string),
                    target_index: None,
                }
            }
        };

        let outcome = self.planner.plan(&self.tree, &request)?;
        debug!("move {} -> {:?}", active_id, outcome.kind);
        self.tree = outcome.tree;
        Ok(outcome.kind)
    }

    /// Delete a node and its subtree. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let found = locate(&self.tree, id).is_some();
        if found {
            self.tree = mutator::remove(&self.tree, id);
            info!("removed {}", id);
        }
        found
    }

    /// Edit fields of a node. Returns whether the node exists.
    pub fn update(&mut self, id: &str, patch: &NodePatch) -> bool {
        let found = locate(&self.tree, id).is_some();
        if found {
            self.tree = mutator::update(&self.tree, id, patch);
            debug!("updated {}: {:?}", id, patch);
        }
        found
    }

    /// Flip the hidden flag. Returns the new state.
    pub fn toggle_hidden(&mut self, id: &str) -> ApplicationResult<bool> {
        let hidden = !locate(&self.tree, id)
            .ok_or_else(|| DomainError::NodeNotFound(id.to_string()))?
            .node
            .item
            .is_hidden();
        let patch = NodePatch {
            hidden: Some(hidden),
            ..Default::default()
        };
        self.tree = mutator::update(&self.tree, id, &patch);
        Ok(hidden)
    }

    /// Copy a node (with fresh ids for its whole subtree) right after it.
    /// Returns the copy's id.
    pub fn duplicate(&mut self, id: &str) -> ApplicationResult<String> {
        let tree = mutator::duplicate(&self.tree, id, self.ids.as_ref())?;
        let loc = locate(&self.tree, id).ok_or_else(|| DomainError::NodeNotFound(id.to_string()))?;
        let siblings = match loc.parent_id() {
            None => &tree.roots,
            Some(pid) => {
                &locate(&tree, pid)
                    .ok_or_else(|| DomainError::NodeNotFound(pid.to_string()))?
                    .node
                    .children
            }
        };
        let copy_id = siblings
            .get(loc.index + 1)
            .map(|n| n.id().to_string())
            .ok_or_else(|| DomainError::NodeNotFound(id.to_string()))?;
        self.tree = tree;
        Ok(copy_id)
    }
}
