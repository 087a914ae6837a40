//! Move planner: take a node out of its position and put it somewhere else.
//!
//! Reorders (same parent) and transfers (different parent, including root
//! level) run through the same steps: locate, cycle check, depth check,
//! remove, resolve the destination index, insert.

use tracing::{debug, instrument, warn};

use crate::domain::entities::MenuTree;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::locator::{self, Location};
use crate::domain::mutator;

/// Default number of nesting levels (levels 0..=3).
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// A requested move, as translated from a drag gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveRequest {
    /// Node being dragged
    pub active_id: String,
    /// Node the pointer was over when dropped
    pub over_id: Option<String>,
    /// Destination parent, None for root level
    pub target_parent_id: Option<String>,
    /// Destination index in the post-removal sequence
    pub target_index: Option<usize>,
}

impl MoveRequest {
    pub fn new(active_id: impl Into<String>) -> Self {
        Self {
            active_id: active_id.into(),
            ..Default::default()
        }
    }

    pub fn over(mut self, over_id: impl Into<String>) -> Self {
        self.over_id = Some(over_id.into());
        self
    }

    pub fn under(mut self, parent_id: impl Into<String>) -> Self {
        self.target_parent_id = Some(parent_id.into());
        self
    }

    pub fn at(mut self, index: usize) -> Self {
        self.target_index = Some(index);
        self
    }
}

/// How a move changed the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// Sibling order changed under the same parent
    Reorder,
    /// Node changed parent
    Transfer,
    /// Nothing to do (unresolvable parent, dropped onto itself, already in place)
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub tree: MenuTree,
    pub kind: MoveKind,
}

/// Plans moves under a maximum nesting depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePlanner {
    max_depth: usize,
}

impl Default for MovePlanner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl MovePlanner {
    /// `max_depth` is a number of levels; values below 1 are treated as 1.
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Deepest allowed 0-indexed level.
    pub fn max_level(&self) -> usize {
        self.max_depth - 1
    }

    #[instrument(level = "debug", skip(self, tree))]
    pub fn plan(&self, tree: &MenuTree, request: &MoveRequest) -> DomainResult<MoveOutcome> {
        let active_id = request.active_id.as_str();
        let target_parent = request.target_parent_id.as_deref();

        let active = locator::locate(tree, active_id)
            .ok_or_else(|| DomainError::NodeNotFound(active_id.to_string()))?;

        if let Some(parent_id) = target_parent {
            if locator::contains(active.node, parent_id) {
                return Err(DomainError::InvalidMove {
                    active: active_id.to_string(),
                    target: parent_id.to_string(),
                });
            }
        }

        // destination depth is taken from the original tree; the removed
        // subtree never contains the destination parent, so it is unaffected
        let dest_depth = match target_parent {
            None => 0,
            Some(parent_id) => match locator::locate(tree, parent_id) {
                None => {
                    warn!("move target parent not found: {}", parent_id);
                    return Ok(self.unchanged(tree));
                }
                Some(parent) if !parent.node.item_type().accepts_children() => {
                    return Err(DomainError::NotAContainer(parent_id.to_string()));
                }
                Some(parent) => parent.depth() + 1,
            },
        };

        if request.target_index.is_none() && request.over_id.as_deref() == Some(active_id) {
            debug!("dropped onto itself");
            return Ok(self.unchanged(tree));
        }

        let deepest = dest_depth + mutator::height(active.node);
        if deepest > self.max_level() {
            return Err(DomainError::DepthExceeded {
                id: active_id.to_string(),
                depth: deepest,
                max: self.max_level(),
            });
        }

        let source_parent = active.parent_id().map(str::to_string);
        let node = active.node.clone();
        let intermediate = mutator::remove(tree, active_id);
        let index = resolve_index(&intermediate, request, target_parent, &active);
        debug!(
            "moving {} from {:?} to {:?} at {}",
            active_id, source_parent, target_parent, index
        );

        let moved = mutator::insert(&intermediate, target_parent, index, node)?;
        let kind = if moved == *tree {
            debug!("{} already in place", active_id);
            MoveKind::Unchanged
        } else if source_parent.as_deref() == target_parent {
            MoveKind::Reorder
        } else {
            MoveKind::Transfer
        };
        Ok(MoveOutcome { tree: moved, kind })
    }

    fn unchanged(&self, tree: &MenuTree) -> MoveOutcome {
        MoveOutcome {
            tree: tree.clone(),
            kind: MoveKind::Unchanged,
        }
    }
}

/// Destination index into the post-removal sequence.
///
/// An explicit index wins. Otherwise the over node is re-located in the
/// intermediate tree; when it lives in the destination sequence the moved
/// node takes the slot the over node held before the removal. A node dragged
/// forward within its own sequence therefore lands after the over node, any
/// other drop lands before it. Anything else appends.
fn resolve_index(
    intermediate: &MenuTree,
    request: &MoveRequest,
    parent_id: Option<&str>,
    source: &Location<'_>,
) -> usize {
    let len = locator::sequence(intermediate, parent_id).map_or(0, <[_]>::len);
    if let Some(index) = request.target_index {
        return index.min(len);
    }
    let Some(over) = request
        .over_id
        .as_deref()
        .and_then(|over| locator::locate(intermediate, over))
        .filter(|over| over.parent_id() == parent_id)
    else {
        return len;
    };
    if source.parent_id() == parent_id && source.index <= over.index {
        (over.index + 1).min(len)
    } else {
        over.index
    }
}
