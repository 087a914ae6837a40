//! Domain layer: menu tree entities and the pure tree operations
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod display;
pub mod entities;
pub mod error;
pub mod id;
pub mod library;
pub mod locator;
pub mod mutator;
pub mod planner;

pub use arena::{unflatten, validate, MenuArena};
pub use display::TreeDisplay;
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use id::{new_id, IdGenerator, UuidGenerator};
pub use library::{AvailablePage, Library, LibraryTemplate, PageKind};
pub use locator::{locate, Location};
pub use planner::{MoveKind, MoveOutcome, MovePlanner, MoveRequest, DEFAULT_MAX_DEPTH};

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
