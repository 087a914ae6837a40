//! navtree: ordered-tree editing engine for navigation menus.
//!
//! Layers, innermost first:
//! - [`domain`]: menu entities and pure tree operations (locate, remove,
//!   insert, update, move planning)
//! - [`application`]: editor state container and document import/export
//! - [`infrastructure`]: filesystem boundary and service wiring
//! - [`cli`]: command-line front end

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
