//! Application services

pub mod document;
pub mod editor;

pub use document::MenuDocumentService;
pub use editor::{DropTarget, MenuEditor};
