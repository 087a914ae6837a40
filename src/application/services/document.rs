//! Menu document service
//!
//! Reads and writes the nested JSON export format and the page catalog.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{unflatten, validate, AvailablePage, FlatMenuItem, MenuTree};
use crate::infrastructure::traits::FileSystem;

/// Service for importing and exporting menu documents.
pub struct MenuDocumentService {
    fs: Arc<dyn FileSystem>,
}

impl MenuDocumentService {
    /// Create a new document service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load a menu document and check it against the tree invariants.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path, max_depth: usize) -> ApplicationResult<MenuTree> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::DocumentNotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read menu", path)?;
        let tree = Self::parse(&content).with_path_context("parse menu", path)?;
        validate(&tree, max_depth)?;
        debug!("load: {} root items from {}", tree.roots.len(), path.display());
        Ok(tree)
    }

    /// Load a menu document, or an empty menu when the file does not exist.
    pub fn load_or_default(&self, path: &Path, max_depth: usize) -> ApplicationResult<MenuTree> {
        match self.load(path, max_depth) {
            Err(ApplicationError::DocumentNotFound(_)) => Ok(MenuTree::default()),
            other => other,
        }
    }

    /// Write the tree in export format, creating parent directories.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn save(&self, path: &Path, tree: &MenuTree, pretty: bool) -> ApplicationResult<()> {
        let content = Self::export(tree, pretty).with_path_context("serialize menu", path)?;
        self.fs
            .ensure_parent(path)
            .with_path_context("create directory for", path)?;
        self.fs
            .write(path, &content)
            .with_path_context("write menu", path)?;
        Ok(())
    }

    /// Read a menu for import, either nested export format or the flat
    /// rows printed by `list --json`, and check it against the invariants.
    #[instrument(level = "debug", skip(self))]
    pub fn import(&self, path: &Path, flat: bool, max_depth: usize) -> ApplicationResult<MenuTree> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read import", path)?;
        let tree = if flat {
            let rows: Vec<FlatMenuItem> =
                serde_json::from_str(&content).with_path_context("parse rows", path)?;
            unflatten(&rows)?
        } else {
            Self::parse(&content).with_path_context("parse menu", path)?
        };
        validate(&tree, max_depth)?;
        debug!("import: {} root items from {}", tree.roots.len(), path.display());
        Ok(tree)
    }

    /// Load the read-only page catalog (JSON array of pages).
    pub fn load_pages(&self, path: &Path) -> ApplicationResult<Vec<AvailablePage>> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read page catalog", path)?;
        serde_json::from_str(&content).with_path_context("parse page catalog", path)
    }

    pub fn parse(content: &str) -> serde_json::Result<MenuTree> {
        serde_json::from_str(content)
    }

    /// Export format: nested records mirroring the node shape.
    pub fn export(tree: &MenuTree, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(tree)
        } else {
            serde_json::to_string(tree)
        }
    }
}
