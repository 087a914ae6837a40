//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::services::{MenuDocumentService, MenuEditor};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{IdGenerator, Library, UuidGenerator};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Identifier source for new nodes
    pub ids: Arc<dyn IdGenerator>,

    /// Menu document import/export
    pub documents: MenuDocumentService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(UuidGenerator))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let settings = Arc::new(settings);
        let documents = MenuDocumentService::new(fs.clone());

        Self {
            settings,
            fs,
            ids,
            documents,
        }
    }

    /// Item library: configured page catalog plus custom archetypes.
    pub fn library(&self) -> ApplicationResult<Library> {
        let pages = match &self.settings.pages_file {
            Some(path) => self.documents.load_pages(path)?,
            None => Vec::new(),
        };
        debug!("library: {} catalog pages", pages.len());
        Ok(Library::new(pages))
    }

    /// Open an editor on the menu document at `path` (empty menu if missing).
    pub fn open_editor(&self, path: &Path) -> ApplicationResult<MenuEditor> {
        let tree = self
            .documents
            .load_or_default(path, self.settings.max_depth)?;
        MenuEditor::new(
            tree,
            self.settings.max_depth,
            self.library()?,
            self.ids.clone(),
        )
    }

    /// Write the editor's tree back to `path`.
    pub fn save_editor(&self, path: &Path, editor: &MenuEditor) -> ApplicationResult<()> {
        self.documents
            .save(path, editor.tree(), self.settings.pretty)
    }
}
