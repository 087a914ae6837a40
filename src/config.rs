//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/navtree/navtree.toml`
//! 3. Local config: `<project_dir>/.navtree.toml`
//! 4. Environment variables: `NAVTREE_*` prefix
//!
//! Relative paths from any layer resolve against the project directory.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, DEFAULT_MAX_DEPTH};

/// Unified configuration for navtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Number of nesting levels a menu may use (default: 4, levels 0..=3)
    pub max_depth: usize,
    /// Menu document edited when no `--file` is given
    pub menu_file: PathBuf,
    /// Page catalog offered by the library (JSON array), if any
    pub pages_file: Option<PathBuf>,
    /// Pretty-print exported JSON
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            menu_file: PathBuf::from("menu.json"),
            pages_file: None,
            pretty: true,
        }
    }
}

/// Raw settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub max_depth: Option<usize>,
    pub menu_file: Option<PathBuf>,
    pub pages_file: Option<PathBuf>,
    pub pretty: Option<bool>,
}

/// Get the XDG config directory for navtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "navtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("navtree.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".navtree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.menu_file.to_string_lossy().as_ref());
        self.menu_file = PathBuf::from(expanded);

        if let Some(pages) = &self.pages_file {
            self.pages_file = Some(PathBuf::from(expand_env_vars(
                pages.to_string_lossy().as_ref(),
            )));
        }
    }

    /// Relative paths are taken relative to the project directory.
    fn anchor_paths(&mut self, project_dir: &Path) {
        if self.menu_file.is_relative() {
            self.menu_file = project_dir.join(&self.menu_file);
        }
        if let Some(pages) = self.pages_file.as_ref().filter(|p| p.is_relative()) {
            self.pages_file = Some(project_dir.join(pages));
        }
    }

    /// Merge overlay config onto self (base): overlay wins if specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            max_depth: overlay.max_depth.unwrap_or(self.max_depth),
            menu_file: overlay
                .menu_file
                .clone()
                .unwrap_or_else(|| self.menu_file.clone()),
            pages_file: overlay
                .pages_file
                .clone()
                .or_else(|| self.pages_file.clone()),
            pretty: overlay.pretty.unwrap_or(self.pretty),
        }
    }

    fn validate(self) -> Result<Self, ApplicationError> {
        if self.max_depth == 0 {
            return Err(ApplicationError::Config {
                message: "max_depth must be at least 1".into(),
            });
        }
        Ok(self)
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/navtree/navtree.toml`
    /// 3. Local config: `<project_dir>/.navtree.toml`
    /// 4. Environment variables: `NAVTREE_*` prefix
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = match project_dir {
            Some(dir) => current.with_local(dir)?,
            None => current,
        };

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        if let Some(dir) = project_dir {
            current.anchor_paths(dir);
        }

        current.validate()
    }

    /// Merge the project-local config file, if present.
    fn with_local(self, project_dir: &Path) -> Result<Self, ApplicationError> {
        let local_path = local_config_path(project_dir);
        if !local_path.exists() {
            return Ok(self);
        }
        let raw = load_raw_settings(&local_path)?;
        Ok(self.merge_with(&raw))
    }

    /// Apply NAVTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("NAVTREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_int("max_depth") {
            settings.max_depth = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("invalid max_depth: {val}"),
            })?;
        }
        if let Ok(val) = config.get_string("menu_file") {
            settings.menu_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("pages_file") {
            settings.pages_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("pretty") {
            settings.pretty = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# navtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/navtree/navtree.toml
#   Local:  <project_dir>/.navtree.toml
#   Env:    NAVTREE_* environment variables (explicit overrides),
#           e.g. NAVTREE_MAX_DEPTH=3, NAVTREE_PAGES_FILE=pages.json
#
# Relative paths resolve against the project directory.

# Number of nesting levels a menu may use (levels 0..max_depth-1)
# max_depth = 4

# Menu document used when --file is not given
# menu_file = "menu.json"

# Page catalog for the item library: JSON array of
#   {"id": "p1", "title": "Home", "path": "/", "type": "page"}
# pages_file = "pages.json"

# Pretty-print exported JSON
# pretty = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.max_depth, 4);
        assert_eq!(settings.menu_file, PathBuf::from("menu.json"));
        assert!(settings.pages_file.is_none());
        assert!(settings.pretty);
    }

    #[test]
    fn given_overlay_when_merging_then_specified_fields_win() {
        let base = Settings::default();
        let overlay = RawSettings {
            max_depth: Some(2),
            pages_file: Some(PathBuf::from("pages.json")),
            ..Default::default()
        };
        let merged = base.merge_with(&overlay);
        assert_eq!(merged.max_depth, 2);
        assert_eq!(merged.pages_file, Some(PathBuf::from("pages.json")));
        assert_eq!(merged.menu_file, base.menu_file);
        assert!(merged.pretty);
    }

    #[test]
    fn given_tilde_in_paths_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            menu_file: PathBuf::from("~/menus/main.json"),
            pages_file: Some(PathBuf::from("$HOME/pages.json")),
            ..Default::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(settings.menu_file.to_string_lossy().starts_with(&home));
        assert!(settings
            .pages_file
            .unwrap()
            .to_string_lossy()
            .starts_with(&home));
    }

    #[test]
    fn given_relative_paths_when_anchoring_then_joined_to_project() {
        let mut settings = Settings {
            pages_file: Some(PathBuf::from("data/pages.json")),
            ..Default::default()
        };
        settings.anchor_paths(Path::new("/srv/site"));
        assert_eq!(settings.menu_file, PathBuf::from("/srv/site/menu.json"));
        assert_eq!(
            settings.pages_file,
            Some(PathBuf::from("/srv/site/data/pages.json"))
        );
    }

    #[test]
    fn given_zero_depth_when_validating_then_config_error() {
        let settings = Settings {
            max_depth: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ApplicationError::Config { .. })
        ));
    }

    #[test]
    fn given_settings_when_rendered_as_toml_then_parses_back() {
        let settings = Settings::default();
        let rendered = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, settings);
    }
}
