//! Environment overrides live in their own test binary: the variables are
//! process-wide and would leak into the other config tests.

use std::env;
use std::fs;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use navtree::config::{local_config_path, Settings};

#[test]
fn given_navtree_env_vars_when_loading_then_they_override_files_and_resolve_in_project() {
    let dir = tempdir().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "max_depth = 3\npretty = true\n",
    )
    .unwrap();

    env::set_var("NAVTREE_MAX_DEPTH", "2");
    env::set_var("NAVTREE_PAGES_FILE", "catalog/pages.json");
    env::set_var("NAVTREE_PRETTY", "false");
    let loaded = Settings::load(Some(dir.path()));
    env::remove_var("NAVTREE_MAX_DEPTH");
    env::remove_var("NAVTREE_PAGES_FILE");
    env::remove_var("NAVTREE_PRETTY");

    let settings = loaded.unwrap();
    assert_eq!(settings.max_depth, 2);
    assert_eq!(
        settings.pages_file,
        Some(dir.path().join("catalog/pages.json"))
    );
    assert!(!settings.pretty);
    assert_eq!(settings.menu_file, dir.path().join("menu.json"));
}
