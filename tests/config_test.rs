use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use navtree::application::ApplicationError;
use navtree::config::{local_config_path, Settings};

#[test]
fn given_local_config_when_loading_then_values_applied_and_paths_anchored() {
    let dir = tempdir().unwrap();
    fs::write(
        local_config_path(dir.path()),
        r#"
max_depth = 3
menu_file = "menus/main.json"
pages_file = "/srv/site/pages.json"
pretty = false
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).unwrap();

    assert_eq!(settings.max_depth, 3);
    assert_eq!(settings.menu_file, dir.path().join("menus/main.json"));
    assert_eq!(settings.pages_file, Some(PathBuf::from("/srv/site/pages.json")));
    assert!(!settings.pretty);
}

#[test]
fn given_partial_local_config_when_loading_then_rest_stays_default() {
    let dir = tempdir().unwrap();
    fs::write(local_config_path(dir.path()), "pretty = false\n").unwrap();

    let settings = Settings::load(Some(dir.path())).unwrap();

    assert_eq!(settings.max_depth, 4);
    assert!(!settings.pretty);
}

#[test]
fn given_zero_depth_in_local_config_when_loading_then_config_error() {
    let dir = tempdir().unwrap();
    fs::write(local_config_path(dir.path()), "max_depth = 0\n").unwrap();

    let result = Settings::load(Some(dir.path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_invalid_toml_when_loading_then_config_error() {
    let dir = tempdir().unwrap();
    fs::write(local_config_path(dir.path()), "max_depth = [\n").unwrap();

    let result = Settings::load(Some(dir.path()));

    assert!(matches!(result, Err(ApplicationError::Config { message }) if message.contains("parse")));
}

#[test]
fn given_template_when_parsed_then_yields_defaults() {
    let settings: Settings = toml::from_str(&Settings::template()).unwrap();
    assert_eq!(settings, Settings::default());
}
