use std::fs;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::tempdir;

use navtree::application::services::MenuDocumentService;
use navtree::application::ApplicationError;
use navtree::domain::{DomainError, MenuArena, MenuItemType};
use navtree::infrastructure::traits::RealFileSystem;
use navtree::util::testing::{init_test_setup, sample_menu, sample_pages};

fn service() -> MenuDocumentService {
    init_test_setup();
    MenuDocumentService::new(Arc::new(RealFileSystem))
}

#[rstest]
fn given_saved_menu_when_loaded_then_identical() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/menu.json");
    let svc = service();

    svc.save(&path, &sample_menu(), true).unwrap();
    let loaded = svc.load(&path, 4).unwrap();

    assert_eq!(loaded, sample_menu());
}

#[rstest]
fn given_export_when_inspected_then_uses_nested_records() {
    let json = MenuDocumentService::export(&sample_menu(), false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value[1]["id"], "2");
    assert_eq!(value[1]["type"], "dropdown");
    assert_eq!(value[1]["children"][0]["label"], "New Arrivals");
    assert_eq!(value[0]["children"], serde_json::json!([]));
    assert!(value[0].get("icon").is_none());
}

#[rstest]
fn given_missing_file_when_loading_then_not_found_or_default() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("menu.json");
    let svc = service();

    assert!(matches!(
        svc.load(&path, 4),
        Err(ApplicationError::DocumentNotFound(p)) if p == path
    ));
    assert!(svc.load_or_default(&path, 4).unwrap().is_empty());
}

#[rstest]
fn given_duplicate_ids_in_document_when_loading_then_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("menu.json");
    fs::write(
        &path,
        r#"[
            {"id": "a", "label": "A", "type": "link", "children": []},
            {"id": "a", "label": "B", "type": "link", "children": []}
        ]"#,
    )
    .unwrap();

    let err = service().load(&path, 4).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::DuplicateId(id)) if id == "a"
    ));
}

#[rstest]
fn given_malformed_json_when_loading_then_operation_failed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("menu.json");
    fs::write(&path, "[{").unwrap();

    let err = service().load(&path, 4).unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
}

#[rstest]
fn given_page_catalog_when_loaded_then_pages_parsed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pages.json");
    fs::write(&path, serde_json::to_string(&sample_pages()).unwrap()).unwrap();

    let pages = service().load_pages(&path).unwrap();

    assert_eq!(pages, sample_pages());
    let template = pages[5].to_template();
    assert_eq!(template.key, "page:p6");
    assert_eq!(template.item_type, MenuItemType::Link);
}

#[rstest]
#[case::nested(false)]
#[case::flat(true)]
fn given_exported_menu_when_imported_then_identical(#[case] flat: bool) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("import.json");
    let tree = sample_menu();
    let content = if flat {
        let rows = MenuArena::from_tree(&tree).unwrap().flatten();
        serde_json::to_string(&rows).unwrap()
    } else {
        MenuDocumentService::export(&tree, true).unwrap()
    };
    fs::write(&path, content).unwrap();

    let imported = service().import(&path, flat, 4).unwrap();

    assert_eq!(imported, tree);
}

#[rstest]
fn given_flat_rows_with_unknown_parent_when_importing_then_not_found() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rows.json");
    fs::write(
        &path,
        r#"[
            {"id": "a", "label": "A", "type": "link", "parentId": null, "depth": 0, "index": 0},
            {"id": "b", "label": "B", "type": "link", "parentId": "ghost", "depth": 1, "index": 0}
        ]"#,
    )
    .unwrap();

    let err = service().import(&path, true, 4).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::NodeNotFound(id)) if id == "ghost"
    ));
}

#[rstest]
fn given_flat_rows_deeper_than_limit_when_importing_then_depth_exceeded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rows.json");
    let rows = MenuArena::from_tree(&sample_menu()).unwrap().flatten();
    fs::write(&path, serde_json::to_string(&rows).unwrap()).unwrap();

    let err = service().import(&path, true, 1).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::DepthExceeded { .. })
    ));
}
