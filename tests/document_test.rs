//! Loading tree documents from disk and exporting the resulting state.

use std::fs;
use std::path::PathBuf;

use rstest::{fixture, rstest};
use serde_json::json;
use tempfile::TempDir;

use treeselect::application::{ApplicationError, TreeSelect};
use treeselect::config::Settings;
use treeselect::domain::{DomainError, NodePath};
use treeselect::infrastructure::{load_document, InfraError};

#[fixture]
fn workdir() -> TempDir {
    TempDir::new().unwrap()
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[rstest]
fn given_json_list_when_loading_then_engine_sees_seeded_flags(workdir: TempDir) {
    let path = write(
        &workdir,
        "tree.json",
        r#"[
  {"title": "A", "isExpanded": true, "data": [
    {"title": "A1", "isSelected": true},
    {"title": "A2"}
  ]},
  {"title": "B"}
]"#,
    );

    let document = load_document(&path).expect("load");
    let engine = TreeSelect::from_document(&document, &Settings::default(), ()).expect("engine");

    let a1 = engine.find(&"A/A1".parse().unwrap()).expect("A1");
    assert_eq!(engine.selection(), &[a1]);
    assert_eq!(engine.visible_rows().len(), 4);
}

#[rstest]
fn given_toml_table_when_loading_then_child_key_holds_roots(workdir: TempDir) {
    let path = write(
        &workdir,
        "tree.toml",
        r#"
[[items]]
name = "Fruit"

[[items.items]]
name = "Apple"

[[items.items]]
name = "Pear"
"#,
    );
    let settings = Settings {
        title_key: "name".to_string(),
        child_key: "items".to_string(),
        ..Settings::default()
    };

    let document = load_document(&path).expect("load");
    let mut engine = TreeSelect::from_document(&document, &settings, ()).expect("engine");
    let apple = engine.find(&"Fruit/Apple".parse().unwrap()).expect("Apple");
    let pear = engine.find(&"Fruit/Pear".parse().unwrap()).expect("Pear");
    engine.on_press_checkbox(apple).expect("press");
    engine.on_press_checkbox(pear).expect("press");

    let paths: Vec<String> = engine
        .selection()
        .iter()
        .filter_map(|&id| NodePath::of(engine.arena(), id))
        .map(|path| path.to_string())
        .collect();
    assert_eq!(paths, vec!["Fruit", "Fruit/Apple", "Fruit/Pear"]);
}

#[rstest]
fn given_scalar_document_when_building_then_invalid_document(workdir: TempDir) {
    let path = write(&workdir, "tree.json", "42");

    let document = load_document(&path).expect("load");
    let result = TreeSelect::from_document(&document, &Settings::default(), ());

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::InvalidDocument(_)))
    ));
}

#[rstest]
fn given_broken_json_when_loading_then_parse_error(workdir: TempDir) {
    let path = write(&workdir, "tree.json", "[{\"title\": ");

    let result = load_document(&path);

    assert!(matches!(result, Err(InfraError::Parse { .. })));
}

#[rstest]
fn given_selection_when_exporting_then_flags_written_back_and_extra_fields_kept(
    workdir: TempDir,
) {
    let path = write(
        &workdir,
        "tree.json",
        r#"[{"title": "A", "id": 7, "data": [{"title": "A1"}, {"title": "A2"}]}]"#,
    );
    let document = load_document(&path).expect("load");
    let mut engine = TreeSelect::from_document(&document, &Settings::default(), ()).expect("engine");
    let root = engine.arena().roots()[0];

    engine.on_press_checkbox(root).expect("press");
    let records = engine.to_records();

    assert_eq!(
        records,
        vec![json!({
            "title": "A",
            "id": 7,
            "isSelected": true,
            "isExpanded": false,
            "data": [
                {"title": "A1", "isSelected": true, "isExpanded": false},
                {"title": "A2", "isSelected": true, "isExpanded": false}
            ]
        })]
    );
}

#[rstest]
fn given_exported_records_when_reloaded_then_state_restored(workdir: TempDir) {
    let path = write(
        &workdir,
        "tree.json",
        r#"[{"title": "A", "data": [{"title": "A1"}, {"title": "A2"}]}]"#,
    );
    let document = load_document(&path).expect("load");
    let mut engine = TreeSelect::from_document(&document, &Settings::default(), ()).expect("engine");
    let a2 = engine.find(&"A/A2".parse().unwrap()).expect("A2");
    engine.on_press_checkbox(a2).expect("press");

    let exported = write(
        &workdir,
        "exported.json",
        &serde_json::to_string(&engine.to_records()).unwrap(),
    );
    let reloaded = TreeSelect::from_document(
        &load_document(&exported).expect("load"),
        &Settings::default(),
        (),
    )
    .expect("engine");

    let a2 = reloaded.find(&"A/A2".parse().unwrap()).expect("A2");
    assert_eq!(reloaded.selection(), &[a2]);
}
