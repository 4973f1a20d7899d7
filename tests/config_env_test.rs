//! Environment overrides live in their own test binary: process env is shared
//! by every test in a binary.

use std::env;
use std::fs;

use tempfile::TempDir;

use treeselect::config::{local_config_path, Settings};

#[test]
fn given_env_vars_when_load_then_override_local_config() {
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "title_key = \"name\"\n\n[select]\nauto_select_children = true\n",
    )
    .unwrap();

    env::set_var("TREESELECT_TITLE_KEY", "label");
    env::set_var("TREESELECT_SELECT__AUTO_SELECT_CHILDREN", "false");
    let result = Settings::load(Some(project.path()));
    env::remove_var("TREESELECT_TITLE_KEY");
    env::remove_var("TREESELECT_SELECT__AUTO_SELECT_CHILDREN");

    let settings = result.expect("load settings");
    assert_eq!(settings.title_key, "label");
    assert!(!settings.select.auto_select_children);
    assert!(settings.select.auto_select_parents);
}
