//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treeselect/treeselect.toml`
//! 3. Local config: `<project_dir>/.treeselect.toml`
//! 4. Environment variables: `TREESELECT_*` prefix
//!
//! CLI flags are applied on top by the caller.

use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, SelectOptions};
use crate::domain::accessor::{DEFAULT_CHILD_KEY, DEFAULT_TITLE_KEY};
use crate::domain::KeyAccessor;

/// Raw select options for intermediate parsing (None means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSelectOptions {
    pub auto_select_parents: Option<bool>,
    pub auto_select_children: Option<bool>,
    pub auto_expandable: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub title_key: Option<String>,
    pub child_key: Option<String>,
    pub data_file: Option<PathBuf>,
    pub select: RawSelectOptions,
}

/// Unified configuration for treeselect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Field holding a record's label (default: "title")
    pub title_key: String,
    /// Field holding a record's children (default: "data")
    pub child_key: String,
    /// Tree document used when no file is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    /// Propagation behavior
    pub select: SelectOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title_key: DEFAULT_TITLE_KEY.into(),
            child_key: DEFAULT_CHILD_KEY.into(),
            data_file: None,
            select: SelectOptions::default(),
        }
    }
}

/// Non-fatal configuration problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Label and children are read from the same field
    SameKeys(String),
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::SameKeys(key) => write!(
                f,
                "title_key and child_key are both '{}'; labels and children will collide",
                key
            ),
        }
    }
}

/// Get the XDG config directory for treeselect.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treeselect").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treeselect.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".treeselect.toml")
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
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
    /// Record accessor reading the configured field names.
    pub fn accessor(&self) -> KeyAccessor {
        KeyAccessor::new(&self.title_key, &self.child_key)
    }

    pub fn select_options(&self) -> SelectOptions {
        self.select
    }

    /// Report self-contradictory settings. Never fails.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        if self.title_key == self.child_key {
            warnings.push(ConfigWarning::SameKeys(self.title_key.clone()));
        }
        warnings
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            title_key: overlay
                .title_key
                .clone()
                .unwrap_or_else(|| self.title_key.clone()),
            child_key: overlay
                .child_key
                .clone()
                .unwrap_or_else(|| self.child_key.clone()),
            data_file: overlay.data_file.clone().or_else(|| self.data_file.clone()),
            select: SelectOptions {
                auto_select_parents: overlay
                    .select
                    .auto_select_parents
                    .unwrap_or(self.select.auto_select_parents),
                auto_select_children: overlay
                    .select
                    .auto_select_children
                    .unwrap_or(self.select.auto_select_children),
                auto_expandable: overlay
                    .select
                    .auto_expandable
                    .unwrap_or(self.select.auto_expandable),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.treeselect.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply TREESELECT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREESELECT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("title_key") {
            settings.title_key = val;
        }
        if let Ok(val) = config.get_string("child_key") {
            settings.child_key = val;
        }
        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("select.auto_select_parents") {
            settings.select.auto_select_parents = val;
        }
        if let Ok(val) = config.get_bool("select.auto_select_children") {
            settings.select.auto_select_children = val;
        }
        if let Ok(val) = config.get_bool("select.auto_expandable") {
            settings.select.auto_expandable = val;
        }

        Ok(settings)
    }

    fn expand_paths(&mut self) {
        if let Some(path) = &self.data_file {
            self.data_file = Some(expand_path(path));
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treeselect configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treeselect/treeselect.toml
#   Local:  <project_dir>/.treeselect.toml
#   Env:    TREESELECT_* environment variables (TREESELECT_SELECT__AUTO_EXPANDABLE=true)

# Field holding a record's label
# title_key = "title"

# Field holding a record's children (must differ from title_key)
# child_key = "data"

# Tree document used when no file is given
# data_file = "~/trees/default.json"

[select]
# Parent is selected exactly when all of its children are
# auto_select_parents = true

# Selecting a node selects its whole subtree
# auto_select_children = true

# Selecting a node also expands it
# auto_expandable = false
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
    fn given_defaults_when_created_then_matches_component_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.title_key, "title");
        assert_eq!(settings.child_key, "data");
        assert!(settings.select.auto_select_parents);
        assert!(settings.select.auto_select_children);
        assert!(!settings.select.auto_expandable);
        assert!(settings.validate().is_empty());
    }

    #[test]
    fn given_same_keys_when_validating_then_warns() {
        let settings = Settings {
            child_key: "title".into(),
            ..Settings::default()
        };

        assert_eq!(
            settings.validate(),
            vec![ConfigWarning::SameKeys("title".into())]
        );
    }

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified() {
        let base = Settings::default();
        let overlay = RawSettings {
            child_key: Some("items".into()),
            select: RawSelectOptions {
                auto_expandable: Some(true),
                ..RawSelectOptions::default()
            },
            ..RawSettings::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.title_key, "title");
        assert_eq!(merged.child_key, "items");
        assert!(merged.select.auto_select_parents);
        assert!(merged.select.auto_expandable);
    }

    #[test]
    fn given_tilde_in_data_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_file: Some(PathBuf::from("~/trees/a.json")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let expanded = settings.data_file.expect("data_file");
        assert!(expanded.to_string_lossy().starts_with(&home));
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.title_key.is_none());
    }
}
