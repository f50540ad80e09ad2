//! Known-fields configuration
//!
//! An optional, operator-editable hint file describing which flattened
//! columns are "known" per product category. The transforms work with an
//! empty config; the export and template commands use it to widen the
//! column universe.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default filename, looked up in the user config directory when no
/// explicit path is given.
pub const FIELDS_CONFIG_FILE_NAME: &str = "fields_config.json";

fn text_type() -> String {
    "text".to_string()
}

/// One field description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    #[serde(rename = "type", default = "text_type")]
    pub field_type: String,

    #[serde(default)]
    pub label: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// Field group for one product category (e.g. "tshirt").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldGroup {
    #[serde(rename = "displayOrder", default)]
    pub display_order: Vec<String>,

    #[serde(default)]
    pub fields: IndexMap<String, FieldDef>,
}

/// The full known-fields configuration, keyed by product category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnownFieldsConfig(pub IndexMap<String, FieldGroup>);

impl KnownFieldsConfig {
    /// Load from an explicit path, else from the user config directory,
    /// else fall back to an empty config. Unreadable or malformed default
    /// files degrade to empty; an explicit path that fails to parse is
    /// surfaced to the caller.
    pub fn load(explicit: Option<&Path>) -> Result<Self, String> {
        if let Some(path) = explicit {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
            return serde_json::from_str(&contents)
                .map_err(|e| format!("invalid fields config {}: {}", path.display(), e));
        }

        if let Some(path) = Self::default_path() {
            if path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&path) {
                    if let Ok(config) = serde_json::from_str(&contents) {
                        return Ok(config);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Default location under the user config directory.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "pct")
            .map(|dirs| dirs.config_dir().join(FIELDS_CONFIG_FILE_NAME))
    }

    /// Every field key declared across all groups, first-seen order,
    /// deduplicated.
    pub fn all_field_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        for group in self.0.values() {
            for key in group.fields.keys() {
                if !keys.iter().any(|k| k == key) {
                    keys.push(key.clone());
                }
            }
        }
        keys
    }
}
