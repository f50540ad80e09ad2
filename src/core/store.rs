//! Configuration document I/O
//!
//! The on-disk document is a single JSON object mapping product keys to
//! product definitions, with one reserved key, `catalog`, holding the
//! print layout. Loading splits the two apart; saving runs the mockup
//! reconciliation pass and writes keys in canonical order: alias products
//! first (sorted), then everything else (sorted), `catalog` among them.

use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::core::catalog::{CatalogLayout, CATALOG_KEY};
use crate::core::product::{Product, ProductMap};
use crate::transform::{reconcile_mockups, Warning};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("{path}: top level must be a JSON object")]
    NotAnObject { path: String },

    #[error("Invalid entry '{key}': {source}")]
    InvalidEntry {
        key: String,
        source: serde_json::Error,
    },

    #[error("Cannot write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// An in-memory configuration document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    pub products: ProductMap,
    pub catalog: Option<CatalogLayout>,
}

impl ConfigDocument {
    /// Parse a document from JSON text, splitting off the `catalog` entry.
    pub fn from_json(text: &str, path: &str) -> Result<Self, StoreError> {
        let root: Value = serde_json::from_str(text).map_err(|source| StoreError::Parse {
            path: path.to_string(),
            source,
        })?;
        let Value::Object(entries) = root else {
            return Err(StoreError::NotAnObject {
                path: path.to_string(),
            });
        };

        let mut document = ConfigDocument::default();
        for (key, value) in entries {
            if key == CATALOG_KEY {
                let layout: CatalogLayout =
                    serde_json::from_value(value).map_err(|source| StoreError::InvalidEntry {
                        key,
                        source,
                    })?;
                document.catalog = Some(layout);
                continue;
            }
            let product: Product =
                serde_json::from_value(value).map_err(|source| StoreError::InvalidEntry {
                    key: key.clone(),
                    source,
                })?;
            document.products.insert(key, product);
        }

        Ok(document)
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: display.clone(),
            source,
        })?;
        Self::from_json(&text, &display)
    }

    /// Serialize with the canonical key ordering: sorted alias keys first,
    /// then all remaining keys sorted, `catalog` treated like any other
    /// non-alias key. 2-space indentation for stable diffs.
    pub fn to_json(&self, products: &ProductMap) -> Result<String, serde_json::Error> {
        let mut alias_keys: Vec<&String> = products
            .iter()
            .filter(|(_, p)| p.is_alias())
            .map(|(k, _)| k)
            .collect();
        alias_keys.sort();
        let mut other_keys: Vec<&str> = products
            .iter()
            .filter(|(_, p)| !p.is_alias())
            .map(|(k, _)| k.as_str())
            .collect();
        if self.catalog.is_some() {
            other_keys.push(CATALOG_KEY);
        }
        other_keys.sort();

        let mut root = serde_json::Map::new();
        for key in alias_keys {
            root.insert(key.clone(), serde_json::to_value(&products[key])?);
        }
        for key in other_keys {
            if key == CATALOG_KEY {
                if let Some(catalog) = &self.catalog {
                    root.insert(key.to_string(), serde_json::to_value(catalog)?);
                }
            } else {
                root.insert(key.to_string(), serde_json::to_value(&products[key])?);
            }
        }

        serde_json::to_string_pretty(&Value::Object(root))
    }

    /// Reconcile mockups and write the document. Returns the reconciliation
    /// warnings; the in-memory map is left as it was.
    pub fn save(&self, path: &Path) -> Result<Vec<Warning>, StoreError> {
        let display = path.display().to_string();
        let (reconciled, warnings) = reconcile_mockups(&self.products);
        let text = self
            .to_json(&reconciled)
            .map_err(|source| StoreError::InvalidEntry {
                key: CATALOG_KEY.to_string(),
                source,
            })?;
        fs::write(path, text + "\n").map_err(|source| StoreError::Write {
            path: display,
            source,
        })?;
        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::product::{Mockup, ProductType};

    const DOC: &str = r#"{
        "zshirt": { "type": "simple", "prefix": "ZS" },
        "catalog": { "type": "catalog", "name": "Spring", "pages": [] },
        "shared": { "type": "alias", "mockups": [] },
        "tshirt": { "name": "tshirt", "type": "parent", "prefix": "TS" }
    }"#;

    #[test]
    fn load_splits_catalog_from_products() {
        let doc = ConfigDocument::from_json(DOC, "test.json").unwrap();
        assert_eq!(doc.products.len(), 3);
        assert!(!doc.products.contains_key(CATALOG_KEY));
        assert_eq!(doc.catalog.as_ref().unwrap().name, "Spring");
        assert_eq!(doc.products["tshirt"].product_type, ProductType::Parent);
    }

    #[test]
    fn top_level_array_is_rejected() {
        let err = ConfigDocument::from_json("[]", "test.json").unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject { .. }));
    }

    #[test]
    fn save_orders_aliases_first_then_sorted_keys() {
        let doc = ConfigDocument::from_json(DOC, "test.json").unwrap();
        let text = doc.to_json(&doc.products).unwrap();
        let positions: Vec<usize> = ["\"shared\"", "\"catalog\"", "\"tshirt\"", "\"zshirt\""]
            .iter()
            .map(|k| text.find(k).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn save_round_trips_through_load() {
        let doc = ConfigDocument::from_json(DOC, "test.json").unwrap();
        let text = doc.to_json(&doc.products).unwrap();
        let again = ConfigDocument::from_json(&text, "test.json").unwrap();
        assert_eq!(again.catalog, doc.catalog);
        assert_eq!(again.products["tshirt"], doc.products["tshirt"]);
    }

    #[test]
    fn save_reconciles_mockups_to_alias() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut doc = ConfigDocument::from_json(DOC, "test.json").unwrap();
        let tshirt = doc.products.get_mut("tshirt").unwrap();
        tshirt.alias = Some("shared".to_string());
        tshirt.mockups = Some(vec![Mockup::new("C:/m/a", "a.jpg")]);

        let warnings = doc.save(&path).unwrap();
        assert!(warnings.is_empty());

        let saved = ConfigDocument::load(&path).unwrap();
        assert_eq!(saved.products["shared"].mockup_slice().len(), 1);
        assert!(saved.products["tshirt"].mockups.is_none());
    }
}
