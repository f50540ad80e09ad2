//! Catalog layout model
//!
//! The printed-PDF catalog lives in the configuration document under the
//! reserved `"catalog"` key: pages of positioned product placements plus a
//! handful of layout metadata fields.

use serde::{Deserialize, Serialize};

use crate::core::product::FieldBag;

/// Reserved product-map key holding the catalog layout.
pub const CATALOG_KEY: &str = "catalog";

fn layout_type() -> String {
    "catalog".to_string()
}

/// The catalog layout entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogLayout {
    #[serde(rename = "type", default = "layout_type")]
    pub layout_type: String,

    /// Output filename template (e.g. `catalog_{label}.pdf`).
    #[serde(default)]
    pub name: String,

    /// Output folder.
    #[serde(default)]
    pub dossier: String,

    #[serde(default)]
    pub pdf_template: String,

    #[serde(default)]
    pub color_offset_x: f64,
    #[serde(default)]
    pub color_offset_y: f64,

    #[serde(default)]
    pub qrcode_width: f64,
    #[serde(default)]
    pub qrcode_height: f64,

    #[serde(default)]
    pub pages: Vec<Page>,

    #[serde(flatten)]
    pub extra: FieldBag,
}

impl Default for CatalogLayout {
    fn default() -> Self {
        Self {
            layout_type: layout_type(),
            name: String::new(),
            dossier: String::new(),
            pdf_template: String::new(),
            color_offset_x: 0.0,
            color_offset_y: 0.0,
            qrcode_width: 0.0,
            qrcode_height: 0.0,
            pages: Vec::new(),
            extra: FieldBag::new(),
        }
    }
}

/// One catalog page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(rename = "_comment", default, skip_serializing_if = "String::is_empty")]
    pub comment: String,

    #[serde(default)]
    pub products: Vec<Placement>,
}

/// A positioned product placement on a page.
///
/// A placement may reference one of its product's variants either actively
/// (`variant`) or soft-deleted (`_variant`, value prefixed with `_`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(default)]
    pub product: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,

    #[serde(rename = "_variant", default, skip_serializing_if = "Option::is_none")]
    pub disabled_variant: Option<String>,

    pub x: f64,
    pub y: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture_catalog: Option<String>,

    /// Arbitrary extra fields, including paired `<base>_x`/`<base>_y`
    /// offsets.
    #[serde(flatten)]
    pub extra: FieldBag,
}

/// A placement's variant reference, with the soft-delete marker resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantRef {
    Active(String),
    /// Commented out in the layout; the stored value's leading underscores
    /// are stripped.
    Disabled(String),
}

impl VariantRef {
    pub fn key(&self) -> &str {
        match self {
            VariantRef::Active(k) | VariantRef::Disabled(k) => k,
        }
    }
}

impl Placement {
    /// The variant reference, preferring `variant` over `_variant` when both
    /// are present.
    pub fn variant_ref(&self) -> Option<VariantRef> {
        if let Some(v) = self.variant.as_deref().filter(|v| !v.is_empty()) {
            return Some(VariantRef::Active(v.to_string()));
        }
        self.disabled_variant
            .as_deref()
            .map(|v| v.trim_start_matches('_'))
            .filter(|v| !v.is_empty())
            .map(|v| VariantRef::Disabled(v.to_string()))
    }

    /// Paired `<base>_x`/`<base>_y` offset fields found in the extra bag,
    /// in document order of the `_x` half.
    pub fn paired_offsets(&self) -> Vec<(String, f64, f64)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.extra {
            let Some(base) = key.strip_suffix("_x") else {
                continue;
            };
            if base.is_empty() || key.starts_with('_') {
                continue;
            }
            let y_key = format!("{}_y", base);
            let (Some(x), Some(y)) = (
                value.as_f64(),
                self.extra.get(&y_key).and_then(|v| v.as_f64()),
            ) else {
                continue;
            };
            pairs.push((base.to_string(), x, y));
        }
        pairs
    }
}
