//! Variant structure generator
//!
//! Builds a two-level variant tree from a primary type/value list and an
//! optional secondary type/value list. Used both by the CSV reconstructor
//! and directly by the `variants` command.

use serde_json::Value;

use crate::core::product::{VariantMap, VariantNode};

/// French labels for the predefined color values. Any value outside this
/// table labels as itself.
pub const COLOR_LABELS: &[(&str, &str)] = &[
    ("white", "blanc"),
    ("black", "noir"),
    ("red", "rouge"),
    ("blue", "bleu"),
    ("grey", "gris"),
    ("pink", "rose"),
];

/// Predefined size list, used by the CSV template example row.
pub const SIZE_VALUES: &[&str] = &["XS", "S", "M", "L", "XL"];

/// Localized label for a variant value: the color table when the attribute
/// is `color`, identity otherwise.
pub fn localized_label<'a>(variant_type: &str, value: &'a str) -> &'a str {
    if variant_type == "color" {
        if let Some((_, label)) = COLOR_LABELS.iter().find(|(v, _)| *v == value) {
            return label;
        }
    }
    value
}

/// Build a variant tree.
///
/// Each `val1` becomes a top-level node keyed by `val1` carrying
/// `type: "child"`, the structural field `{variant1_type: val1}` and its
/// `_FR` label. When both `variant2_type` and `variant2_values` are
/// non-empty, each node additionally gets one bare sub-node per `val2`.
///
/// Pure and deterministic. Duplicate input values collapse onto the same
/// map key (last one wins); deduplication of the value lists is the
/// caller's concern.
pub fn generate_variant_structure(
    variant1_type: &str,
    variant1_values: &[String],
    variant2_type: &str,
    variant2_values: &[String],
) -> VariantMap {
    let mut tree = VariantMap::new();

    for val1 in variant1_values {
        let mut node = VariantNode::default();
        node.fields
            .insert("type".to_string(), Value::String("child".to_string()));
        node.fields
            .insert(variant1_type.to_string(), Value::String(val1.clone()));
        node.fields.insert(
            format!("{}_FR", variant1_type),
            Value::String(localized_label(variant1_type, val1).to_string()),
        );

        if !variant2_type.is_empty() && !variant2_values.is_empty() {
            let subs = node.variant_mut();
            for val2 in variant2_values {
                let mut sub = VariantNode::default();
                sub.fields
                    .insert(variant2_type.to_string(), Value::String(val2.clone()));
                subs.insert(val2.clone(), sub);
            }
        }

        tree.insert(val1.clone(), node);
    }

    tree
}
