//! Flattener: nested product → flat CSV row(s)
//!
//! A product flattens to one parent row: scalars verbatim, nested plain
//! objects dot-joined (`amazon.Title_FR`), the mockups array as
//! `mockups_path_<i>`/`mockups_name_<i>` pairs, and the variant tree as
//! `variant1Type/Values`, `variant2Type/Values` summary columns plus
//! `variant_<field>` columns for data fields shared across nodes.
//!
//! The summary columns are lossy by design: per-node differences travel as
//! additional child override rows (empty `name`/`type`, selector columns
//! naming the target node, only the differing fields filled in).

use indexmap::IndexMap;
use serde_json::Value;

use crate::core::product::{FieldBag, Product, ProductType};
use crate::transform::detect::{detect_structure, VariantStructure};
use crate::transform::Warning;

/// One flat CSV row: column name → rendered value, insertion-ordered.
pub type FlatRow = IndexMap<String, String>;

/// Selector columns a child override row uses to target a node. These are
/// never applied as field overrides on import.
pub const SELECTOR_COLUMNS: &[&str] = &[
    "variant1Type",
    "variant1Values",
    "variant2Type",
    "variant2Values",
];

/// Render a JSON value as a CSV cell: booleans as `true`/`false`, arrays
/// comma-joined, null as empty.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(","),
        // Nested objects are dot-flattened before rendering; anything left
        // over serializes as raw JSON rather than being dropped.
        Value::Object(_) => value.to_string(),
    }
}

fn flatten_bag(prefix: &str, bag: &FieldBag, row: &mut FlatRow) {
    for (key, value) in bag {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(nested) => flatten_bag(&path, nested, row),
            other => {
                row.insert(path, render_value(other));
            }
        }
    }
}

fn flatten_parent_row(product: &Product, structure: Option<&VariantStructure>) -> FlatRow {
    let mut row = FlatRow::new();
    row.insert("name".to_string(), product.name.clone());
    row.insert("type".to_string(), product.product_type.to_string());
    if let Some(prefix) = &product.prefix {
        row.insert("prefix".to_string(), prefix.clone());
    }
    if let Some(alias) = &product.alias {
        row.insert("alias".to_string(), alias.clone());
    }

    flatten_bag("", &product.extra, &mut row);

    for (i, mockup) in product.mockup_slice().iter().enumerate() {
        row.insert(format!("mockups_path_{}", i), mockup.path.clone());
        row.insert(format!("mockups_name_{}", i), mockup.name.clone());
    }

    if let (Some(variant), Some(structure)) = (&product.variant, structure) {
        if let Some(level1) = &structure.level1 {
            row.insert("variant1Type".to_string(), level1.field.clone());
            row.insert("variant1Values".to_string(), level1.values.join(","));
        }
        if let Some(level2) = &structure.level2 {
            row.insert("variant2Type".to_string(), level2.field.clone());
            row.insert("variant2Values".to_string(), level2.values.join(","));
        }
        // Shared data fields across level-1 nodes; last node wins. Per-node
        // differences are emitted as child rows instead.
        for node in variant.values() {
            for (field, value) in &node.fields {
                if field == "type" || structure.is_structural(field) {
                    continue;
                }
                row.insert(format!("variant_{}", field), render_value(value));
            }
        }
    }

    row
}

/// Flatten a product into its single parent row.
pub fn flatten_product(product: &Product) -> (FlatRow, Vec<Warning>) {
    let mut warnings = Vec::new();
    let structure = match (&product.variant, product.product_type) {
        (Some(variant), ProductType::Parent) => {
            let (structure, detect_warnings) = detect_structure(variant);
            warnings.extend(detect_warnings);
            Some(structure)
        }
        _ => None,
    };
    (flatten_parent_row(product, structure.as_ref()), warnings)
}

/// Copy a row, blanking every column that is neither a selector column nor
/// one of the kept override columns.
fn blank_except(parent: &FlatRow, keep: &IndexMap<String, String>) -> FlatRow {
    let mut child = parent.clone();
    for (key, value) in child.iter_mut() {
        if keep.contains_key(key) || SELECTOR_COLUMNS.contains(&key.as_str()) {
            continue;
        }
        value.clear();
    }
    for (key, value) in keep {
        child.insert(key.clone(), value.clone());
    }
    child
}

/// Flatten a product into its parent row plus one child override row per
/// variant node (level 1 and 2) that carries data the summary columns do
/// not already capture.
pub fn flatten_product_rows(product: &Product) -> (Vec<FlatRow>, Vec<Warning>) {
    let (parent, mut warnings) = flatten_product(product);
    let mut rows = vec![parent.clone()];

    let (Some(variant), ProductType::Parent) = (&product.variant, product.product_type) else {
        return (rows, warnings);
    };
    let (structure, _) = detect_structure(variant);
    let Some(level1) = &structure.level1 else {
        if !variant.is_empty() {
            warnings.push(Warning::new(
                "flatten",
                product.name.clone(),
                "variant tree has no structural field; per-node overrides not exported",
            ));
        }
        return (rows, warnings);
    };

    for (key, node) in variant {
        let node_value = node.str_field(&level1.field).unwrap_or(key).to_string();

        let mut specific = IndexMap::new();
        for (field, value) in &node.fields {
            if field == "type" || structure.is_structural(field) {
                continue;
            }
            let rendered = render_value(value);
            if rendered.is_empty() {
                continue;
            }
            // The variant_<field> summary column is the imported default, so
            // a node matching it needs no override row.
            let summary = parent.get(&format!("variant_{}", field));
            if summary.map(|s| s.as_str()) == Some(rendered.as_str()) {
                continue;
            }
            specific.insert(field.clone(), rendered);
        }
        if !specific.is_empty() {
            let mut child = blank_except(&parent, &specific);
            child.insert("variant1Values".to_string(), node_value.clone());
            if child.contains_key("variant2Values") {
                child.insert("variant2Values".to_string(), String::new());
            }
            rows.push(child);
        }

        let (Some(subs), Some(level2)) = (&node.variant, &structure.level2) else {
            continue;
        };
        for (sub_key, sub) in subs {
            let mut sub_specific = IndexMap::new();
            for (field, value) in &sub.fields {
                if field == "type" || structure.is_structural(field) {
                    continue;
                }
                let rendered = render_value(value);
                if rendered.is_empty() {
                    continue;
                }
                let from_product =
                    product.extra.get(field).map(render_value).as_deref()
                        == Some(rendered.as_str());
                let from_node = node.fields.get(field).map(render_value).as_deref()
                    == Some(rendered.as_str());
                if from_product || from_node {
                    continue;
                }
                sub_specific.insert(field.clone(), rendered);
            }
            if !sub_specific.is_empty() {
                let mut child = blank_except(&parent, &sub_specific);
                child.insert("variant1Values".to_string(), node_value.clone());
                child.insert(
                    "variant2Values".to_string(),
                    sub.str_field(&level2.field).unwrap_or(sub_key).to_string(),
                );
                rows.push(child);
            }
        }
    }

    (rows, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::product::Mockup;
    use crate::transform::generate::generate_variant_structure;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn simple_product() -> Product {
        let mut product = Product::new("tshirt1", ProductType::Simple);
        product.prefix = Some("TS".to_string());
        product
            .extra
            .insert("price".to_string(), serde_json::json!(19.9));
        product.extra.insert(
            "amazon".to_string(),
            serde_json::json!({ "Title_FR": "T-shirt", "DesCourtes": "Coton bio" }),
        );
        product.extra.insert(
            "available".to_string(),
            serde_json::json!(true),
        );
        product.mockups = Some(vec![
            Mockup::new("C:/mockups/front", "{label}.jpg"),
            Mockup::new("C:/mockups/back", "{label}_back.jpg"),
        ]);
        product
    }

    #[test]
    fn flattens_scalars_nested_objects_and_mockups() {
        let (row, warnings) = flatten_product(&simple_product());
        assert!(warnings.is_empty());
        assert_eq!(row["name"], "tshirt1");
        assert_eq!(row["type"], "simple");
        assert_eq!(row["prefix"], "TS");
        assert_eq!(row["price"], "19.9");
        assert_eq!(row["available"], "true");
        assert_eq!(row["amazon.Title_FR"], "T-shirt");
        assert_eq!(row["amazon.DesCourtes"], "Coton bio");
        assert_eq!(row["mockups_path_0"], "C:/mockups/front");
        assert_eq!(row["mockups_name_1"], "{label}_back.jpg");
        assert!(!row.contains_key("mockups"));
        assert!(!row.contains_key("amazon"));
    }

    #[test]
    fn parent_product_emits_variant_summary_columns() {
        let mut product = Product::new("hoodie", ProductType::Parent);
        product.prefix = Some("HD".to_string());
        product.variant = Some(generate_variant_structure(
            "color",
            &strings(&["white", "black"]),
            "size",
            &strings(&["S", "M"]),
        ));

        let (row, _) = flatten_product(&product);
        assert_eq!(row["variant1Type"], "color");
        assert_eq!(row["variant1Values"], "white,black");
        assert_eq!(row["variant2Type"], "size");
        assert_eq!(row["variant2Values"], "S,M");
        assert!(!row.contains_key("variant"));
    }

    #[test]
    fn shared_variant_data_becomes_variant_columns() {
        let mut product = Product::new("hoodie", ProductType::Parent);
        let mut tree =
            generate_variant_structure("color", &strings(&["white", "black"]), "", &[]);
        for node in tree.values_mut() {
            node.fields
                .insert("price".to_string(), serde_json::json!(10));
        }
        product.variant = Some(tree);

        let (rows, _) = flatten_product_rows(&product);
        // Uniform data: summary column only, no child rows.
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["variant_price"], "10");
    }

    #[test]
    fn per_node_override_becomes_child_row() {
        let mut product = Product::new("hoodie", ProductType::Parent);
        product.prefix = Some("HD".to_string());
        let mut tree = generate_variant_structure(
            "color",
            &strings(&["white", "black"]),
            "size",
            &strings(&["S", "M"]),
        );
        for node in tree.values_mut() {
            node.fields
                .insert("price".to_string(), serde_json::json!(10));
        }
        tree.get_mut("white")
            .unwrap()
            .fields
            .insert("price".to_string(), serde_json::json!(12));
        product.variant = Some(tree);

        let (rows, _) = flatten_product_rows(&product);
        // Last write across nodes sets the summary; only white deviates.
        assert_eq!(rows[0]["variant_price"], "10");
        assert_eq!(rows.len(), 2);
        let child = &rows[1];
        // Child rows have empty name/type so the import grouping rule holds.
        assert_eq!(child["name"], "");
        assert_eq!(child["type"], "");
        assert_eq!(child["prefix"], "");
        assert_eq!(child["variant1Values"], "white");
        assert_eq!(child["variant2Values"], "");
        assert_eq!(child["price"], "12");
    }

    #[test]
    fn level_two_override_targets_both_selectors() {
        let mut product = Product::new("hoodie", ProductType::Parent);
        let mut tree = generate_variant_structure(
            "color",
            &strings(&["white"]),
            "size",
            &strings(&["S", "M"]),
        );
        tree.get_mut("white")
            .unwrap()
            .variant_mut()
            .get_mut("M")
            .unwrap()
            .fields
            .insert("sku".to_string(), serde_json::json!("HD-W-M"));
        product.variant = Some(tree);

        let (rows, _) = flatten_product_rows(&product);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["variant1Values"], "white");
        assert_eq!(rows[1]["variant2Values"], "M");
        assert_eq!(rows[1]["sku"], "HD-W-M");
    }
}
