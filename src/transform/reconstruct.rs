//! Reconstructor: flat CSV rows → nested products
//!
//! Inverse of `transform::flatten`. Rows are first grouped into a parent
//! row plus its trailing child override rows (a parent row is any row with
//! both `name` and `type` non-empty), then each group rebuilds one product:
//! dotted columns unflatten into nested objects, `mockups_path_<i>` pairs
//! rebuild the mockups array, the variant summary columns regenerate the
//! tree, and child rows write their differing fields onto the targeted
//! nodes.

use serde_json::Value;

use crate::core::product::{
    FieldBag, Mockup, Product, ProductMap, ProductType, VariantNode,
};
use crate::transform::flatten::{FlatRow, SELECTOR_COLUMNS};
use crate::transform::generate::{generate_variant_structure, localized_label};
use crate::transform::Warning;

/// A parent row and the child override rows that follow it in the CSV.
#[derive(Debug, Clone)]
pub struct RowGroup {
    pub parent: FlatRow,
    pub children: Vec<FlatRow>,
}

fn cell<'a>(row: &'a FlatRow, key: &str) -> &'a str {
    row.get(key).map(String::as_str).unwrap_or("").trim()
}

fn is_parent_row(row: &FlatRow) -> bool {
    !cell(row, "name").is_empty() && !cell(row, "type").is_empty()
}

/// Group CSV rows into parent/children clusters. Child rows appearing
/// before any parent row have nothing to attach to and are dropped with a
/// warning.
pub fn group_rows(rows: Vec<FlatRow>) -> (Vec<RowGroup>, Vec<Warning>) {
    let mut groups: Vec<RowGroup> = Vec::new();
    let mut warnings = Vec::new();

    for (index, row) in rows.into_iter().enumerate() {
        if is_parent_row(&row) {
            groups.push(RowGroup {
                parent: row,
                children: Vec::new(),
            });
        } else if let Some(group) = groups.last_mut() {
            group.children.push(row);
        } else {
            warnings.push(Warning::new(
                "import",
                format!("row {}", index + 2),
                "child row before any parent row; skipped",
            ));
        }
    }

    (groups, warnings)
}

/// Coerce a CSV cell back into a JSON scalar: `true`/`false` to booleans,
/// numeric-looking text to numbers, everything else kept as a string.
pub fn coerce_scalar(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(raw.to_string())
}

fn insert_path(bag: &mut FieldBag, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            bag.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = bag
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(FieldBag::new()));
            if !entry.is_object() {
                *entry = Value::Object(FieldBag::new());
            }
            if let Value::Object(nested) = entry {
                insert_path(nested, rest, value);
            }
        }
    }
}

fn split_values(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collect `mockups_path_<i>`/`mockups_name_<i>` pairs, ascending from 0,
/// stopping at the first index where neither column carries a value.
fn collect_mockups(row: &FlatRow) -> Vec<Mockup> {
    let mut mockups = Vec::new();
    for i in 0.. {
        let path = cell(row, &format!("mockups_path_{}", i));
        let name = cell(row, &format!("mockups_name_{}", i));
        if path.is_empty() && name.is_empty() {
            break;
        }
        mockups.push(Mockup::new(path, name));
    }
    mockups
}

fn is_transport_column(key: &str) -> bool {
    key == "name"
        || key == "type"
        || key == "prefix"
        || key == "alias"
        || key.starts_with("mockups_path_")
        || key.starts_with("mockups_name_")
        || key.starts_with("variant_")
        || SELECTOR_COLUMNS.contains(&key)
}

fn reconstruct_parent(row: &FlatRow, warnings: &mut Vec<Warning>) -> Option<Product> {
    let name = cell(row, "name");
    let product_type = match cell(row, "type").parse::<ProductType>() {
        Ok(t) => t,
        Err(message) => {
            warnings.push(Warning::new("import", name.to_string(), message));
            return None;
        }
    };

    let mut product = Product::new(name, product_type);
    let prefix = cell(row, "prefix");
    if !prefix.is_empty() {
        product.prefix = Some(prefix.to_string());
    }
    let alias = cell(row, "alias");
    if !alias.is_empty() {
        product.alias = Some(alias.to_string());
    }

    for (key, value) in row {
        if is_transport_column(key) || value.trim().is_empty() {
            continue;
        }
        insert_path(&mut product.extra, key, coerce_scalar(value.trim()));
    }

    let mockups = collect_mockups(row);
    if !mockups.is_empty() {
        product.mockups = Some(mockups);
    }

    if product_type == ProductType::Parent {
        let v1_type = cell(row, "variant1Type");
        let v1_values = split_values(cell(row, "variant1Values"));
        let v2_type = cell(row, "variant2Type");
        let v2_values = split_values(cell(row, "variant2Values"));

        let mut tree = if !v1_type.is_empty() && !v1_values.is_empty() {
            generate_variant_structure(v1_type, &v1_values, v2_type, &v2_values)
        } else {
            if !v1_type.is_empty() || !v1_values.is_empty() {
                warnings.push(Warning::new(
                    "import",
                    name.to_string(),
                    "variant1Type and variant1Values must both be set; variant tree left empty",
                ));
            }
            Default::default()
        };

        // variant_<field> columns fill every top-level node, but only where
        // the node does not already carry the field.
        for (key, value) in row {
            let Some(field) = key.strip_prefix("variant_") else {
                continue;
            };
            if value.trim().is_empty() {
                continue;
            }
            let coerced = coerce_scalar(value.trim());
            for node in tree.values_mut() {
                if !node.fields.contains_key(field) {
                    node.fields.insert(field.to_string(), coerced.clone());
                }
            }
        }

        product.variant = Some(tree);
    }

    Some(product)
}

fn new_child_node(structural_field: &str, value: &str) -> VariantNode {
    let mut node = VariantNode::default();
    node.fields
        .insert("type".to_string(), Value::String("child".to_string()));
    if !structural_field.is_empty() {
        node.fields.insert(
            structural_field.to_string(),
            Value::String(value.to_string()),
        );
        node.fields.insert(
            format!("{}_FR", structural_field),
            Value::String(localized_label(structural_field, value).to_string()),
        );
    }
    node
}

fn apply_child_row(product: &mut Product, row: &FlatRow, warnings: &mut Vec<Warning>) {
    let v1_value = cell(row, "variant1Values").to_string();
    if v1_value.is_empty() {
        warnings.push(Warning::new(
            "import",
            product.name.clone(),
            "child row without variant1Values; skipped",
        ));
        return;
    }
    if product.product_type != ProductType::Parent {
        warnings.push(Warning::new(
            "import",
            product.name.clone(),
            "child row under a non-parent product; skipped",
        ));
        return;
    }

    let v1_type = cell(row, "variant1Type").to_string();
    let v2_value = cell(row, "variant2Values").to_string();
    let v2_type = cell(row, "variant2Type").to_string();

    let tree = product.variant.get_or_insert_with(Default::default);
    let node = tree
        .entry(v1_value.clone())
        .or_insert_with(|| new_child_node(&v1_type, &v1_value));

    let target = if v2_value.is_empty() {
        node
    } else {
        node.variant_mut()
            .entry(v2_value.clone())
            .or_insert_with(|| {
                let mut sub = VariantNode::default();
                if !v2_type.is_empty() {
                    sub.fields
                        .insert(v2_type.clone(), Value::String(v2_value.clone()));
                }
                sub
            })
    };

    for (key, value) in row {
        let value = value.trim();
        if value.is_empty()
            || key == "name"
            || key == "type"
            || key.starts_with("mockups_path_")
            || key.starts_with("mockups_name_")
            || SELECTOR_COLUMNS.contains(&key.as_str())
        {
            continue;
        }
        // Overrides always win over generated or inherited values.
        target.fields.insert(key.clone(), coerce_scalar(value));
    }
}

/// Rebuild a product map from grouped rows. Rows with an empty name are
/// unusable; a later row reusing an existing key is skipped so the first
/// definition wins.
pub fn reconstruct_map(groups: Vec<RowGroup>) -> (ProductMap, Vec<Warning>) {
    let mut products = ProductMap::new();
    let mut warnings = Vec::new();

    for group in groups {
        let Some(mut product) = reconstruct_parent(&group.parent, &mut warnings) else {
            continue;
        };
        if products.contains_key(&product.name) {
            warnings.push(Warning::new(
                "import",
                product.name.clone(),
                "duplicate product name; later row skipped",
            ));
            continue;
        }
        for child in &group.children {
            apply_child_row(&mut product, child, &mut warnings);
        }
        let key = product.name.clone();
        products.insert(key, product);
    }

    (products, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> FlatRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn groups_children_under_preceding_parent() {
        let rows = vec![
            row(&[("name", ""), ("type", ""), ("price", "1")]),
            row(&[("name", "a"), ("type", "simple")]),
            row(&[("name", ""), ("type", ""), ("price", "2")]),
            row(&[("name", "b"), ("type", "simple")]),
        ];
        let (groups, warnings) = group_rows(rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].children.len(), 1);
        assert!(groups[1].children.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("before any parent"));
    }

    #[test]
    fn coerces_boolean_and_numeric_cells() {
        assert_eq!(coerce_scalar("true"), Value::Bool(true));
        assert_eq!(coerce_scalar("42"), serde_json::json!(42));
        assert_eq!(coerce_scalar("19.9"), serde_json::json!(19.9));
        assert_eq!(coerce_scalar("EX"), serde_json::json!("EX"));
        assert_eq!(coerce_scalar("S,M"), serde_json::json!("S,M"));
    }

    #[test]
    fn rebuilds_nested_fields_and_mockups() {
        let rows = vec![row(&[
            ("name", "tshirt1"),
            ("type", "simple"),
            ("prefix", "TS"),
            ("price", "19.9"),
            ("amazon.Title_FR", "T-shirt"),
            ("mockups_path_0", "C:/m/front"),
            ("mockups_name_0", "{label}.jpg"),
            ("mockups_path_1", ""),
            ("mockups_name_1", ""),
            ("mockups_path_2", "C:/m/orphan"),
            ("empty_col", ""),
        ])];
        let (groups, _) = group_rows(rows);
        let (products, warnings) = reconstruct_map(groups);
        assert!(warnings.is_empty());

        let product = &products["tshirt1"];
        assert_eq!(product.prefix.as_deref(), Some("TS"));
        assert_eq!(product.extra["price"], serde_json::json!(19.9));
        assert_eq!(
            product.extra["amazon"],
            serde_json::json!({ "Title_FR": "T-shirt" })
        );
        // Collection stops at the first fully empty index.
        assert_eq!(product.mockup_slice().len(), 1);
        assert!(!product.extra.contains_key("empty_col"));
        assert!(!product.extra.contains_key("mockups_path_2"));
    }

    #[test]
    fn regenerates_variant_tree_with_defaults_and_overrides() {
        let rows = vec![
            row(&[
                ("name", "hoodie"),
                ("type", "parent"),
                ("variant1Type", "color"),
                ("variant1Values", "white, black"),
                ("variant2Type", "size"),
                ("variant2Values", "S,M"),
                ("variant_price", "10"),
            ]),
            row(&[
                ("name", ""),
                ("type", ""),
                ("variant1Type", "color"),
                ("variant1Values", "white"),
                ("variant2Values", ""),
                ("price", "12"),
            ]),
            row(&[
                ("name", ""),
                ("type", ""),
                ("variant1Values", "white"),
                ("variant2Values", "M"),
                ("sku", "HD-W-M"),
            ]),
        ];
        let (groups, _) = group_rows(rows);
        let (products, warnings) = reconstruct_map(groups);
        assert!(warnings.is_empty());

        let tree = products["hoodie"].variant.as_ref().unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree["black"].fields["price"], serde_json::json!(10));
        // The child row override wins over the variant_ default.
        assert_eq!(tree["white"].fields["price"], serde_json::json!(12));
        assert_eq!(tree["white"].str_field("color_FR"), Some("blanc"));
        let subs = tree["white"].variant.as_ref().unwrap();
        assert_eq!(subs["M"].str_field("sku"), Some("HD-W-M"));
        assert_eq!(subs["S"].str_field("size"), Some("S"));
    }

    #[test]
    fn reconstruction_inverts_flattening_for_simple_products() {
        use crate::transform::flatten::flatten_product_rows;

        let mut product = Product::new("tshirt1", ProductType::Simple);
        product.prefix = Some("TS".to_string());
        product.alias = Some("shared_mockups".to_string());
        product
            .extra
            .insert("price".to_string(), serde_json::json!(19.9));
        product
            .extra
            .insert("available".to_string(), serde_json::json!(true));
        product.extra.insert(
            "amazon".to_string(),
            serde_json::json!({ "Title_FR": "T-shirt" }),
        );
        product.mockups = Some(vec![Mockup::new("C:/m/front", "{label}.jpg")]);

        let (rows, _) = flatten_product_rows(&product);
        let (groups, _) = group_rows(rows);
        let (products, warnings) = reconstruct_map(groups);
        assert!(warnings.is_empty());
        assert_eq!(products["tshirt1"], product);
    }

    #[test]
    fn reconstruction_inverts_flattening_for_uniform_parent_data() {
        use crate::transform::flatten::flatten_product_rows;
        use crate::transform::generate::generate_variant_structure;

        let mut product = Product::new("hoodie", ProductType::Parent);
        product.prefix = Some("HD".to_string());
        let values = vec!["white".to_string(), "black".to_string()];
        let mut tree = generate_variant_structure("color", &values, "", &[]);
        for node in tree.values_mut() {
            node.fields
                .insert("price".to_string(), serde_json::json!(25));
        }
        product.variant = Some(tree);

        let (rows, _) = flatten_product_rows(&product);
        assert_eq!(rows.len(), 1);
        let (groups, _) = group_rows(rows);
        let (products, warnings) = reconstruct_map(groups);
        assert!(warnings.is_empty());
        assert_eq!(products["hoodie"], product);
    }

    #[test]
    fn parent_without_variant_columns_gets_empty_tree() {
        let rows = vec![row(&[("name", "p"), ("type", "parent")])];
        let (groups, _) = group_rows(rows);
        let (products, warnings) = reconstruct_map(groups);
        assert!(warnings.is_empty());
        assert_eq!(products["p"].variant, Some(Default::default()));
    }

    #[test]
    fn duplicate_and_invalid_rows_are_skipped_with_warnings() {
        let rows = vec![
            row(&[("name", "a"), ("type", "simple"), ("price", "1")]),
            row(&[("name", "a"), ("type", "simple"), ("price", "2")]),
            row(&[("name", "b"), ("type", "catalogish")]),
        ];
        let (groups, _) = group_rows(rows);
        let (products, warnings) = reconstruct_map(groups);
        assert_eq!(products.len(), 1);
        assert_eq!(products["a"].extra["price"], serde_json::json!(1));
        assert_eq!(warnings.len(), 2);
    }
}
