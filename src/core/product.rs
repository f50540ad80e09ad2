//! Product tree model
//!
//! A configuration document maps product keys to products. A product is one
//! of three kinds: an `alias` (a shared mockup profile), a `simple` product,
//! or a `parent` product owning a two-level variant tree. Beyond the handful
//! of typed fields, products carry an open-ended bag of operator-defined
//! fields (price, category, `amazon.*` sub-objects, ...) that the transforms
//! treat generically.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open-ended field bag. Backed by an order-preserving map so document
/// order survives a load/save cycle.
pub type FieldBag = serde_json::Map<String, Value>;

/// One level of a variant tree, keyed by the variant's identifying value
/// (e.g. a color code).
pub type VariantMap = IndexMap<String, VariantNode>;

/// The product map of a configuration document, keyed by product key.
/// The reserved `"catalog"` key is held separately (see `core::store`).
pub type ProductMap = IndexMap<String, Product>;

/// Product kind discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    /// Shared mockup profile referenced by other products via `alias`.
    Alias,
    /// Product without a variant tree.
    Simple,
    /// Product owning a variant tree.
    Parent,
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductType::Alias => write!(f, "alias"),
            ProductType::Simple => write!(f, "simple"),
            ProductType::Parent => write!(f, "parent"),
        }
    }
}

impl std::str::FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "alias" => Ok(ProductType::Alias),
            "simple" => Ok(ProductType::Simple),
            "parent" => Ok(ProductType::Parent),
            _ => Err(format!("Unknown product type: {}", s)),
        }
    }
}

/// One mockup image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mockup {
    /// Source path, possibly templated (e.g. `C:/mockups/{label}`).
    #[serde(default)]
    pub path: String,

    /// Output name template (e.g. `{label}.jpg`).
    #[serde(default)]
    pub name: String,
}

impl Mockup {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// One node of a variant tree.
///
/// The node's structural field (the field whose value equals the node's own
/// key), its `_FR` label, its `type: "child"` marker and any data fields all
/// live in the flattened `fields` bag; only the nested second level is typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantNode {
    /// Second-level variant map. Absent on sub-variant nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<VariantMap>,

    #[serde(flatten)]
    pub fields: FieldBag,
}

impl VariantNode {
    /// String value of a field, if present and a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Sub-variant map, creating it when absent.
    pub fn variant_mut(&mut self) -> &mut VariantMap {
        self.variant.get_or_insert_with(VariantMap::new)
    }
}

/// A single product entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Display name. Usually equals the map key but may differ; alias
    /// entries in existing documents sometimes omit it.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(rename = "type")]
    pub product_type: ProductType,

    /// SKU prefix. Expected on `simple` and `parent` products.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Key of the alias product whose mockups this product uses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Mockups owned directly by this product. Migrated to the referenced
    /// alias at save time (see `transform::reconcile`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mockups: Option<Vec<Mockup>>,

    /// Variant tree. Only meaningful when `product_type == Parent`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<VariantMap>,

    /// Everything else: scalars and nested objects alike.
    #[serde(flatten)]
    pub extra: FieldBag,
}

impl Product {
    pub fn new(name: impl Into<String>, product_type: ProductType) -> Self {
        Self {
            name: name.into(),
            product_type,
            prefix: None,
            alias: None,
            mockups: None,
            variant: None,
            extra: FieldBag::new(),
        }
    }

    pub fn is_alias(&self) -> bool {
        self.product_type == ProductType::Alias
    }

    /// Alias reference, filtering out empty strings.
    pub fn alias_ref(&self) -> Option<&str> {
        self.alias.as_deref().filter(|a| !a.is_empty())
    }

    /// Mockups slice, treating an absent array as empty.
    pub fn mockup_slice(&self) -> &[Mockup] {
        self.mockups.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_type_round_trips_through_strings() {
        for (s, t) in [
            ("alias", ProductType::Alias),
            ("simple", ProductType::Simple),
            ("parent", ProductType::Parent),
        ] {
            assert_eq!(s.parse::<ProductType>().unwrap(), t);
            assert_eq!(t.to_string(), s);
        }
        assert!("catalog".parse::<ProductType>().is_err());
    }

    #[test]
    fn extra_fields_survive_serde() {
        let json = serde_json::json!({
            "name": "tshirt1",
            "type": "simple",
            "prefix": "TS",
            "price": 19.9,
            "amazon": { "Title_FR": "T-shirt" }
        });
        let product: Product = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(product.prefix.as_deref(), Some("TS"));
        assert_eq!(product.extra["price"], serde_json::json!(19.9));
        assert_eq!(serde_json::to_value(&product).unwrap(), json);
    }

    #[test]
    fn variant_nodes_keep_field_order() {
        let json = serde_json::json!({
            "type": "child",
            "color": "pink",
            "color_FR": "rose",
            "price": 12
        });
        let node: VariantNode = serde_json::from_value(json).unwrap();
        let keys: Vec<&str> = node.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, ["type", "color", "color_FR", "price"]);
        assert_eq!(node.str_field("color"), Some("pink"));
    }
}
