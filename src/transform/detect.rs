//! Structural field detector
//!
//! Inspects an existing variant tree and decides, per nesting level, which
//! field names the variant (the "structural" field: its value equals the
//! node's own key) and which fields are plain data. `type`, `variant` and
//! `_FR`-suffixed label fields are always structural.
//!
//! Detection scans every node at a level and votes: candidates are kept in
//! discovery order and the first non-`_FR` candidate wins. A sibling that
//! carries no self-equal field yields a warning instead of changing the
//! vote.

use indexmap::IndexMap;

use crate::core::product::{VariantMap, VariantNode};
use crate::transform::Warning;

/// Detected structure of one nesting level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelStructure {
    /// The structural field name (e.g. `color`).
    pub field: String,
    /// `_FR` label fields attached to the structural field.
    pub localized: Vec<String>,
    /// Distinct structural values across the level, in discovery order.
    pub values: Vec<String>,
}

/// Detected structure of a whole variant tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantStructure {
    pub level1: Option<LevelStructure>,
    pub level2: Option<LevelStructure>,
}

impl VariantStructure {
    /// Whether a variant-node field is structural (identifies the variant)
    /// rather than data attached to it.
    pub fn is_structural(&self, field: &str) -> bool {
        if field == "type" || field == "variant" || field.ends_with("_FR") {
            return true;
        }
        self.level1.as_ref().is_some_and(|l| l.field == field)
            || self.level2.as_ref().is_some_and(|l| l.field == field)
    }
}

/// Candidate table for one level: field name → distinct values, plus the
/// `_FR` fields seen and the node keys with no self-equal field.
#[derive(Default)]
struct LevelScan {
    candidates: IndexMap<String, Vec<String>>,
    localized: Vec<(String, String)>,
    unmatched: Vec<String>,
}

impl LevelScan {
    fn visit(&mut self, key: &str, node: &VariantNode) {
        let mut matched = false;
        for (field, value) in &node.fields {
            if field == "type" {
                continue;
            }
            if value.as_str() == Some(key) {
                let values = self.candidates.entry(field.clone()).or_default();
                if !values.iter().any(|v| v == key) {
                    values.push(key.to_string());
                }
                if !field.ends_with("_FR") {
                    matched = true;
                }
            }
            if let Some(base) = field.strip_suffix("_FR") {
                if node.str_field(base) == Some(key)
                    && !self.localized.iter().any(|(f, _)| f == field)
                {
                    self.localized.push((field.clone(), base.to_string()));
                }
            }
        }
        if !matched {
            self.unmatched.push(key.to_string());
        }
    }

    fn resolve(self, level: &str, warnings: &mut Vec<Warning>) -> Option<LevelStructure> {
        let field = self
            .candidates
            .keys()
            .find(|f| !f.ends_with("_FR"))?
            .clone();
        for key in &self.unmatched {
            warnings.push(Warning::new(
                "detect",
                key.clone(),
                format!(
                    "{} node has no field equal to its own key; keeping '{}' from its siblings",
                    level, field
                ),
            ));
        }
        let localized = self
            .localized
            .into_iter()
            .filter(|(_, base)| *base == field)
            .map(|(f, _)| f)
            .collect();
        let values = self.candidates[&field].clone();
        Some(LevelStructure {
            field,
            localized,
            values,
        })
    }
}

/// Detect the structural fields of a variant tree. Read-only; the tree is
/// never mutated.
pub fn detect_structure(variant: &VariantMap) -> (VariantStructure, Vec<Warning>) {
    let mut warnings = Vec::new();

    let mut level1 = LevelScan::default();
    for (key, node) in variant {
        level1.visit(key, node);
    }

    let mut level2 = LevelScan::default();
    let mut has_level2 = false;
    for node in variant.values() {
        if let Some(subs) = &node.variant {
            for (key, sub) in subs {
                has_level2 = true;
                level2.visit(key, sub);
            }
        }
    }

    let structure = VariantStructure {
        level1: level1.resolve("level-1", &mut warnings),
        level2: if has_level2 {
            level2.resolve("level-2", &mut warnings)
        } else {
            None
        },
    };
    (structure, warnings)
}
