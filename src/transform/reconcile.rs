//! Save-time mockup reconciliation
//!
//! A product that references an alias does not own mockups in the saved
//! document; they live on the alias. Before a save, every aliased product's
//! directly-held mockups move onto the referenced alias (deduplicated by
//! exact path and name) and the source product's array clears. Running the
//! pass twice changes nothing.

use crate::core::product::ProductMap;
use crate::transform::Warning;

/// Move directly-held mockups from aliased products onto their alias.
/// Returns the reconciled map; the input is untouched.
pub fn reconcile_mockups(products: &ProductMap) -> (ProductMap, Vec<Warning>) {
    let mut out = products.clone();
    let mut warnings = Vec::new();

    let keys: Vec<String> = out.keys().cloned().collect();
    for key in keys {
        let Some(product) = out.get(&key) else {
            continue;
        };
        let Some(alias_key) = product.alias_ref().map(str::to_string) else {
            continue;
        };
        let moved = product.mockup_slice().to_vec();
        if moved.is_empty() {
            continue;
        }

        let valid_target = out
            .get(&alias_key)
            .map(|target| target.is_alias())
            .unwrap_or(false);
        if !valid_target {
            warnings.push(Warning::new(
                "reconcile",
                key.clone(),
                format!("alias '{}' missing or not an alias product; mockups left in place", alias_key),
            ));
            continue;
        }

        if let Some(target) = out.get_mut(&alias_key) {
            let existing = target.mockups.get_or_insert_with(Vec::new);
            for mockup in moved {
                if !existing.contains(&mockup) {
                    existing.push(mockup);
                }
            }
        }
        if let Some(source) = out.get_mut(&key) {
            source.mockups = None;
        }
    }

    (out, warnings)
}
