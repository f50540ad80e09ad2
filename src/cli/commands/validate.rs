//! `pct validate` command - configuration consistency checks
//!
//! Errors are things the transforms cannot work around: dangling alias
//! references, catalog placements naming unknown products or variants.
//! Warnings flag shapes that round-trip but usually indicate an authoring
//! mistake: a parent without a variant tree, variant nodes with no
//! structural field, duplicate mockups.

use std::path::PathBuf;

use console::style;
use miette::Result;

use crate::cli::helpers::load_document;
use crate::cli::GlobalOpts;
use crate::core::catalog::VariantRef;
use crate::core::{ConfigDocument, Product, ProductType};
use crate::transform::detect_structure;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Configuration file to validate
    pub config: PathBuf,

    /// Strict mode - warnings become errors
    #[arg(long)]
    pub strict: bool,
}

#[derive(Default)]
struct ValidationStats {
    products_checked: usize,
    errors: usize,
    warnings: usize,
}

struct Issues {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Issues {
    fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

fn check_product(document: &ConfigDocument, key: &str, product: &Product, issues: &mut Issues) {
    if !product.name.is_empty() && product.name != key {
        issues.warn(format!(
            "name '{}' differs from its key '{}'",
            product.name, key
        ));
    }

    match product.product_type {
        ProductType::Alias => {
            if product.alias_ref().is_some() {
                issues.warn("alias product itself references an alias");
            }
            if product.variant.is_some() {
                issues.warn("alias product carries a variant tree");
            }
        }
        ProductType::Simple | ProductType::Parent => {
            if product.prefix.as_deref().unwrap_or("").is_empty() {
                issues.warn("no SKU prefix");
            }
        }
    }

    if let Some(alias_key) = product.alias_ref() {
        match document.products.get(alias_key) {
            Some(target) if target.is_alias() => {
                if !product.mockup_slice().is_empty() {
                    issues.warn(format!(
                        "holds {} mockup(s) directly; they move to alias '{}' on save",
                        product.mockup_slice().len(),
                        alias_key
                    ));
                }
            }
            Some(_) => issues.error(format!("alias '{}' is not an alias product", alias_key)),
            None => issues.error(format!("alias '{}' does not exist", alias_key)),
        }
    }

    match (&product.variant, product.product_type) {
        (Some(tree), ProductType::Parent) => {
            if tree.is_empty() {
                issues.warn("parent product with an empty variant tree");
            } else {
                let (_, detect_warnings) = detect_structure(tree);
                for warning in detect_warnings {
                    issues.warn(warning.to_string());
                }
            }
        }
        (Some(_), ProductType::Simple) => {
            issues.warn("simple product carries a variant tree");
        }
        (None, ProductType::Parent) => {
            issues.warn("parent product without a variant tree");
        }
        _ => {}
    }

    let mockups = product.mockup_slice();
    for (i, mockup) in mockups.iter().enumerate() {
        if mockups[..i].contains(mockup) {
            issues.warn(format!(
                "duplicate mockup {} -> {}",
                mockup.path, mockup.name
            ));
            break;
        }
    }
}

fn check_catalog(document: &ConfigDocument, issues: &mut Issues) {
    let Some(catalog) = &document.catalog else {
        return;
    };

    for (page_idx, page) in catalog.pages.iter().enumerate() {
        for placement in &page.products {
            let at = format!("page {}, placement '{}'", page_idx + 1, placement.product);
            let Some(product) = document.products.get(&placement.product) else {
                issues.error(format!("{}: product does not exist", at));
                continue;
            };

            let Some(variant_ref) = placement.variant_ref() else {
                continue;
            };
            let known = product
                .variant
                .as_ref()
                .map(|tree| tree.contains_key(variant_ref.key()))
                .unwrap_or(false);
            match variant_ref {
                VariantRef::Active(key) if !known => {
                    issues.error(format!("{}: variant '{}' does not exist", at, key));
                }
                VariantRef::Disabled(key) if !known => {
                    issues.warn(format!(
                        "{}: disabled variant '{}' no longer exists",
                        at, key
                    ));
                }
                _ => {}
            }
        }
    }
}

fn report(label: &str, issues: &Issues, stats: &mut ValidationStats, quiet: bool) {
    stats.errors += issues.errors.len();
    stats.warnings += issues.warnings.len();

    if quiet {
        return;
    }
    if !issues.errors.is_empty() {
        println!(
            "{} {} - {} error(s)",
            style("✗").red(),
            label,
            issues.errors.len()
        );
    } else if !issues.warnings.is_empty() {
        println!(
            "{} {} - {} warning(s)",
            style("!").yellow(),
            label,
            issues.warnings.len()
        );
    } else {
        println!("{} {}", style("✓").green(), label);
    }
    for error in &issues.errors {
        println!("    {}", style(error).red());
    }
    for warning in &issues.warnings {
        println!("    {}", style(warning).yellow());
    }
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let document = load_document(&args.config)?;
    let mut stats = ValidationStats::default();

    for (key, product) in &document.products {
        stats.products_checked += 1;
        let mut issues = Issues::new();
        check_product(&document, key, product, &mut issues);
        report(key, &issues, &mut stats, global.quiet);
    }

    if document.catalog.is_some() {
        let mut issues = Issues::new();
        check_catalog(&document, &mut issues);
        report("catalog", &issues, &mut stats, global.quiet);
    }

    if !global.quiet {
        println!();
        println!("{}", style("─".repeat(60)).dim());
        println!("{}", style("Validation Summary").bold());
        println!("{}", style("─".repeat(60)).dim());
        println!("  Products checked: {}", style(stats.products_checked).cyan());
        println!("  Errors:           {}", style(stats.errors).red());
        println!("  Warnings:         {}", style(stats.warnings).yellow());
        println!();
    }

    let failing = stats.errors + if args.strict { stats.warnings } else { 0 };
    if failing > 0 {
        Err(miette::miette!(
            "Validation failed: {} issue(s) in {}",
            failing,
            args.config.display()
        ))
    } else {
        if !global.quiet {
            println!("{} Configuration is valid", style("✓").green().bold());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::product::Mockup;

    fn doc(json: &str) -> ConfigDocument {
        ConfigDocument::from_json(json, "test.json").unwrap()
    }

    fn product_issues(document: &ConfigDocument, key: &str) -> Issues {
        let mut issues = Issues::new();
        check_product(document, key, &document.products[key], &mut issues);
        issues
    }

    #[test]
    fn dangling_alias_is_an_error() {
        let document = doc(r#"{ "tshirt": { "type": "simple", "prefix": "TS", "alias": "nope" } }"#);
        let issues = product_issues(&document, "tshirt");
        assert_eq!(issues.errors.len(), 1);
        assert!(issues.errors[0].contains("does not exist"));
    }

    #[test]
    fn parent_without_tree_is_a_warning() {
        let document = doc(r#"{ "hoodie": { "type": "parent", "prefix": "HD" } }"#);
        let issues = product_issues(&document, "hoodie");
        assert!(issues.errors.is_empty());
        assert!(issues
            .warnings
            .iter()
            .any(|w| w.contains("without a variant tree")));
    }

    #[test]
    fn duplicate_mockups_are_flagged() {
        let mut document = doc(r#"{ "shared": { "type": "alias" } }"#);
        document.products.get_mut("shared").unwrap().mockups = Some(vec![
            Mockup::new("C:/m/a", "a.jpg"),
            Mockup::new("C:/m/a", "a.jpg"),
        ]);
        let issues = product_issues(&document, "shared");
        assert!(issues.warnings.iter().any(|w| w.contains("duplicate mockup")));
    }

    #[test]
    fn catalog_placement_checks_product_and_variant() {
        let document = doc(
            r#"{
                "hoodie": {
                    "type": "parent", "prefix": "HD",
                    "variant": { "white": { "type": "child", "color": "white", "color_FR": "blanc" } }
                },
                "catalog": {
                    "type": "catalog",
                    "pages": [ { "products": [
                        { "product": "hoodie", "variant": "white", "x": 1.0, "y": 1.0 },
                        { "product": "hoodie", "variant": "teal", "x": 1.0, "y": 2.0 },
                        { "product": "gone", "x": 2.0, "y": 2.0 },
                        { "product": "hoodie", "_variant": "_black", "x": 3.0, "y": 2.0 }
                    ] } ]
                }
            }"#,
        );
        let mut issues = Issues::new();
        check_catalog(&document, &mut issues);
        assert_eq!(issues.errors.len(), 2);
        assert_eq!(issues.warnings.len(), 1);
    }
}
