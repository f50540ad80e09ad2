//! `pct dup` command - duplicate a product

use std::path::PathBuf;

use console::style;
use miette::Result;

use crate::cli::helpers::{load_document, print_warnings};
use crate::cli::GlobalOpts;
use crate::core::ProductMap;

#[derive(clap::Args, Debug)]
pub struct DupArgs {
    /// Configuration file to update
    pub config: PathBuf,

    /// Product key to duplicate
    pub key: String,
}

/// First free `<key>_copy`, `<key>_copy2`, `<key>_copy3`, ... key.
fn copy_key(products: &ProductMap, key: &str) -> String {
    let base = format!("{}_copy", key);
    if !products.contains_key(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}{}", base, n);
        if !products.contains_key(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

pub fn run(args: DupArgs, global: &GlobalOpts) -> Result<()> {
    let mut document = load_document(&args.config)?;

    let source = document
        .products
        .get(&args.key)
        .ok_or_else(|| miette::miette!("Product not found: {}", args.key))?;

    let new_key = copy_key(&document.products, &args.key);
    let mut duplicate = source.clone();
    duplicate.name = new_key.clone();
    document.products.insert(new_key.clone(), duplicate);

    let warnings = document
        .save(&args.config)
        .map_err(|e| miette::miette!("{}", e))?;
    print_warnings(&warnings, global.quiet);

    if !global.quiet {
        println!(
            "{} Duplicated '{}' as '{}'",
            style("✓").green(),
            args.key,
            new_key
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Product, ProductType};

    #[test]
    fn copy_keys_stay_unique() {
        let mut products = ProductMap::new();
        products.insert(
            "tshirt".to_string(),
            Product::new("tshirt", ProductType::Simple),
        );
        assert_eq!(copy_key(&products, "tshirt"), "tshirt_copy");
        products.insert(
            "tshirt_copy".to_string(),
            Product::new("tshirt_copy", ProductType::Simple),
        );
        assert_eq!(copy_key(&products, "tshirt"), "tshirt_copy2");
        products.insert(
            "tshirt_copy2".to_string(),
            Product::new("tshirt_copy2", ProductType::Simple),
        );
        assert_eq!(copy_key(&products, "tshirt"), "tshirt_copy3");
    }
}
