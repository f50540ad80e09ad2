//! `pct variants` command - generate a variant tree in place

use std::path::PathBuf;

use console::style;
use miette::Result;

use crate::cli::helpers::{load_document, print_warnings};
use crate::cli::GlobalOpts;
use crate::core::ProductType;
use crate::transform::generate_variant_structure;

#[derive(clap::Args, Debug)]
pub struct VariantsArgs {
    /// Configuration file to update
    pub config: PathBuf,

    /// Parent product key
    pub key: String,

    /// Primary variant attribute (e.g. color)
    #[arg(long)]
    pub type1: String,

    /// Comma-separated primary values (e.g. white,black)
    #[arg(long)]
    pub values1: String,

    /// Secondary variant attribute (e.g. size)
    #[arg(long, requires = "values2")]
    pub type2: Option<String>,

    /// Comma-separated secondary values (e.g. S,M,L)
    #[arg(long, requires = "type2")]
    pub values2: Option<String>,
}

fn split_values(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn run(args: VariantsArgs, global: &GlobalOpts) -> Result<()> {
    let mut document = load_document(&args.config)?;

    let product = document
        .products
        .get_mut(&args.key)
        .ok_or_else(|| miette::miette!("Product not found: {}", args.key))?;
    if product.product_type != ProductType::Parent {
        return Err(miette::miette!(
            "Product '{}' is {}, only parent products carry a variant tree",
            args.key,
            product.product_type
        ));
    }

    let values1 = split_values(&args.values1);
    if values1.is_empty() {
        return Err(miette::miette!("--values1 must name at least one value"));
    }
    let values2 = args
        .values2
        .as_deref()
        .map(split_values)
        .unwrap_or_default();

    // Attribute names are canonically lower-case (`color`, `size`).
    let tree = generate_variant_structure(
        &args.type1.to_lowercase(),
        &values1,
        &args.type2.as_deref().unwrap_or("").to_lowercase(),
        &values2,
    );
    let node_count = tree.len();
    let replaced = product.variant.as_ref().map(|v| !v.is_empty()).unwrap_or(false);
    product.variant = Some(tree);

    let warnings = document
        .save(&args.config)
        .map_err(|e| miette::miette!("{}", e))?;
    print_warnings(&warnings, global.quiet);

    if !global.quiet {
        println!(
            "{} Generated {} variant node(s) for '{}'{}",
            style("✓").green(),
            node_count,
            args.key,
            if replaced { " (previous tree replaced)" } else { "" }
        );
    }

    Ok(())
}
