//! `pct list` command - configuration overview

use std::path::PathBuf;

use console::style;
use miette::Result;

use crate::cli::helpers::{load_document, truncate_str};
use crate::cli::GlobalOpts;

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Configuration file to read
    pub config: PathBuf,
}

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let document = load_document(&args.config)?;

    if document.products.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    println!(
        "{:<24} {:<8} {:<8} {:<16} {:>8} {:>8}",
        style("KEY").bold(),
        style("TYPE").bold(),
        style("PREFIX").bold(),
        style("ALIAS").bold(),
        style("VARIANTS").bold(),
        style("MOCKUPS").bold()
    );

    for (key, product) in &document.products {
        let variants = product
            .variant
            .as_ref()
            .map(|v| v.len().to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {:<8} {:<8} {:<16} {:>8} {:>8}",
            truncate_str(key, 24),
            product.product_type,
            product.prefix.as_deref().unwrap_or("-"),
            truncate_str(product.alias_ref().unwrap_or("-"), 16),
            variants,
            product.mockup_slice().len()
        );
    }

    if !global.quiet {
        println!();
        println!("{} product(s)", document.products.len());
        if let Some(catalog) = &document.catalog {
            let name = if catalog.name.is_empty() {
                "<unnamed>"
            } else {
                catalog.name.as_str()
            };
            println!("catalog: {} ({} page(s))", name, catalog.pages.len());
        }
    }

    Ok(())
}
