//! `pct show` command - one product in detail

use std::path::PathBuf;

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::load_document;
use crate::cli::GlobalOpts;
use crate::core::ConfigDocument;

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Configuration file to read
    pub config: PathBuf,

    /// Product key to show
    pub key: String,
}

pub fn run(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let document = load_document(&args.config)?;
    let product = document
        .products
        .get(&args.key)
        .ok_or_else(|| miette::miette!("Product not found: {}", args.key))?;

    let json = serde_json::to_string_pretty(product).into_diagnostic()?;
    println!("{}", json);

    if !global.quiet {
        print_mockup_provenance(&document, &args.key);
    }

    Ok(())
}

/// Show where the product's effective mockups come from: its own array,
/// the referenced alias, or both (own mockups move to the alias on save).
fn print_mockup_provenance(document: &ConfigDocument, key: &str) {
    let Some(product) = document.products.get(key) else {
        return;
    };
    let Some(alias_key) = product.alias_ref() else {
        return;
    };

    println!();
    match document.products.get(alias_key) {
        Some(target) if target.is_alias() => {
            println!(
                "{} {} mockup(s) inherited from alias '{}'",
                style("→").blue(),
                target.mockup_slice().len(),
                alias_key
            );
            for mockup in target.mockup_slice() {
                println!("    {} -> {}", mockup.path, mockup.name);
            }
            if !product.mockup_slice().is_empty() {
                println!(
                    "{} {} directly-held mockup(s) will move to '{}' on the next save",
                    style("!").yellow(),
                    product.mockup_slice().len(),
                    alias_key
                );
            }
        }
        _ => {
            println!(
                "{} alias '{}' missing or not an alias product",
                style("✗").red(),
                alias_key
            );
        }
    }
}
