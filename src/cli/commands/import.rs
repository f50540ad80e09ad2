//! `pct import` command - flat CSV back into a configuration
//!
//! Rows group into parent/children clusters, each cluster rebuilds one
//! product, and the result either merges into the existing configuration
//! (imported keys overwrite) or replaces its product entries outright. The
//! catalog entry never travels through CSV and is preserved either way.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use console::style;
use csv::ReaderBuilder;
use dialoguer::Confirm;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::print_warnings;
use crate::cli::GlobalOpts;
use crate::core::ConfigDocument;
use crate::transform::flatten::FlatRow;
use crate::transform::{group_rows, reconstruct_map};

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// CSV file to import
    pub file: PathBuf,

    /// Configuration file to write
    #[arg(long, short = 'c')]
    pub config: PathBuf,

    /// Merge into the existing configuration (imported keys overwrite)
    #[arg(long, conflicts_with = "replace")]
    pub merge: bool,

    /// Replace the existing product entries outright
    #[arg(long)]
    pub replace: bool,

    /// Parse and report without writing the configuration
    #[arg(long)]
    pub dry_run: bool,

    /// Continue importing after CSV parse errors
    #[arg(long)]
    pub skip_errors: bool,
}

fn read_rows(args: &ImportArgs) -> Result<Vec<FlatRow>> {
    let file = File::open(&args.file).into_diagnostic()?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let headers = reader.headers().into_diagnostic()?.clone();
    let mut rows = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let row_num = row_idx + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                eprintln!(
                    "{} Row {}: CSV parse error: {}",
                    style("✗").red(),
                    row_num,
                    e
                );
                if !args.skip_errors {
                    return Err(miette::miette!(
                        "CSV parse error at row {}: {}",
                        row_num,
                        e
                    ));
                }
                continue;
            }
        };
        let row: FlatRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

pub fn run(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let rows = read_rows(&args)?;
    let (groups, group_warnings) = group_rows(rows);
    let (imported, import_warnings) = reconstruct_map(groups);

    print_warnings(&group_warnings, global.quiet);
    print_warnings(&import_warnings, global.quiet);

    if imported.is_empty() {
        return Err(miette::miette!(
            "No importable product rows in {}",
            args.file.display()
        ));
    }

    if args.dry_run {
        println!(
            "{} Would import {} product(s) into {} (dry run)",
            style("→").blue(),
            imported.len(),
            args.config.display()
        );
        return Ok(());
    }

    let existing = if args.config.exists() {
        Some(ConfigDocument::load(&args.config).map_err(|e| miette::miette!("{}", e))?)
    } else {
        None
    };

    let merge = match (&existing, args.merge, args.replace) {
        (None, _, _) => false,
        (Some(_), true, _) => true,
        (Some(_), _, true) => false,
        (Some(_), false, false) => Confirm::new()
            .with_prompt(format!(
                "{} exists. Merge imported products into it? (no = replace)",
                args.config.display()
            ))
            .default(true)
            .interact()
            .into_diagnostic()?,
    };

    let mut document = existing.unwrap_or_default();
    if merge {
        for (key, product) in imported.iter() {
            document.products.insert(key.clone(), product.clone());
        }
    } else {
        document.products = imported.clone();
    }

    let save_warnings = document
        .save(&args.config)
        .map_err(|e| miette::miette!("{}", e))?;
    print_warnings(&save_warnings, global.quiet);

    if !global.quiet {
        println!(
            "{} Imported {} product(s) into {} ({})",
            style("✓").green(),
            imported.len(),
            args.config.display(),
            if merge { "merged" } else { "replaced" }
        );
    }

    Ok(())
}
