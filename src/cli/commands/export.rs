//! `pct export` command - configuration to flat CSV
//!
//! Every product flattens to a parent row plus child override rows. The
//! header universe is the union of every row's columns, the known-fields
//! configuration and the four variant summary columns, ordered by the
//! export priority list.

use std::path::PathBuf;

use console::style;
use csv::{QuoteStyle, WriterBuilder};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{load_document, print_warnings};
use crate::cli::GlobalOpts;
use crate::core::KnownFieldsConfig;
use crate::transform::flatten::{flatten_product_rows, FlatRow, SELECTOR_COLUMNS};
use crate::transform::headers::sort_export_headers;
use crate::transform::Warning;

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Configuration file to export
    pub config: PathBuf,

    /// Output CSV file (default: catalog_config_export_<timestamp>.csv)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Known-fields configuration file
    #[arg(long)]
    pub fields_config: Option<PathBuf>,
}

fn default_output_path() -> PathBuf {
    let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    PathBuf::from(format!("catalog_config_export_{}.csv", stamp))
}

pub fn run(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let document = load_document(&args.config)?;
    let fields_config = KnownFieldsConfig::load(args.fields_config.as_deref())
        .map_err(|e| miette::miette!("{}", e))?;

    let mut rows: Vec<FlatRow> = Vec::new();
    let mut warnings: Vec<Warning> = Vec::new();
    let mut product_count = 0usize;
    for (key, product) in &document.products {
        let (mut product_rows, product_warnings) = flatten_product_rows(product);
        // Alias entries in existing documents often omit `name`;
        // the row needs one or the importer cannot see a parent row.
        if let Some(parent) = product_rows.first_mut() {
            if parent.get("name").map(|n| n.is_empty()).unwrap_or(true) {
                parent.insert("name".to_string(), key.clone());
            }
        }
        rows.extend(product_rows);
        warnings.extend(product_warnings);
        product_count += 1;
    }

    // name/type always present, even for an empty map.
    let mut headers: Vec<String> = vec!["name".to_string(), "type".to_string()];
    for row in &rows {
        headers.extend(row.keys().cloned());
    }
    headers.extend(fields_config.all_field_keys());
    headers.extend(SELECTOR_COLUMNS.iter().map(|s| s.to_string()));
    let headers = sort_export_headers(headers);

    let output = args.output.clone().unwrap_or_else(default_output_path);
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_path(&output)
        .into_diagnostic()?;
    writer.write_record(&headers).into_diagnostic()?;
    for row in &rows {
        writer
            .write_record(
                headers
                    .iter()
                    .map(|h| row.get(h).map(String::as_str).unwrap_or("")),
            )
            .into_diagnostic()?;
    }
    writer.flush().into_diagnostic()?;

    print_warnings(&warnings, global.quiet);
    if !global.quiet {
        println!(
            "{} Exported {} product(s) as {} row(s) to {}",
            style("✓").green(),
            product_count,
            rows.len(),
            output.display()
        );
    }

    Ok(())
}
