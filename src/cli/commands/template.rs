//! `pct template` command - blank CSV import template
//!
//! Emits a header row plus one example row. The header set is the
//! known-fields configuration (minus the mockup and variant transport
//! columns it may name), three mockup path/name pairs and the four variant
//! summary columns, in template order.

use std::io;
use std::path::PathBuf;

use console::style;
use csv::{QuoteStyle, WriterBuilder};
use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::KnownFieldsConfig;
use crate::transform::headers::sort_template_headers;

/// Mockup index pairs included in the template. Exports may carry more;
/// the template shows three to keep the sheet readable.
const TEMPLATE_MOCKUP_SLOTS: usize = 3;

#[derive(clap::Args, Debug)]
pub struct TemplateArgs {
    /// Output CSV file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Known-fields configuration file
    #[arg(long)]
    pub fields_config: Option<PathBuf>,
}

fn template_headers(fields_config: &KnownFieldsConfig) -> Vec<String> {
    let mut headers = vec!["name".to_string(), "type".to_string()];
    for key in fields_config.all_field_keys() {
        if key == "name" || key == "type" {
            continue;
        }
        if key.starts_with("mockups") || key.starts_with("variant") {
            continue;
        }
        headers.push(key);
    }
    for i in 0..TEMPLATE_MOCKUP_SLOTS {
        headers.push(format!("mockups_path_{}", i));
        headers.push(format!("mockups_name_{}", i));
    }
    for column in ["variant1Type", "variant1Values", "variant2Type", "variant2Values"] {
        headers.push(column.to_string());
    }
    sort_template_headers(headers)
}

fn example_value(header: &str) -> &'static str {
    match header {
        "name" => "example_product_name",
        "type" => "simple",
        "prefix" => "EX",
        "category" => "T-shirt",
        "variant1Type" => "color",
        "variant1Values" => "white,black,red",
        "variant2Type" => "size",
        "variant2Values" => "XS,S,M",
        "mockups_path_0" => "C:/mockups/example_mockup_path",
        "mockups_name_0" => "{label}.jpg",
        _ => "",
    }
}

fn write_template<W: io::Write>(headers: &[String], out: W) -> csv::Result<()> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(out);
    writer.write_record(headers)?;
    writer.write_record(headers.iter().map(|h| example_value(h)))?;
    writer.flush()?;
    Ok(())
}

pub fn run(args: TemplateArgs, global: &GlobalOpts) -> Result<()> {
    let fields_config = KnownFieldsConfig::load(args.fields_config.as_deref())
        .map_err(|e| miette::miette!("{}", e))?;
    let headers = template_headers(&fields_config);

    match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path).into_diagnostic()?;
            write_template(&headers, file).into_diagnostic()?;
            if !global.quiet {
                println!(
                    "{} Wrote template with {} column(s) to {}",
                    style("✓").green(),
                    headers.len(),
                    path.display()
                );
            }
        }
        None => {
            write_template(&headers, io::stdout()).into_diagnostic()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_start_with_name_and_type() {
        let headers = template_headers(&KnownFieldsConfig::default());
        assert_eq!(headers[0], "name");
        assert_eq!(headers[1], "type");
        assert!(headers.contains(&"mockups_path_2".to_string()));
        assert!(headers.contains(&"variant2Values".to_string()));
        assert!(!headers.contains(&"mockups_path_3".to_string()));
    }

    #[test]
    fn example_row_matches_headers() {
        assert_eq!(example_value("name"), "example_product_name");
        assert_eq!(example_value("category"), "T-shirt");
        assert_eq!(example_value("variant1Values"), "white,black,red");
        assert_eq!(example_value("unknown_column"), "");
    }
}
