//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand};

use crate::cli::commands::{
    completions::CompletionsArgs,
    dup::DupArgs,
    export::ExportArgs,
    import::ImportArgs,
    list::ListArgs,
    show::ShowArgs,
    template::TemplateArgs,
    validate::ValidateArgs,
    variants::VariantsArgs,
};

#[derive(Parser)]
#[command(name = "pct")]
#[command(author, version, about = "Print-on-demand Catalog Toolkit")]
#[command(long_about = "A command-line editor for print-on-demand catalog configuration files: \
JSON product/variant definitions with CSV export, import and templating.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the products of a configuration file
    List(ListArgs),

    /// Show one product in detail
    Show(ShowArgs),

    /// Export a configuration to flat CSV
    Export(ExportArgs),

    /// Import products from a flat CSV file
    Import(ImportArgs),

    /// Generate a blank CSV import template
    Template(TemplateArgs),

    /// Generate a variant tree for a parent product
    Variants(VariantsArgs),

    /// Duplicate a product under a new key
    Dup(DupArgs),

    /// Validate a configuration file
    Validate(ValidateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
