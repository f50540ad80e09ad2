//! PCT: Print-on-demand Catalog Toolkit
//!
//! A command-line editor for print-on-demand catalog configuration files:
//! a JSON document of products, variant trees, shared mockup aliases and a
//! printed-catalog layout, with lossless flat-CSV export and import.

pub mod cli;
pub mod core;
pub mod transform;
