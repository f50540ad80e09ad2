//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use std::path::Path;

use console::style;
use miette::Result;

use crate::core::ConfigDocument;
use crate::transform::Warning;

/// Load a configuration document, mapping store errors into diagnostics.
pub fn load_document(path: &Path) -> Result<ConfigDocument> {
    ConfigDocument::load(path).map_err(|e| miette::miette!("{}", e))
}

/// Print transform warnings to stderr, one `!` line each.
pub fn print_warnings(warnings: &[Warning], quiet: bool) {
    if quiet {
        return;
    }
    for warning in warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }
}

/// Truncate a string to max_len, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
    }
}
