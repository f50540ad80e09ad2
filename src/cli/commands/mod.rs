//! CLI command implementations

pub mod completions;
pub mod dup;
pub mod export;
pub mod import;
pub mod list;
pub mod show;
pub mod template;
pub mod validate;
pub mod variants;
