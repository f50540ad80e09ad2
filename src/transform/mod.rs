//! The nested-product ⇄ flat-CSV transforms and the save-time
//! alias/mockup reconciliation.
//!
//! Every function in this module tree is non-mutating: it takes the product
//! map (or a single product) as an explicit argument and returns a new
//! value. Recoverable problems never abort a batch; they accumulate as
//! [`Warning`]s for the CLI to report.

pub mod detect;
pub mod flatten;
pub mod generate;
pub mod headers;
pub mod reconcile;
pub mod reconstruct;

pub use detect::{detect_structure, LevelStructure, VariantStructure};
pub use flatten::{flatten_product, flatten_product_rows, FlatRow};
pub use generate::generate_variant_structure;
pub use reconcile::reconcile_mockups;
pub use reconstruct::{group_rows, reconstruct_map, RowGroup};

/// A non-fatal problem encountered by a transform, tied to the operation
/// and the offending key or row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Operation that produced the warning (e.g. `"import"`).
    pub operation: &'static str,
    /// Offending product key, variant key, or row label.
    pub subject: String,
    pub message: String,
}

impl Warning {
    pub fn new(
        operation: &'static str,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}': {}", self.operation, self.subject, self.message)
    }
}
