//! Core module - data model and document I/O

pub mod catalog;
pub mod fields;
pub mod product;
pub mod store;

pub use catalog::{CatalogLayout, Page, Placement, VariantRef, CATALOG_KEY};
pub use fields::KnownFieldsConfig;
pub use product::{
    FieldBag, Mockup, Product, ProductMap, ProductType, VariantMap, VariantNode,
};
pub use store::{ConfigDocument, StoreError};
