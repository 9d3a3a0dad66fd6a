pub mod catalog;
pub mod render;

pub use catalog::{run_catalog, CatalogRequest, CatalogSummary};
