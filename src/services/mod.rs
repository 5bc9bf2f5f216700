pub mod catalog;
pub mod recommendations;

pub use catalog::{CatalogProvider, NationalLibraryCatalog};
