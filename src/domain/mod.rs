//! Ship domain: the record, its validation rules, rating and filters.

pub mod error;
pub mod ship;

pub use error::CatalogError;
