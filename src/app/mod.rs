pub mod ship_catalog;

pub use ship_catalog::ShipCatalog;
