pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::ShipCatalog;
pub use domain::error::CatalogError;
pub use domain::ship::{
    Listing, NewShip, Page, PageRequest, Predicate, Ship, ShipDraft, ShipField, ShipFilter,
    ShipOrder, ShipType,
};
pub use storage::{MemoryShipStore, PgShipStore, RecordStore};
