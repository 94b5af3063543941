//! Record stores backing the ship catalog.

use crate::domain::ship::{Listing, NewShip, PageRequest, Predicate, Ship};
use crate::infra::config;
use async_trait::async_trait;
use std::sync::Arc;

pub mod memory;
pub mod postgres;

pub use memory::MemoryShipStore;
pub use postgres::PgShipStore;

/// Persistence capabilities the catalog relies on.
///
/// Implementations provide whatever atomicity they natively have; the catalog
/// adds none on top (last writer wins on concurrent updates).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Cheap reachability check used by the health endpoint.
    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn exists_by_id(&self, id: i64) -> anyhow::Result<bool>;

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Ship>>;

    /// Overwrites an existing record.
    async fn save(&self, ship: Ship) -> anyhow::Result<Ship>;

    /// Inserts a new record and returns it with its assigned id.
    async fn save_new(&self, ship: NewShip) -> anyhow::Result<Ship>;

    async fn delete_by_id(&self, id: i64) -> anyhow::Result<()>;

    /// Records matching `predicate`: all of them ordered by id, or one page.
    async fn query(&self, predicate: &Predicate, page: Option<PageRequest>)
        -> anyhow::Result<Listing>;
}

/// Opens the store selected by the environment: Postgres when `DATABASE_URL`
/// is set, the in-memory store otherwise.
pub async fn open_from_env() -> anyhow::Result<Arc<dyn RecordStore>> {
    match config::database_url() {
        Some(url) => {
            let store = PgShipStore::connect(&url, config::db_max_connections()?).await?;
            store.ensure_schema().await?;
            tracing::info!("using postgres record store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; records are kept in memory only");
            Ok(Arc::new(MemoryShipStore::new()))
        }
    }
}
