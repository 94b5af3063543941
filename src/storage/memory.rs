//! In-process record store.
//!
//! Evaluates predicates directly against the stored ships. Used by the tests
//! and by local runs without a database.

use crate::domain::ship::{Listing, NewShip, Page, PageRequest, Predicate, Ship};
use crate::storage::RecordStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct MemoryState {
    ships: BTreeMap<i64, Ship>,
    last_id: i64,
}

#[derive(Default)]
pub struct MemoryShipStore {
    state: RwLock<MemoryState>,
}

impl MemoryShipStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.ships.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RecordStore for MemoryShipStore {
    async fn exists_by_id(&self, id: i64) -> anyhow::Result<bool> {
        Ok(self.state.read().await.ships.contains_key(&id))
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Ship>> {
        Ok(self.state.read().await.ships.get(&id).cloned())
    }

    async fn save(&self, ship: Ship) -> anyhow::Result<Ship> {
        let mut state = self.state.write().await;
        match state.ships.get_mut(&ship.id) {
            Some(slot) => {
                *slot = ship.clone();
                Ok(ship)
            }
            None => Err(anyhow::anyhow!("ship {} does not exist", ship.id)),
        }
    }

    async fn save_new(&self, ship: NewShip) -> anyhow::Result<Ship> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let ship = ship.into_ship(state.last_id);
        state.ships.insert(ship.id, ship.clone());
        Ok(ship)
    }

    async fn delete_by_id(&self, id: i64) -> anyhow::Result<()> {
        self.state.write().await.ships.remove(&id);
        Ok(())
    }

    async fn query(
        &self,
        predicate: &Predicate,
        page: Option<PageRequest>,
    ) -> anyhow::Result<Listing> {
        let state = self.state.read().await;
        let mut matching: Vec<Ship> = state
            .ships
            .values()
            .filter(|ship| predicate.matches(ship))
            .cloned()
            .collect();
        drop(state);

        Ok(match page {
            None => Listing::All(matching),
            Some(request) => {
                matching.sort_by(|a, b| request.order.compare(a, b));
                Listing::Page(Page::slice(matching, &request))
            }
        })
    }
}
