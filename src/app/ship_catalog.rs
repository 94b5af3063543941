//! The ship catalog.
//!
//! Sits between the transport layer and a [`RecordStore`]:
//! 1.  Every write goes through the validator first.
//! 2.  The rating is always computed here, never taken from the caller.
//! 3.  Listings turn optional filter inputs into a single predicate for the store.

use crate::domain::error::CatalogError;
use crate::domain::ship::rating::compute_rating;
use crate::domain::ship::validator;
use crate::domain::ship::{Listing, NewShip, PageRequest, Ship, ShipDraft, ShipFilter};
use crate::storage::RecordStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct ShipCatalog {
    store: Arc<dyn RecordStore>,
}

impl ShipCatalog {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Parses a path identifier. Only positive integers are ids.
    pub fn parse_identifier(raw: Option<&str>) -> Result<i64, CatalogError> {
        let raw = match raw {
            Some(v) if !v.is_empty() => v,
            _ => return Err(CatalogError::bad_request("ship id is missing")),
        };
        match raw.parse::<i64>() {
            Ok(id) if id > 0 => Ok(id),
            Ok(_) => Err(CatalogError::bad_request(format!(
                "ship id must be positive, got {raw}"
            ))),
            Err(_) => Err(CatalogError::bad_request(format!(
                "ship id must be an integer, got '{raw}'"
            ))),
        }
    }

    pub async fn create(&self, draft: &ShipDraft) -> Result<Ship, CatalogError> {
        let fields = validator::validate_new(draft).inspect_err(log_rejection)?;
        let rating = compute_rating(fields.speed, fields.production_year(), fields.is_used);
        let ship = self.store.save_new(NewShip::new(fields, rating)).await?;
        tracing::info!(ship_id = ship.id, rating = %ship.rating, "ship created");
        Ok(ship)
    }

    pub async fn get(&self, id: i64) -> Result<Ship, CatalogError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Applies the fields present in `patch` to ship `id`.
    ///
    /// Read-modify-write without a version check: concurrent updates to the
    /// same id resolve as last writer wins.
    pub async fn update(&self, id: i64, patch: &ShipDraft) -> Result<Ship, CatalogError> {
        let mut ship = self.get(id).await?;
        validator::validate_stored(&ship)?;

        let patch = validator::validate_patch(patch).inspect_err(log_rejection)?;
        if patch.apply_to(&mut ship) {
            ship.rating = compute_rating(ship.speed, ship.production_year(), ship.is_used);
        }

        let ship = self.store.save(ship).await?;
        tracing::info!(ship_id = ship.id, rating = %ship.rating, "ship updated");
        Ok(ship)
    }

    pub async fn delete(&self, id: i64) -> Result<(), CatalogError> {
        if !self.store.exists_by_id(id).await? {
            return Err(CatalogError::NotFound(id));
        }
        self.store.delete_by_id(id).await?;
        tracing::info!(ship_id = id, "ship deleted");
        Ok(())
    }

    /// Everything matching `filter`, or one page of it when `page` is given.
    pub async fn list(
        &self,
        filter: &ShipFilter,
        page: Option<PageRequest>,
    ) -> Result<Listing, CatalogError> {
        let predicate = filter.to_predicate()?;
        tracing::debug!(?predicate, ?page, "listing ships");
        Ok(self.store.query(&predicate, page).await?)
    }

    pub async fn count(&self, filter: &ShipFilter) -> Result<usize, CatalogError> {
        Ok(self.list(filter, None).await?.items().len())
    }
}

fn log_rejection(err: &CatalogError) {
    tracing::warn!(error = %err, "ship rejected");
}
