//! Pagination and ordering for ship listings.

use crate::domain::ship::Ship;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use utoipa::ToSchema;

pub const DEFAULT_PAGE_SIZE: u32 = 3;

/// Sort key for a listing; always ascending, ties broken by id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipOrder {
    #[default]
    Id,
    Speed,
    Date,
    Rating,
}

impl ShipOrder {
    pub fn column(&self) -> &'static str {
        match self {
            ShipOrder::Id => "id",
            ShipOrder::Speed => "speed",
            ShipOrder::Date => "production_date",
            ShipOrder::Rating => "rating",
        }
    }

    pub fn compare(&self, a: &Ship, b: &Ship) -> Ordering {
        let primary = match self {
            ShipOrder::Id => Ordering::Equal,
            ShipOrder::Speed => a.speed.cmp(&b.speed),
            ShipOrder::Date => a.production_date.cmp(&b.production_date),
            ShipOrder::Rating => a.rating.cmp(&b.rating),
        };
        primary.then(a.id.cmp(&b.id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order '{0}' (expected one of ID, SPEED, DATE, RATING)")]
pub struct UnknownShipOrder(pub String);

impl FromStr for ShipOrder {
    type Err = UnknownShipOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ID" => Ok(ShipOrder::Id),
            "SPEED" => Ok(ShipOrder::Speed),
            "DATE" => Ok(ShipOrder::Date),
            "RATING" => Ok(ShipOrder::Rating),
            other => Err(UnknownShipOrder(other.to_string())),
        }
    }
}

/// A zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: u32,
    pub page_size: u32,
    pub order: ShipOrder,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: 0,
            page_size: DEFAULT_PAGE_SIZE,
            order: ShipOrder::Id,
        }
    }
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number) * u64::from(self.page_size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: &PageRequest, total_items: u64) -> Self {
        let size = u64::from(request.page_size.max(1));
        Self {
            items,
            page_number: request.page_number,
            page_size: request.page_size,
            total_items,
            total_pages: total_items.div_ceil(size),
        }
    }

    /// Cuts one page out of an already ordered result set.
    pub fn slice(all: Vec<T>, request: &PageRequest) -> Self {
        let total = all.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let items = all
            .into_iter()
            .skip(offset)
            .take(request.page_size as usize)
            .collect();
        Self::new(items, request, total)
    }
}

/// Result of a listing: everything, or one page of it.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    All(Vec<Ship>),
    Page(Page<Ship>),
}

impl Listing {
    pub fn items(&self) -> &[Ship] {
        match self {
            Listing::All(ships) => ships,
            Listing::Page(page) => &page.items,
        }
    }

    pub fn into_items(self) -> Vec<Ship> {
        match self {
            Listing::All(ships) => ships,
            Listing::Page(page) => page.items,
        }
    }
}
