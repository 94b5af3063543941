//! The ship record, its input shapes, and the rules that govern them.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

pub mod filter;
pub mod page;
pub mod rating;
pub mod validator;

pub use filter::{Predicate, Range, ShipFilter};
pub use page::{Listing, Page, PageRequest, ShipOrder};

/// The closed set of ship categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipType {
    Transport,
    Military,
    Merchant,
}

impl ShipType {
    pub const ALL: [ShipType; 3] = [ShipType::Transport, ShipType::Military, ShipType::Merchant];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShipType::Transport => "TRANSPORT",
            ShipType::Military => "MILITARY",
            ShipType::Merchant => "MERCHANT",
        }
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ship type '{0}' (expected one of TRANSPORT, MILITARY, MERCHANT)")]
pub struct UnknownShipType(pub String);

impl FromStr for ShipType {
    type Err = UnknownShipType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShipType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownShipType(s.to_string()))
    }
}

/// Fields a caller can be rejected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ShipField {
    Name,
    Planet,
    ShipType,
    ProductionDate,
    Speed,
    CrewSize,
}

impl ShipField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipField::Name => "name",
            ShipField::Planet => "planet",
            ShipField::ShipType => "shipType",
            ShipField::ProductionDate => "productionDate",
            ShipField::Speed => "speed",
            ShipField::CrewSize => "crewSize",
        }
    }
}

impl fmt::Display for ShipField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted ship.
///
/// `production_date` travels as epoch milliseconds; `speed` and `rating` as JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    pub id: i64,
    pub name: String,
    pub planet: String,
    pub ship_type: ShipType,
    #[serde(with = "chrono::serde::ts_milliseconds", alias = "prodDate")]
    #[schema(value_type = i64)]
    pub production_date: DateTime<Utc>,
    pub is_used: bool,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub speed: Decimal,
    pub crew_size: i32,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub rating: Decimal,
}

impl Ship {
    pub fn production_year(&self) -> i32 {
        self.production_date.year()
    }
}

/// Caller-supplied ship data. Every field is optional: on create the validator
/// demands the required ones, on update only the present ones are applied.
///
/// `id` and `rating` are not part of the input and are ignored if sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planet: Option<String>,
    /// Kept as text so an unknown category surfaces as a validation failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "MILITARY")]
    pub ship_type: Option<String>,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        alias = "prodDate",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i64>)]
    pub production_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_used: Option<bool>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<f64>)]
    pub speed: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crew_size: Option<i32>,
}

/// The caller-owned fields of a ship after validation and normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipFields {
    pub name: String,
    pub planet: String,
    pub ship_type: ShipType,
    pub production_date: DateTime<Utc>,
    pub is_used: bool,
    pub speed: Decimal,
    pub crew_size: i32,
}

impl ShipFields {
    pub fn production_year(&self) -> i32 {
        self.production_date.year()
    }
}

/// A validated, rated ship that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShip {
    pub fields: ShipFields,
    pub rating: Decimal,
}

impl NewShip {
    pub fn new(fields: ShipFields, rating: Decimal) -> Self {
        Self { fields, rating }
    }

    pub fn into_ship(self, id: i64) -> Ship {
        let ShipFields {
            name,
            planet,
            ship_type,
            production_date,
            is_used,
            speed,
            crew_size,
        } = self.fields;
        Ship {
            id,
            name,
            planet,
            ship_type,
            production_date,
            is_used,
            speed,
            crew_size,
            rating: self.rating,
        }
    }
}
