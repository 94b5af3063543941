//! Field rules that gate every write.
//!
//! Create runs every check through [`validate_new`]; update runs the same
//! checks on whichever fields the patch carries through [`validate_patch`].
//! The first violation found is reported.

use crate::domain::error::CatalogError;
use crate::domain::ship::{Ship, ShipDraft, ShipField, ShipFields, ShipType};
use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;

pub const MAX_TEXT_LEN: usize = 50;
pub const MIN_PRODUCTION_YEAR: i32 = 2800;
pub const MAX_PRODUCTION_YEAR: i32 = 3019;
pub const MIN_CREW_SIZE: i32 = 1;
pub const MAX_CREW_SIZE: i32 = 9999;

pub fn min_speed() -> Decimal {
    Decimal::new(1, 2)
}

pub fn max_speed() -> Decimal {
    Decimal::new(99, 2)
}

fn check_text(field: ShipField, value: Option<&str>) -> Result<String, CatalogError> {
    let value = value.ok_or_else(|| CatalogError::validation(field, "is required"))?;
    if value.is_empty() {
        return Err(CatalogError::validation(field, "must not be empty"));
    }
    let len = value.chars().count();
    if len > MAX_TEXT_LEN {
        return Err(CatalogError::validation(
            field,
            format!("is {len} characters long, at most {MAX_TEXT_LEN} allowed"),
        ));
    }
    Ok(value.to_string())
}

pub fn check_name(name: Option<&str>) -> Result<String, CatalogError> {
    check_text(ShipField::Name, name)
}

pub fn check_planet(planet: Option<&str>) -> Result<String, CatalogError> {
    check_text(ShipField::Planet, planet)
}

pub fn check_ship_type(ship_type: Option<&str>) -> Result<ShipType, CatalogError> {
    let raw = ship_type.ok_or_else(|| CatalogError::validation(ShipField::ShipType, "is required"))?;
    raw.parse::<ShipType>()
        .map_err(|e| CatalogError::validation(ShipField::ShipType, e.to_string()))
}

pub fn check_production_date(
    production_date: Option<DateTime<Utc>>,
) -> Result<DateTime<Utc>, CatalogError> {
    let date = production_date
        .ok_or_else(|| CatalogError::validation(ShipField::ProductionDate, "is required"))?;
    let year = date.year();
    if !(MIN_PRODUCTION_YEAR..=MAX_PRODUCTION_YEAR).contains(&year) {
        return Err(CatalogError::validation(
            ShipField::ProductionDate,
            format!("year {year} is outside {MIN_PRODUCTION_YEAR}..={MAX_PRODUCTION_YEAR}"),
        ));
    }
    Ok(date)
}

pub fn check_speed(speed: Option<Decimal>) -> Result<Decimal, CatalogError> {
    let speed = speed.ok_or_else(|| CatalogError::validation(ShipField::Speed, "is required"))?;
    if speed < min_speed() || speed > max_speed() {
        return Err(CatalogError::validation(
            ShipField::Speed,
            format!("{speed} is outside {}..={}", min_speed(), max_speed()),
        ));
    }
    Ok(speed)
}

pub fn check_crew_size(crew_size: Option<i32>) -> Result<i32, CatalogError> {
    let crew_size =
        crew_size.ok_or_else(|| CatalogError::validation(ShipField::CrewSize, "is required"))?;
    if !(MIN_CREW_SIZE..=MAX_CREW_SIZE).contains(&crew_size) {
        return Err(CatalogError::validation(
            ShipField::CrewSize,
            format!("{crew_size} is outside {MIN_CREW_SIZE}..={MAX_CREW_SIZE}"),
        ));
    }
    Ok(crew_size)
}

/// A missing usage flag means "new".
pub fn normalize_usage(is_used: Option<bool>) -> bool {
    is_used.unwrap_or(false)
}

/// Validates a full draft for the create path.
pub fn validate_new(draft: &ShipDraft) -> Result<ShipFields, CatalogError> {
    Ok(ShipFields {
        name: check_name(draft.name.as_deref())?,
        planet: check_planet(draft.planet.as_deref())?,
        ship_type: check_ship_type(draft.ship_type.as_deref())?,
        production_date: check_production_date(draft.production_date)?,
        is_used: normalize_usage(draft.is_used),
        speed: check_speed(draft.speed)?,
        crew_size: check_crew_size(draft.crew_size)?,
    })
}

/// Re-checks the invariants of a record that is already persisted.
pub fn validate_stored(ship: &Ship) -> Result<(), CatalogError> {
    check_name(Some(&ship.name))?;
    check_planet(Some(&ship.planet))?;
    check_production_date(Some(ship.production_date))?;
    check_speed(Some(ship.speed))?;
    check_crew_size(Some(ship.crew_size))?;
    Ok(())
}

/// The checked subset of an update request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipPatch {
    pub name: Option<String>,
    pub planet: Option<String>,
    pub ship_type: Option<ShipType>,
    pub production_date: Option<DateTime<Utc>>,
    pub is_used: Option<bool>,
    pub speed: Option<Decimal>,
    pub crew_size: Option<i32>,
}

impl ShipPatch {
    /// Applies the present fields to `ship`.
    ///
    /// Returns true when a rating input (speed, usage, production date) changed.
    pub fn apply_to(self, ship: &mut Ship) -> bool {
        let mut rating_inputs_changed = false;

        if let Some(name) = self.name {
            ship.name = name;
        }
        if let Some(planet) = self.planet {
            ship.planet = planet;
        }
        if let Some(ship_type) = self.ship_type {
            ship.ship_type = ship_type;
        }
        if let Some(date) = self.production_date {
            rating_inputs_changed |= ship.production_date != date;
            ship.production_date = date;
        }
        if let Some(is_used) = self.is_used {
            rating_inputs_changed |= ship.is_used != is_used;
            ship.is_used = is_used;
        }
        if let Some(speed) = self.speed {
            rating_inputs_changed |= ship.speed != speed;
            ship.speed = speed;
        }
        if let Some(crew_size) = self.crew_size {
            ship.crew_size = crew_size;
        }

        rating_inputs_changed
    }
}

/// Validates only the fields a patch carries; absent fields stay absent.
pub fn validate_patch(draft: &ShipDraft) -> Result<ShipPatch, CatalogError> {
    Ok(ShipPatch {
        name: draft.name.as_deref().map(|v| check_name(Some(v))).transpose()?,
        planet: draft.planet.as_deref().map(|v| check_planet(Some(v))).transpose()?,
        ship_type: draft
            .ship_type
            .as_deref()
            .map(|v| check_ship_type(Some(v)))
            .transpose()?,
        production_date: draft
            .production_date
            .map(|v| check_production_date(Some(v)))
            .transpose()?,
        is_used: draft.is_used,
        speed: draft.speed.map(|v| check_speed(Some(v))).transpose()?,
        crew_size: draft.crew_size.map(|v| check_crew_size(Some(v))).transpose()?,
    })
}
