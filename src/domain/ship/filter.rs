//! Composable predicates for listing ships.
//!
//! Each `by_*` factory covers one dimension and returns `None` when none of its
//! inputs are present. [`Predicate::all`] AND-combines whatever fragments are
//! left. Stores either evaluate the tree in memory ([`Predicate::matches`]) or
//! translate it to their own query language.

use crate::domain::error::CatalogError;
use crate::domain::ship::{Ship, ShipType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// An inclusive bound on an ordered field.
#[derive(Debug, Clone, PartialEq)]
pub enum Range<T> {
    AtLeast(T),
    AtMost(T),
    Between(T, T),
}

impl<T: PartialOrd> Range<T> {
    pub fn from_bounds(min: Option<T>, max: Option<T>) -> Option<Self> {
        match (min, max) {
            (None, None) => None,
            (Some(min), None) => Some(Range::AtLeast(min)),
            (None, Some(max)) => Some(Range::AtMost(max)),
            (Some(min), Some(max)) => Some(Range::Between(min, max)),
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        match self {
            Range::AtLeast(min) => value >= min,
            Range::AtMost(max) => value <= max,
            Range::Between(min, max) => value >= min && value <= max,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    NameContains(String),
    PlanetContains(String),
    ShipTypeIs(ShipType),
    ProductionDate(Range<DateTime<Utc>>),
    Speed(Range<Decimal>),
    CrewSize(Range<i32>),
    Rating(Range<Decimal>),
    Usage(bool),
    /// Conjunction; empty means "every record".
    All(Vec<Predicate>),
}

impl Predicate {
    /// Matches every record.
    pub fn any() -> Self {
        Predicate::All(Vec::new())
    }

    /// AND-combines the present fragments, flattening nested conjunctions.
    pub fn all<I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = Option<Predicate>>,
    {
        let mut parts = Vec::new();
        for fragment in fragments.into_iter().flatten() {
            fragment.flatten_into(&mut parts);
        }
        Predicate::All(parts)
    }

    pub fn and(self, other: Predicate) -> Self {
        Predicate::all([Some(self), Some(other)])
    }

    fn flatten_into(self, parts: &mut Vec<Predicate>) {
        match self {
            Predicate::All(inner) => inner.into_iter().for_each(|p| p.flatten_into(parts)),
            leaf => parts.push(leaf),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        match self {
            Predicate::All(parts) => parts.iter().all(Predicate::is_unconstrained),
            _ => false,
        }
    }

    pub fn matches(&self, ship: &Ship) -> bool {
        match self {
            Predicate::NameContains(needle) => ship.name.contains(needle.as_str()),
            Predicate::PlanetContains(needle) => ship.planet.contains(needle.as_str()),
            Predicate::ShipTypeIs(ship_type) => ship.ship_type == *ship_type,
            Predicate::ProductionDate(range) => range.contains(&ship.production_date),
            Predicate::Speed(range) => range.contains(&ship.speed),
            Predicate::CrewSize(range) => range.contains(&ship.crew_size),
            Predicate::Rating(range) => range.contains(&ship.rating),
            Predicate::Usage(is_used) => ship.is_used == *is_used,
            Predicate::All(parts) => parts.iter().all(|p| p.matches(ship)),
        }
    }
}

pub fn by_name(needle: Option<&str>) -> Option<Predicate> {
    needle.map(|n| Predicate::NameContains(n.to_string()))
}

pub fn by_planet(needle: Option<&str>) -> Option<Predicate> {
    needle.map(|n| Predicate::PlanetContains(n.to_string()))
}

pub fn by_ship_type(ship_type: Option<ShipType>) -> Option<Predicate> {
    ship_type.map(Predicate::ShipTypeIs)
}

/// 4714-11-24 BC, the lowest value a Postgres `timestamptz` holds. The upper
/// end of that type lies beyond chrono's own range.
pub const EARLIEST_TIMESTAMP_MILLIS: i64 = -210_866_803_200_000;

fn millis_to_date(name: &str, millis: Option<i64>) -> Result<Option<DateTime<Utc>>, CatalogError> {
    millis
        .map(|ms| {
            Some(ms)
                .filter(|ms| *ms >= EARLIEST_TIMESTAMP_MILLIS)
                .and_then(DateTime::from_timestamp_millis)
                .ok_or_else(|| {
                    CatalogError::bad_request(format!(
                        "{name}={ms} is not a representable timestamp"
                    ))
                })
        })
        .transpose()
}

/// Production date between two epoch-millisecond bounds, both inclusive.
pub fn by_date_range(
    after: Option<i64>,
    before: Option<i64>,
) -> Result<Option<Predicate>, CatalogError> {
    let after = millis_to_date("after", after)?;
    let before = millis_to_date("before", before)?;
    Ok(Range::from_bounds(after, before).map(Predicate::ProductionDate))
}

pub fn by_speed_range(min: Option<Decimal>, max: Option<Decimal>) -> Option<Predicate> {
    Range::from_bounds(min, max).map(Predicate::Speed)
}

pub fn by_crew_size_range(min: Option<i32>, max: Option<i32>) -> Option<Predicate> {
    Range::from_bounds(min, max).map(Predicate::CrewSize)
}

pub fn by_rating_range(min: Option<Decimal>, max: Option<Decimal>) -> Option<Predicate> {
    Range::from_bounds(min, max).map(Predicate::Rating)
}

pub fn by_usage(is_used: Option<bool>) -> Option<Predicate> {
    is_used.map(Predicate::Usage)
}

/// Every optional filter input a listing accepts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipFilter {
    pub name: Option<String>,
    pub planet: Option<String>,
    pub ship_type: Option<ShipType>,
    /// Epoch milliseconds, inclusive.
    pub after: Option<i64>,
    /// Epoch milliseconds, inclusive.
    pub before: Option<i64>,
    pub is_used: Option<bool>,
    pub min_speed: Option<Decimal>,
    pub max_speed: Option<Decimal>,
    pub min_crew_size: Option<i32>,
    pub max_crew_size: Option<i32>,
    pub min_rating: Option<Decimal>,
    pub max_rating: Option<Decimal>,
}

impl ShipFilter {
    pub fn to_predicate(&self) -> Result<Predicate, CatalogError> {
        Ok(Predicate::all([
            by_name(self.name.as_deref()),
            by_planet(self.planet.as_deref()),
            by_ship_type(self.ship_type),
            by_date_range(self.after, self.before)?,
            by_usage(self.is_used),
            by_speed_range(self.min_speed, self.max_speed),
            by_crew_size_range(self.min_crew_size, self.max_crew_size),
            by_rating_range(self.min_rating, self.max_rating),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::seq::SliceRandom;

    fn ship(id: i64, name: &str, year: i32, speed: i64, crew: i32, used: bool) -> Ship {
        Ship {
            id,
            name: name.to_string(),
            planet: "Earth".to_string(),
            ship_type: if used { ShipType::Merchant } else { ShipType::Military },
            production_date: Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap(),
            is_used: used,
            speed: Decimal::new(speed, 2),
            crew_size: crew,
            rating: Decimal::new(id * 10, 2),
        }
    }

    fn fleet() -> Vec<Ship> {
        vec![
            ship(1, "Orion", 2850, 10, 5, false),
            ship(2, "Orion II", 2900, 20, 50, true),
            ship(3, "Vega", 2950, 50, 500, false),
            ship(4, "Lyra", 3000, 80, 5000, true),
            ship(5, "orion", 3019, 99, 9999, false),
        ]
    }

    fn ids(predicate: &Predicate) -> Vec<i64> {
        fleet()
            .into_iter()
            .filter(|s| predicate.matches(s))
            .map(|s| s.id)
            .collect()
    }

    fn millis(year: i32) -> i64 {
        Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn absent_inputs_produce_no_fragment() {
        assert_eq!(by_name(None), None);
        assert_eq!(by_speed_range(None, None), None);
        assert_eq!(by_date_range(None, None).unwrap(), None);
        assert_eq!(by_usage(None), None);
    }

    #[test]
    fn empty_filter_selects_everything() {
        let predicate = ShipFilter::default().to_predicate().unwrap();
        assert!(predicate.is_unconstrained());
        assert_eq!(ids(&predicate), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn name_match_is_case_sensitive_contains() {
        assert_eq!(ids(&by_name(Some("Orion")).unwrap()), vec![1, 2]);
        assert_eq!(ids(&by_name(Some("rio")).unwrap()), vec![1, 2, 5]);
    }

    #[test]
    fn range_bounds_are_inclusive_and_independent() {
        assert_eq!(ids(&by_crew_size_range(Some(50), Some(5000)).unwrap()), vec![2, 3, 4]);
        assert_eq!(ids(&by_crew_size_range(None, Some(50)).unwrap()), vec![1, 2]);
        assert_eq!(ids(&by_crew_size_range(Some(5000), None).unwrap()), vec![4, 5]);
    }

    #[test]
    fn usage_flag_both_ways() {
        assert_eq!(ids(&by_usage(Some(true)).unwrap()), vec![2, 4]);
        assert_eq!(ids(&by_usage(Some(false)).unwrap()), vec![1, 3, 5]);
    }

    #[test]
    fn open_date_range_combined_with_speed() {
        let predicate = Predicate::all([
            by_date_range(None, Some(millis(2950))).unwrap(),
            by_speed_range(Some(Decimal::new(2, 1)), Some(Decimal::new(8, 1))),
        ]);
        // speed 0.2..=0.8 and built no later than 2950-01-01
        assert_eq!(ids(&predicate), vec![2, 3]);
    }

    #[test]
    fn combination_order_does_not_matter() {
        let mut fragments = vec![
            by_usage(Some(false)),
            by_rating_range(Some(Decimal::new(10, 2)), None),
            by_ship_type(Some(ShipType::Military)),
            by_date_range(Some(millis(2800)), None).unwrap(),
            None,
        ];
        let expected = ids(&Predicate::all(fragments.clone()));
        let mut rng = rand::thread_rng();
        for _ in 0..10 {
            fragments.shuffle(&mut rng);
            assert_eq!(ids(&Predicate::all(fragments.clone())), expected);
        }
        assert_eq!(expected, vec![1, 3, 5]);
    }

    #[test]
    fn nested_conjunctions_flatten() {
        let left = by_name(Some("Orion")).unwrap().and(by_usage(Some(true)).unwrap());
        let combined = left.and(Predicate::any());
        match &combined {
            Predicate::All(parts) => assert_eq!(parts.len(), 2),
            other => panic!("expected conjunction, got {other:?}"),
        }
        assert_eq!(ids(&combined), vec![2]);
    }

    #[test]
    fn unrepresentable_timestamp_is_a_bad_request() {
        let err = by_date_range(Some(i64::MAX), None).unwrap_err();
        assert!(matches!(err, CatalogError::BadRequest(_)));
    }

    #[test]
    fn bounds_older_than_the_database_can_store_are_bad_requests() {
        // chrono represents this, Postgres timestamptz does not
        let too_early = EARLIEST_TIMESTAMP_MILLIS - 1;
        assert!(DateTime::from_timestamp_millis(too_early).is_some());
        assert!(matches!(
            by_date_range(Some(too_early), None),
            Err(CatalogError::BadRequest(_))
        ));
        assert!(matches!(
            by_date_range(None, Some(too_early)),
            Err(CatalogError::BadRequest(_))
        ));

        let earliest = by_date_range(Some(EARLIEST_TIMESTAMP_MILLIS), None)
            .unwrap()
            .unwrap();
        assert_eq!(ids(&earliest), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn planet_match_is_case_sensitive_contains() {
        let planets = ["Earth", "Mars", "New Earth", "earthling", "Venus"];
        let ships: Vec<Ship> = fleet()
            .into_iter()
            .zip(planets)
            .map(|(s, planet)| Ship {
                planet: planet.to_string(),
                ..s
            })
            .collect();
        let matching = |needle: &str| -> Vec<i64> {
            let predicate = by_planet(Some(needle)).unwrap();
            ships
                .iter()
                .filter(|s| predicate.matches(s))
                .map(|s| s.id)
                .collect()
        };

        assert_eq!(matching("Earth"), vec![1, 3]);
        assert_eq!(matching("earth"), vec![4]);
        assert_eq!(matching("ar"), vec![1, 2, 3, 4]);
        assert!(matching("EARTH").is_empty());
    }

    #[test]
    fn ship_type_is_an_exact_match() {
        assert_eq!(ids(&by_ship_type(Some(ShipType::Merchant)).unwrap()), vec![2, 4]);
        assert_eq!(ids(&by_ship_type(Some(ShipType::Military)).unwrap()), vec![1, 3, 5]);
        assert!(ids(&by_ship_type(Some(ShipType::Transport)).unwrap()).is_empty());
        assert_eq!(by_ship_type(None), None);
    }

    #[test]
    fn rating_bounds_are_inclusive_at_both_ends() {
        // ratings are 0.10, 0.20, 0.30, 0.40, 0.50
        let both = by_rating_range(Some(Decimal::new(20, 2)), Some(Decimal::new(40, 2)));
        assert_eq!(ids(&both.unwrap()), vec![2, 3, 4]);

        let exact = by_rating_range(Some(Decimal::new(30, 2)), Some(Decimal::new(30, 2)));
        assert_eq!(ids(&exact.unwrap()), vec![3]);

        let upper = by_rating_range(None, Some(Decimal::new(20, 2)));
        assert_eq!(ids(&upper.unwrap()), vec![1, 2]);
    }

    #[test]
    fn closed_date_range_includes_both_ends() {
        let predicate = by_date_range(Some(millis(2900)), Some(millis(3000)))
            .unwrap()
            .unwrap();
        assert!(matches!(predicate, Predicate::ProductionDate(Range::Between(_, _))));
        assert_eq!(ids(&predicate), vec![2, 3, 4]);

        let single_day = by_date_range(Some(millis(2950)), Some(millis(2950)))
            .unwrap()
            .unwrap();
        assert_eq!(ids(&single_day), vec![3]);
    }
}
