//! PostgreSQL record store.
//!
//! Ships live in a single `ships` table. Predicates are translated into a
//! `WHERE` clause with bound parameters; nothing from the request is ever
//! spliced into the SQL text.

use crate::domain::ship::{Listing, NewShip, Page, PageRequest, Predicate, Range, Ship, ShipType};
use crate::storage::RecordStore;
use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

pub const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS ships (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(50) NOT NULL,
    planet VARCHAR(50) NOT NULL,
    ship_type TEXT NOT NULL,
    production_date TIMESTAMPTZ NOT NULL,
    is_used BOOLEAN NOT NULL DEFAULT FALSE,
    speed NUMERIC NOT NULL,
    crew_size INTEGER NOT NULL,
    rating NUMERIC(10, 2) NOT NULL
)";

const COLUMNS: &str =
    "id, name, planet, ship_type, production_date, is_used, speed, crew_size, rating";

#[derive(Clone)]
pub struct PgShipStore {
    pool: PgPool,
}

impl PgShipStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("failed to connect to postgres")?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `ships` table if it is missing.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn count_all(&self) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ships")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn ship_from_row(row: &PgRow) -> anyhow::Result<Ship> {
    let ship_type: String = row.try_get("ship_type")?;
    Ok(Ship {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        planet: row.try_get("planet")?,
        ship_type: ship_type.parse::<ShipType>()?,
        production_date: row.try_get("production_date")?,
        is_used: row.try_get("is_used")?,
        speed: row.try_get("speed")?,
        crew_size: row.try_get("crew_size")?,
        rating: row.try_get("rating")?,
    })
}

fn push_range<'args, T>(qb: &mut QueryBuilder<'args, Postgres>, column: &str, range: &Range<T>)
where
    T: Clone + Send + sqlx::Type<Postgres> + sqlx::Encode<'args, Postgres> + 'args,
{
    match range {
        Range::AtLeast(min) => {
            qb.push(column).push(" >= ").push_bind(min.clone());
        }
        Range::AtMost(max) => {
            qb.push(column).push(" <= ").push_bind(max.clone());
        }
        Range::Between(min, max) => {
            qb.push(column)
                .push(" BETWEEN ")
                .push_bind(min.clone())
                .push(" AND ")
                .push_bind(max.clone());
        }
    }
}

/// Appends `predicate` as a boolean SQL expression.
pub fn push_predicate(qb: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    match predicate {
        // strpos is case-sensitive and treats `%`/`_` literally, unlike LIKE.
        Predicate::NameContains(needle) => {
            qb.push("strpos(name, ").push_bind(needle.clone()).push(") > 0");
        }
        Predicate::PlanetContains(needle) => {
            qb.push("strpos(planet, ").push_bind(needle.clone()).push(") > 0");
        }
        Predicate::ShipTypeIs(ship_type) => {
            qb.push("ship_type = ").push_bind(ship_type.as_str());
        }
        Predicate::ProductionDate(range) => push_range(qb, "production_date", range),
        Predicate::Speed(range) => push_range(qb, "speed", range),
        Predicate::CrewSize(range) => push_range(qb, "crew_size", range),
        Predicate::Rating(range) => push_range(qb, "rating", range),
        Predicate::Usage(is_used) => {
            qb.push("is_used = ").push_bind(*is_used);
        }
        Predicate::All(parts) if parts.is_empty() => {
            qb.push("TRUE");
        }
        Predicate::All(parts) => {
            qb.push("(");
            for (idx, part) in parts.iter().enumerate() {
                if idx > 0 {
                    qb.push(" AND ");
                }
                push_predicate(qb, part);
            }
            qb.push(")");
        }
    }
}

fn filtered(select: &str, predicate: &Predicate) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(select);
    qb.push(" FROM ships WHERE ");
    push_predicate(&mut qb, predicate);
    qb
}

#[async_trait]
impl RecordStore for PgShipStore {
    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn exists_by_id(&self, id: i64) -> anyhow::Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM ships WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Ship>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM ships WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(ship_from_row).transpose()
    }

    async fn save(&self, ship: Ship) -> anyhow::Result<Ship> {
        let row = sqlx::query(&format!(
            "UPDATE ships SET name = $2, planet = $3, ship_type = $4, production_date = $5,
                 is_used = $6, speed = $7, crew_size = $8, rating = $9
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(ship.id)
        .bind(&ship.name)
        .bind(&ship.planet)
        .bind(ship.ship_type.as_str())
        .bind(ship.production_date)
        .bind(ship.is_used)
        .bind(ship.speed)
        .bind(ship.crew_size)
        .bind(ship.rating)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => ship_from_row(&row),
            None => Err(anyhow::anyhow!("ship {} does not exist", ship.id)),
        }
    }

    async fn save_new(&self, ship: NewShip) -> anyhow::Result<Ship> {
        let fields = &ship.fields;
        let row = sqlx::query(&format!(
            "INSERT INTO ships (name, planet, ship_type, production_date, is_used, speed, crew_size, rating)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        ))
        .bind(&fields.name)
        .bind(&fields.planet)
        .bind(fields.ship_type.as_str())
        .bind(fields.production_date)
        .bind(fields.is_used)
        .bind(fields.speed)
        .bind(fields.crew_size)
        .bind(ship.rating)
        .fetch_one(&self.pool)
        .await?;
        ship_from_row(&row)
    }

    async fn delete_by_id(&self, id: i64) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM ships WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn query(
        &self,
        predicate: &Predicate,
        page: Option<PageRequest>,
    ) -> anyhow::Result<Listing> {
        let Some(request) = page else {
            let mut qb = filtered(&format!("SELECT {COLUMNS}"), predicate);
            qb.push(" ORDER BY id ASC");
            let rows = qb.build().fetch_all(&self.pool).await?;
            let ships = rows.iter().map(ship_from_row).collect::<anyhow::Result<Vec<_>>>()?;
            return Ok(Listing::All(ships));
        };

        let mut count_qb = filtered("SELECT COUNT(*)", predicate);
        let total = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut qb = filtered(&format!("SELECT {COLUMNS}"), predicate);
        qb.push(" ORDER BY ")
            .push(request.order.column())
            .push(" ASC, id ASC LIMIT ")
            .push_bind(i64::from(request.page_size))
            .push(" OFFSET ")
            .push_bind(i64::try_from(request.offset()).unwrap_or(i64::MAX));
        let rows = qb.build().fetch_all(&self.pool).await?;
        let ships = rows.iter().map(ship_from_row).collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Listing::Page(Page::new(ships, &request, total.max(0) as u64)))
    }
}
