//! Centralized configuration (environment variables + defaults).

use anyhow::Context;
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Database URL (optional). Without it the service keeps records in memory.
pub fn database_url() -> Option<String> {
    std::env::var("DATABASE_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Connection pool size (`DB_MAX_CONNECTIONS`, default 5, at least 1).
pub fn db_max_connections() -> anyhow::Result<u32> {
    let v = parse_or(
        "DB_MAX_CONNECTIONS",
        std::env::var("DB_MAX_CONNECTIONS").ok(),
        DEFAULT_DB_MAX_CONNECTIONS,
    )?;
    Ok(v.max(1))
}

/// Listen address (`BIND_ADDR`, default `0.0.0.0:3000`).
pub fn bind_addr() -> anyhow::Result<SocketAddr> {
    let raw = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    raw.parse::<SocketAddr>()
        .with_context(|| format!("BIND_ADDR must be a socket address, got '{raw}'"))
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(v) => v
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{name} must be a valid {}: {e}", std::any::type_name::<T>())),
    }
}
