use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use thiserror::Error;

use crate::config::PostgresConfig;

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Normalized listing record. Field order is load-bearing: it is the
/// positional binding order of the 11-column insert into listing.home.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingRow {
    pub title: Option<String>,
    pub price: i64,
    pub location: Option<String>,
    pub bedroom_count: Option<String>,
    pub size: Option<String>,
    pub date_posted: Option<String>,
    pub attributes: String,
    pub images: String,
    pub description: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// Persistence failures, classified for the log sink.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("connection failure: {0}")]
    Connection(sqlx::Error),
    #[error("constraint violation: {0}")]
    Constraint(sqlx::Error),
    #[error("timeout: {0}")]
    Timeout(sqlx::Error),
    #[error("{0}")]
    Other(sqlx::Error),
}

impl From<sqlx::Error> for PersistError {
    fn from(e: sqlx::Error) -> Self {
        let constraint = matches!(
            &e,
            sqlx::Error::Database(db)
                if db.is_unique_violation()
                    || db.is_foreign_key_violation()
                    || db.is_check_violation()
        );
        if constraint {
            return Self::Constraint(e);
        }
        match &e {
            sqlx::Error::PoolTimedOut => Self::Timeout(e),
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolClosed
            | sqlx::Error::Configuration(_) => Self::Connection(e),
            _ => Self::Other(e),
        }
    }
}

/// Build the connection pool without opening a connection; connections are
/// established on first acquire and released on every exit path.
pub fn connect_lazy(cfg: &PostgresConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy(&cfg.url())?;
    Ok(pool)
}

pub async fn init_schema(pool: &PgPool) -> Result<()> {
    sqlx::query("CREATE SCHEMA IF NOT EXISTS listing")
        .execute(pool)
        .await?;
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS listing.home (
            id            BIGSERIAL PRIMARY KEY,
            title         TEXT,
            price         BIGINT NOT NULL DEFAULT 0,
            "location"    TEXT,
            bedroom_count TEXT,
            "size"        TEXT,
            date_posted   TEXT,
            "attributes"  TEXT NOT NULL DEFAULT '[]',
            images        TEXT NOT NULL DEFAULT '[]',
            description   TEXT,
            latitude      TEXT,
            longitude     TEXT,
            scraped_at    TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_home_date_posted ON listing.home (date_posted)")
        .execute(pool)
        .await?;
    Ok(())
}

const INSERT_LISTING: &str = r#"
INSERT INTO listing.home
    (title, price, "location", bedroom_count, "size", date_posted,
     "attributes", images, description, latitude, longitude)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
"#;

/// Insert one normalized listing, one row per call. Dedup is the store's
/// concern; this layer assigns no identity.
pub async fn insert_listing(pool: &PgPool, row: &ListingRow) -> Result<(), PersistError> {
    sqlx::query(INSERT_LISTING)
        .bind(&row.title)
        .bind(row.price)
        .bind(&row.location)
        .bind(&row.bedroom_count)
        .bind(&row.size)
        .bind(&row.date_posted)
        .bind(&row.attributes)
        .bind(&row.images)
        .bind(&row.description)
        .bind(&row.latitude)
        .bind(&row.longitude)
        .execute(pool)
        .await?;
    Ok(())
}

pub struct Stats {
    pub total: i64,
    pub priced: i64,
    pub dated: i64,
    pub geocoded: i64,
}

pub async fn get_stats(pool: &PgPool) -> Result<Stats> {
    let row = sqlx::query(
        "SELECT COUNT(*),
                COUNT(*) FILTER (WHERE price > 0),
                COUNT(date_posted),
                COUNT(latitude)
         FROM listing.home",
    )
    .fetch_one(pool)
    .await?;
    Ok(Stats {
        total: row.get(0),
        priced: row.get(1),
        dated: row.get(2),
        geocoded: row.get(3),
    })
}
