#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_raw_string_hashes)]
#![allow(clippy::uninlined_format_args)]

extern crate sqlx_core as sqlx;

#[cfg(feature = "postgres")]
use sqlx_core::pool::{Pool, PoolOptions};
#[cfg(feature = "postgres")]
use sqlx_core::row::Row;
#[cfg(feature = "postgres")]
use sqlx_postgres::{PgConnectOptions, Postgres};
#[cfg(feature = "postgres")]
use std::str::FromStr;

mod database_url;
#[cfg(feature = "postgres")]
pub mod repo;
#[cfg(feature = "postgres")]
pub mod seed;

pub use database_url::{normalize_database_url, redact_database_url};

#[cfg(feature = "postgres")]
pub type PgPool = Pool<Postgres>;

#[cfg(feature = "postgres")]
pub async fn connect_postgres(path: &str) -> Result<PgPool, sqlx_core::Error> {
    connect_postgres_with_max(path, 10).await
}

#[cfg(feature = "postgres")]
pub async fn connect_postgres_with_max(
    path: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx_core::Error> {
    let options = PgConnectOptions::from_str(&normalize_database_url(path))?;
    PoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

#[cfg(feature = "postgres")]
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx_core::migrate::MigrateError> {
    sqlx_macros::migrate!("../doctrack-server/migrations")
        .run(pool)
        .await
}

#[cfg(feature = "postgres")]
pub async fn ping(pool: &PgPool) -> Result<(), sqlx_core::Error> {
    sqlx_core::query::query::<Postgres>("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
}

/// Row counts reported after migrations.
#[cfg(feature = "postgres")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCounts {
    pub documents: i64,
    pub users: i64,
}

#[cfg(feature = "postgres")]
pub async fn table_counts(pool: &PgPool) -> Result<TableCounts, sqlx_core::Error> {
    let row = sqlx_core::query::query::<Postgres>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM documents) AS documents,
            (SELECT COUNT(*) FROM users) AS users
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(TableCounts {
        documents: row.try_get("documents")?,
        users: row.try_get("users")?,
    })
}
