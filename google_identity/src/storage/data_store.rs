//! Relational store selection and connection handling
//!
//! The backing database is chosen once per process from
//! `GENERIC_DATA_STORE_TYPE` / `GENERIC_DATA_STORE_URL`; per-table modules
//! branch on the concrete pool through the [`DataStore`] accessors.

use std::{env, str::FromStr, sync::LazyLock};

use sqlx::{PgPool, Pool, Postgres, Sqlite, SqlitePool};
use tokio::sync::Mutex;

pub trait DataStore: Send + Sync {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>>;
    fn as_postgres(&self) -> Option<&Pool<Postgres>>;
}

#[derive(Clone, Debug)]
struct SqliteDataStore {
    pool: SqlitePool,
}

impl DataStore for SqliteDataStore {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        Some(&self.pool)
    }

    fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        None
    }
}

#[derive(Clone, Debug)]
struct PostgresDataStore {
    pool: PgPool,
}

impl DataStore for PostgresDataStore {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        None
    }

    fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        Some(&self.pool)
    }
}

// Connections are created lazily; a bad URL only shows up on first use,
// a missing one panics at startup.
fn connect(store_type: &str, store_url: &str) -> Box<dyn DataStore> {
    match store_type {
        "sqlite" => {
            let opts = sqlx::sqlite::SqliteConnectOptions::from_str(store_url)
                .expect("Failed to parse SQLite connection string")
                .create_if_missing(true);

            Box::new(SqliteDataStore {
                pool: SqlitePool::connect_lazy_with(opts),
            })
        }
        "postgres" => Box::new(PostgresDataStore {
            pool: PgPool::connect_lazy(store_url).expect("Failed to create Postgres pool"),
        }),
        t => panic!(
            "Unsupported store type: {}. Supported types are 'sqlite' and 'postgres'",
            t
        ),
    }
}

pub(crate) static GENERIC_DATA_STORE: LazyLock<Mutex<Box<dyn DataStore>>> = LazyLock::new(|| {
    let store_type =
        env::var("GENERIC_DATA_STORE_TYPE").expect("GENERIC_DATA_STORE_TYPE must be set");
    let store_url = env::var("GENERIC_DATA_STORE_URL").expect("GENERIC_DATA_STORE_URL must be set");

    tracing::info!(
        "Initializing data store with type: {}, url: {}",
        store_type,
        store_url
    );

    Mutex::new(connect(&store_type, &store_url))
});

/// Table prefix from environment variable
pub(crate) static DB_TABLE_PREFIX: LazyLock<String> =
    LazyLock::new(|| env::var("DB_TABLE_PREFIX").unwrap_or_else(|_| "gid_".to_string()));
