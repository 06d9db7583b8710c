use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::path::Path;
use std::str::FromStr;

mod error;
mod itineraries;
mod messages;
mod models;
mod schema;
mod trips;
mod users;

pub use error::{DbError, DbResult};
pub use models::*;
pub use schema::DEMO_TRIP_ID;

/// Upper bound on messages returned by a history read.
pub const MESSAGE_HISTORY_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        // Ensure the directory exists for file-backed databases
        if let Some(path) = sqlite_file_path(url) {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Fresh private database with the schema applied. Every connection to
    /// `:memory:` is its own database, so the pool is pinned to one
    /// connection that never expires.
    #[cfg(test)]
    pub async fn in_memory() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .unwrap();
        let db = Self { pool };
        db.run_migrations().await.unwrap();
        db
    }
}

/// Current time in the format every timestamp column uses.
fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn sqlite_file_path(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" || path == "memory" {
        None
    } else {
        Some(path)
    }
}
