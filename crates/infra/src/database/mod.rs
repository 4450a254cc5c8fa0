//! SQLite persistence for entries and projects

pub mod entry_repository;
pub mod manager;
pub mod pool;
pub mod project_repository;

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
pub use entry_repository::SqliteEntryRepository;
pub use manager::DbManager;
pub use pool::{create_pool, PoolConfig, SqliteConnection, SqlitePool};
pub use project_repository::SqliteProjectRepository;
use rusqlite::Connection;
use tally_domain::{Result, TallyError};
use tokio::task;

use crate::errors::InfraError;

/// Run blocking SQLite work on the tokio blocking pool.
pub(crate) async fn with_connection<T, F>(db: &Arc<DbManager>, op: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
{
    let db = Arc::clone(db);
    task::spawn_blocking(move || {
        let mut conn = db.get_connection()?;
        op(&mut conn)
    })
    .await
    .map_err(|err| TallyError::from(InfraError::from(err)))?
}

pub(crate) const fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) const fn int_to_bool(value: i64) -> bool {
    value != 0
}

pub(crate) fn datetime_from_millis(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| TallyError::Database(format!("timestamp out of range: {millis}")))
}

/// Parse a stored text column, reporting the column on failure.
pub(crate) fn parse_column<T: FromStr>(column: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| TallyError::Database(format!("invalid value in {column}: {raw}")))
}
