//! SQLite connection pool helpers
//!
//! Builds an r2d2 pool whose connections all carry the same pragmas.

use std::path::Path;
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use tally_domain::{Result as DomainResult, TallyError};
use tracing::warn;

use crate::errors::InfraError;

/// Pool of SQLite connections
pub type SqlitePool = Pool<SqliteConnectionManager>;

/// Pooled SQLite connection
pub type SqliteConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Pool tuning knobs
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_size: u32,
    pub connection_timeout: Duration,
    pub busy_timeout: Duration,
    pub enable_wal: bool,
    pub enable_foreign_keys: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: 4,
            connection_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(5),
            enable_wal: true,
            enable_foreign_keys: true,
        }
    }
}

/// Create a pool over the database file at `path`.
pub fn create_pool<P: AsRef<Path>>(path: P, config: &PoolConfig) -> DomainResult<SqlitePool> {
    let pragmas = config.clone();
    let manager = SqliteConnectionManager::file(path.as_ref())
        .with_init(move |conn| apply_connection_pragmas(conn, &pragmas));

    Pool::builder()
        .max_size(config.max_size.max(1))
        .connection_timeout(config.connection_timeout)
        .build(manager)
        .map_err(|err| {
            warn!(error = %err, "Failed to create connection pool");
            TallyError::from(InfraError::from(err))
        })
}

/// Apply connection-level pragmas
///
/// - WAL mode for concurrent readers alongside the writer
/// - NORMAL synchronous mode
/// - Foreign key constraints enabled
/// - Busy timeout for lock contention
pub fn apply_connection_pragmas(conn: &Connection, config: &PoolConfig) -> rusqlite::Result<()> {
    let mut pragma_sql = String::new();

    if config.enable_wal {
        pragma_sql.push_str("PRAGMA journal_mode=WAL;\n");
        pragma_sql.push_str("PRAGMA wal_autocheckpoint=1000;\n");
    }
    pragma_sql.push_str("PRAGMA synchronous=NORMAL;\n");
    if config.enable_foreign_keys {
        pragma_sql.push_str("PRAGMA foreign_keys=ON;\n");
    }

    conn.execute_batch(&pragma_sql)?;
    conn.busy_timeout(config.busy_timeout)
}
