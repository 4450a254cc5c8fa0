//! Conversions from external infrastructure errors into domain errors.

use rusqlite::Error as SqlError;
use tally_domain::TallyError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TallyError);

impl From<InfraError> for TallyError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TallyError> for InfraError {
    fn from(value: TallyError) -> Self {
        Self(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoTallyError {
    fn into_tally(self) -> TallyError;
}

/// Name of the partial unique index guarding one active entry per user.
pub const ACTIVE_ENTRY_INDEX: &str = "idx_time_entries_one_active";

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → TallyError */
/* -------------------------------------------------------------------------- */

impl IntoTallyError for SqlError {
    fn into_tally(self) -> TallyError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => TallyError::Database("database is busy".into()),
                    (ErrorCode::DatabaseLocked, _) => {
                        TallyError::Database("database is locked".into())
                    }
                    // SQLite reports partial-index violations with the indexed
                    // columns, not the index name.
                    (ErrorCode::ConstraintViolation, 2067)
                        if message.contains("time_entries.user_id")
                            || message.contains(ACTIVE_ENTRY_INDEX) =>
                    {
                        TallyError::AlreadyRunning
                    }
                    (ErrorCode::ConstraintViolation, 2067 | 1555) => {
                        TallyError::Database(format!("unique constraint violation: {message}"))
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        TallyError::Database("foreign key constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 275) => {
                        TallyError::Database(format!("check constraint violation: {message}"))
                    }
                    _ => TallyError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => TallyError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                TallyError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                TallyError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => TallyError::Database("invalid UTF-8 returned from sqlite".into()),
            RE::InvalidParameterName(parameter_name) => {
                TallyError::Database(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => TallyError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            RE::InvalidQuery => TallyError::Database("invalid SQL query".into()),
            other => TallyError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        Self(value.into_tally())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → TallyError */
/* -------------------------------------------------------------------------- */

impl IntoTallyError for r2d2::Error {
    fn into_tally(self) -> TallyError {
        TallyError::Database(format!("connection pool error: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        Self(value.into_tally())
    }
}

/* -------------------------------------------------------------------------- */
/* tokio::task::JoinError → TallyError */
/* -------------------------------------------------------------------------- */

impl IntoTallyError for tokio::task::JoinError {
    fn into_tally(self) -> TallyError {
        if self.is_cancelled() {
            TallyError::Internal("blocking database task cancelled".into())
        } else {
            TallyError::Internal(format!("blocking database task failed: {self}"))
        }
    }
}

impl From<tokio::task::JoinError> for InfraError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self(value.into_tally())
    }
}

/* -------------------------------------------------------------------------- */
/* serde / toml → TallyError */
/* -------------------------------------------------------------------------- */

impl IntoTallyError for toml::de::Error {
    fn into_tally(self) -> TallyError {
        TallyError::Config(format!("invalid TOML configuration: {}", self.message()))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        Self(value.into_tally())
    }
}

impl IntoTallyError for serde_json::Error {
    fn into_tally(self) -> TallyError {
        TallyError::Config(format!("invalid JSON configuration: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        Self(value.into_tally())
    }
}
