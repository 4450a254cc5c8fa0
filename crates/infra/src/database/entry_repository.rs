//! SQLite-backed time entry store.
//!
//! Implements the async `EntryStore` port. Every call runs its blocking
//! SQLite work on the tokio blocking pool with a connection from the shared
//! `DbManager`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, OptionalExtension, Row, ToSql};
use tally_core::entries::ports::EntryStore;
use tally_domain::{
    EntryId, EntryQuery, EntryState, ProjectId, Result as DomainResult, SortOrder, TallyError,
    TimeEntry, UserId,
};
use tracing::debug;

use super::manager::{map_sql_error, DbManager};
use super::{bool_to_int, datetime_from_millis, int_to_bool, parse_column, with_connection};

/// Entry store backed by the `time_entries` table
pub struct SqliteEntryRepository {
    db: Arc<DbManager>,
}

impl SqliteEntryRepository {
    /// Construct a repository backed by the shared database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntryStore for SqliteEntryRepository {
    async fn find_active_entry(&self, user_id: &UserId) -> DomainResult<Option<TimeEntry>> {
        let user_id = user_id.clone();
        with_connection(&self.db, move |conn| {
            let sql = format!("{SELECT_ENTRY} WHERE user_id = ?1 AND end_time IS NULL");
            let params: [&dyn ToSql; 1] = [&user_id.as_str()];
            conn.query_row(&sql, params.as_slice(), EntryRow::from_row)
                .optional()
                .map_err(map_sql_error)?
                .map(TimeEntry::try_from)
                .transpose()
        })
        .await
    }

    async fn create_entry(&self, entry: &TimeEntry) -> DomainResult<EntryId> {
        let entry = entry.clone();
        with_connection(&self.db, move |conn| {
            let row = EntryRow::from(&entry);
            conn.execute(INSERT_ENTRY_SQL, row.params().as_slice()).map_err(map_sql_error)?;
            debug!(entry_id = %entry.id, user_id = %entry.user_id, "time entry inserted");
            Ok(entry.id)
        })
        .await
    }

    async fn update_entry(&self, entry: &TimeEntry) -> DomainResult<()> {
        let entry = entry.clone();
        with_connection(&self.db, move |conn| {
            let row = EntryRow::from(&entry);
            let changed =
                conn.execute(UPDATE_ENTRY_SQL, row.params().as_slice()).map_err(map_sql_error)?;
            if changed == 0 {
                return Err(TallyError::NotFound(format!("entry {}", entry.id)));
            }
            Ok(())
        })
        .await
    }

    async fn find_entry(
        &self,
        user_id: &UserId,
        entry_id: EntryId,
    ) -> DomainResult<Option<TimeEntry>> {
        let user_id = user_id.clone();
        with_connection(&self.db, move |conn| {
            let sql = format!("{SELECT_ENTRY} WHERE id = ?1 AND user_id = ?2");
            let id = entry_id.to_string();
            let params: [&dyn ToSql; 2] = [&id, &user_id.as_str()];
            conn.query_row(&sql, params.as_slice(), EntryRow::from_row)
                .optional()
                .map_err(map_sql_error)?
                .map(TimeEntry::try_from)
                .transpose()
        })
        .await
    }

    async fn query_entries(&self, query: &EntryQuery) -> DomainResult<Vec<TimeEntry>> {
        let query = query.clone();
        with_connection(&self.db, move |conn| {
            let (sql, values) = build_query(&query);
            let mut stmt = conn.prepare(&sql).map_err(map_sql_error)?;
            let rows = stmt
                .query_map(params_from_iter(values.iter()), EntryRow::from_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            rows.into_iter().map(TimeEntry::try_from).collect()
        })
        .await
    }

    async fn set_archived(
        &self,
        user_id: &UserId,
        ids: &[EntryId],
        archived: bool,
    ) -> DomainResult<usize> {
        let user_id = user_id.clone();
        let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
        with_connection(&self.db, move |conn| {
            let tx = conn.transaction().map_err(map_sql_error)?;
            let mut changed = 0;
            {
                let mut stmt = tx
                    .prepare(
                        "UPDATE time_entries SET is_archived = ?1
                         WHERE id = ?2 AND user_id = ?3 AND is_archived != ?1",
                    )
                    .map_err(map_sql_error)?;
                let flag = bool_to_int(archived);
                for id in &ids {
                    let params: [&dyn ToSql; 3] = [&flag, id, &user_id.as_str()];
                    changed += stmt.execute(params.as_slice()).map_err(map_sql_error)?;
                }
            }
            tx.commit().map_err(map_sql_error)?;
            Ok(changed)
        })
        .await
    }

    async fn set_project_entries_archived(
        &self,
        user_id: &UserId,
        project_id: ProjectId,
        archived: bool,
    ) -> DomainResult<usize> {
        let user_id = user_id.clone();
        with_connection(&self.db, move |conn| {
            let flag = bool_to_int(archived);
            let project = project_id.to_string();
            let params: [&dyn ToSql; 3] = [&flag, &project, &user_id.as_str()];
            conn.execute(
                "UPDATE time_entries SET is_archived = ?1
                 WHERE project_id = ?2 AND user_id = ?3 AND is_archived != ?1",
                params.as_slice(),
            )
            .map_err(map_sql_error)
        })
        .await
    }
}

const ENTRY_COLUMNS: &str = "id, user_id, project_id, title, description, notes, category,
        start_time, end_time, paused_ms, is_paused, last_pause_time, origin, was_edited,
        is_archived, created_at, updated_at";

const SELECT_ENTRY: &str = "SELECT id, user_id, project_id, title, description, notes, category,
        start_time, end_time, paused_ms, is_paused, last_pause_time, origin, was_edited,
        is_archived, created_at, updated_at
    FROM time_entries";

const INSERT_ENTRY_SQL: &str = "INSERT INTO time_entries (
        id, user_id, project_id, title, description, notes, category,
        start_time, end_time, paused_ms, is_paused, last_pause_time, origin, was_edited,
        is_archived, created_at, updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)";

const UPDATE_ENTRY_SQL: &str = "UPDATE time_entries SET
        project_id = ?3, title = ?4, description = ?5, notes = ?6, category = ?7,
        start_time = ?8, end_time = ?9, paused_ms = ?10, is_paused = ?11,
        last_pause_time = ?12, origin = ?13, was_edited = ?14, is_archived = ?15,
        created_at = ?16, updated_at = ?17
    WHERE id = ?1 AND user_id = ?2";

/// Build the filtered SELECT for an [`EntryQuery`] with positional values.
fn build_query(query: &EntryQuery) -> (String, Vec<Value>) {
    let mut clauses = vec!["user_id = ?".to_string()];
    let mut values = vec![Value::Text(query.user_id.as_str().to_string())];

    if let Some(from) = query.from {
        clauses.push("(end_time IS NULL OR end_time > ?)".into());
        values.push(Value::Integer(from.timestamp_millis()));
    }
    if let Some(to) = query.to {
        clauses.push("start_time < ?".into());
        values.push(Value::Integer(to.timestamp_millis()));
    }
    if let Some(project_id) = query.project_id {
        clauses.push("project_id = ?".into());
        values.push(Value::Text(project_id.to_string()));
    }
    if let Some(category) = query.category {
        clauses.push("category = ?".into());
        values.push(Value::Text(category.as_str().to_string()));
    }
    if !query.include_archived {
        clauses.push("is_archived = 0".into());
    }
    if query.closed_only {
        clauses.push("end_time IS NOT NULL".into());
    }

    let order = match query.order {
        SortOrder::Ascending => "ASC",
        SortOrder::Descending => "DESC",
    };
    let mut sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM time_entries WHERE {} ORDER BY start_time {order}, id {order}",
        clauses.join(" AND ")
    );
    if let Some(limit) = query.limit {
        sql.push_str(" LIMIT ?");
        values.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
    }
    (sql, values)
}

/// Flat column representation of a [`TimeEntry`]
struct EntryRow {
    id: String,
    user_id: String,
    project_id: Option<String>,
    title: String,
    description: String,
    notes: String,
    category: String,
    start_time: i64,
    end_time: Option<i64>,
    paused_ms: i64,
    is_paused: i64,
    last_pause_time: Option<i64>,
    origin: String,
    was_edited: i64,
    is_archived: i64,
    created_at: i64,
    updated_at: i64,
}

impl EntryRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            project_id: row.get(2)?,
            title: row.get(3)?,
            description: row.get(4)?,
            notes: row.get(5)?,
            category: row.get(6)?,
            start_time: row.get(7)?,
            end_time: row.get(8)?,
            paused_ms: row.get(9)?,
            is_paused: row.get(10)?,
            last_pause_time: row.get(11)?,
            origin: row.get(12)?,
            was_edited: row.get(13)?,
            is_archived: row.get(14)?,
            created_at: row.get(15)?,
            updated_at: row.get(16)?,
        })
    }

    fn params(&self) -> [&dyn ToSql; 17] {
        [
            &self.id,
            &self.user_id,
            &self.project_id,
            &self.title,
            &self.description,
            &self.notes,
            &self.category,
            &self.start_time,
            &self.end_time,
            &self.paused_ms,
            &self.is_paused,
            &self.last_pause_time,
            &self.origin,
            &self.was_edited,
            &self.is_archived,
            &self.created_at,
            &self.updated_at,
        ]
    }
}

impl From<&TimeEntry> for EntryRow {
    fn from(entry: &TimeEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            user_id: entry.user_id.as_str().to_string(),
            project_id: entry.project_id.map(|id| id.to_string()),
            title: entry.title.clone(),
            description: entry.description.clone(),
            notes: entry.notes.clone(),
            category: entry.category.as_str().to_string(),
            start_time: entry.start_time.timestamp_millis(),
            end_time: entry.end_time().map(|t| t.timestamp_millis()),
            paused_ms: entry.paused_duration.num_milliseconds(),
            is_paused: bool_to_int(entry.is_paused()),
            last_pause_time: entry.last_pause_time().map(|t| t.timestamp_millis()),
            origin: entry.origin.as_str().to_string(),
            was_edited: bool_to_int(entry.was_edited),
            is_archived: bool_to_int(entry.is_archived),
            created_at: entry.created_at.timestamp_millis(),
            updated_at: entry.updated_at.timestamp_millis(),
        }
    }
}

impl TryFrom<EntryRow> for TimeEntry {
    type Error = TallyError;

    fn try_from(row: EntryRow) -> DomainResult<Self> {
        let end_time = row.end_time.map(datetime_from_millis).transpose()?;
        let last_pause_time = row.last_pause_time.map(datetime_from_millis).transpose()?;
        let state = EntryState::from_parts(end_time, int_to_bool(row.is_paused), last_pause_time)?;

        Ok(Self {
            id: parse_column("time_entries.id", &row.id)?,
            user_id: UserId::from(row.user_id),
            project_id: row
                .project_id
                .as_deref()
                .map(|raw| parse_column("time_entries.project_id", raw))
                .transpose()?,
            title: row.title,
            description: row.description,
            notes: row.notes,
            category: parse_column("time_entries.category", &row.category)?,
            start_time: datetime_from_millis(row.start_time)?,
            state,
            paused_duration: TimeDelta::try_milliseconds(row.paused_ms).ok_or_else(|| {
                TallyError::Database(format!("paused_ms out of range: {}", row.paused_ms))
            })?,
            origin: parse_column("time_entries.origin", &row.origin)?,
            was_edited: int_to_bool(row.was_edited),
            is_archived: int_to_bool(row.is_archived),
            created_at: datetime_from_millis(row.created_at)?,
            updated_at: datetime_from_millis(row.updated_at)?,
        })
    }
}
