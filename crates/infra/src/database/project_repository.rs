//! SQLite-backed project store

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{OptionalExtension, Row, ToSql};
use tally_core::projects::ports::ProjectStore;
use tally_domain::{Project, ProjectId, Result as DomainResult, TallyError, UserId};
use tracing::debug;

use super::manager::{map_sql_error, DbManager};
use super::{bool_to_int, datetime_from_millis, int_to_bool, parse_column, with_connection};

const SELECT_PROJECT: &str = "SELECT id, owner_id, name, description, category, hourly_rate,
        is_archived, created_at
    FROM projects";

pub struct SqliteProjectRepository {
    db: Arc<DbManager>,
}

impl SqliteProjectRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProjectStore for SqliteProjectRepository {
    async fn find_project(
        &self,
        project_id: ProjectId,
        user_id: &UserId,
    ) -> DomainResult<Option<Project>> {
        let user_id = user_id.clone();
        with_connection(&self.db, move |conn| {
            let sql = format!("{SELECT_PROJECT} WHERE id = ?1 AND owner_id = ?2");
            let id = project_id.to_string();
            let params: [&dyn ToSql; 2] = [&id, &user_id.as_str()];
            conn.query_row(&sql, params.as_slice(), ProjectRow::from_row)
                .optional()
                .map_err(map_sql_error)?
                .map(Project::try_from)
                .transpose()
        })
        .await
    }

    async fn create_project(&self, project: &Project) -> DomainResult<ProjectId> {
        let project = project.clone();
        with_connection(&self.db, move |conn| {
            let row = ProjectRow::from(&project);
            conn.execute(
                "INSERT INTO projects (
                    id, owner_id, name, description, category, hourly_rate, is_archived, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                row.params().as_slice(),
            )
            .map_err(map_sql_error)?;
            debug!(project_id = %project.id, owner_id = %project.owner_id, "project inserted");
            Ok(project.id)
        })
        .await
    }

    async fn update_project(&self, project: &Project) -> DomainResult<()> {
        let project = project.clone();
        with_connection(&self.db, move |conn| {
            let row = ProjectRow::from(&project);
            let changed = conn
                .execute(
                    "UPDATE projects SET
                        name = ?3, description = ?4, category = ?5, hourly_rate = ?6,
                        is_archived = ?7, created_at = ?8
                     WHERE id = ?1 AND owner_id = ?2",
                    row.params().as_slice(),
                )
                .map_err(map_sql_error)?;
            if changed == 0 {
                return Err(TallyError::NotFound(format!("project {}", project.id)));
            }
            Ok(())
        })
        .await
    }

    async fn list_projects(
        &self,
        user_id: &UserId,
        include_archived: bool,
    ) -> DomainResult<Vec<Project>> {
        let user_id = user_id.clone();
        with_connection(&self.db, move |conn| {
            let sql = if include_archived {
                format!("{SELECT_PROJECT} WHERE owner_id = ?1 ORDER BY name COLLATE NOCASE, id")
            } else {
                format!(
                    "{SELECT_PROJECT} WHERE owner_id = ?1 AND is_archived = 0 \
                     ORDER BY name COLLATE NOCASE, id"
                )
            };
            let mut stmt = conn.prepare(&sql).map_err(map_sql_error)?;
            let params: [&dyn ToSql; 1] = [&user_id.as_str()];
            let rows = stmt
                .query_map(params.as_slice(), ProjectRow::from_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            rows.into_iter().map(Project::try_from).collect()
        })
        .await
    }
}

struct ProjectRow {
    id: String,
    owner_id: String,
    name: String,
    description: String,
    category: String,
    hourly_rate: f64,
    is_archived: i64,
    created_at: i64,
}

impl ProjectRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            category: row.get(4)?,
            hourly_rate: row.get(5)?,
            is_archived: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn params(&self) -> [&dyn ToSql; 8] {
        [
            &self.id,
            &self.owner_id,
            &self.name,
            &self.description,
            &self.category,
            &self.hourly_rate,
            &self.is_archived,
            &self.created_at,
        ]
    }
}

impl From<&Project> for ProjectRow {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.to_string(),
            owner_id: project.owner_id.as_str().to_string(),
            name: project.name.clone(),
            description: project.description.clone(),
            category: project.category.as_str().to_string(),
            hourly_rate: project.hourly_rate,
            is_archived: bool_to_int(project.is_archived),
            created_at: project.created_at.timestamp_millis(),
        }
    }
}

impl TryFrom<ProjectRow> for Project {
    type Error = TallyError;

    fn try_from(row: ProjectRow) -> DomainResult<Self> {
        Ok(Self {
            id: parse_column("projects.id", &row.id)?,
            owner_id: UserId::from(row.owner_id),
            name: row.name,
            description: row.description,
            category: parse_column("projects.category", &row.category)?,
            hourly_rate: row.hourly_rate,
            is_archived: int_to_bool(row.is_archived),
            created_at: datetime_from_millis(row.created_at)?,
        })
    }
}
