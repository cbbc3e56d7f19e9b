//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `tasks` storage.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate titles before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Soft delete never rewrites an existing tombstone timestamp.
//!
//! # See also
//! - crate::service::task_service

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::task::{validate_title, NewTask, Task, TaskId, TaskPatch, TaskValidationError};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    is_completed,
    due_date,
    created_at,
    deleted_at
FROM tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Write input failed model validation.
    Validation(TaskValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target task does not exist.
    NotFound(TaskId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from the expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted into a valid read model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "task repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "task repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "task repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskListQuery {
    /// Include soft-deleted rows in the result.
    pub include_deleted: bool,
}

/// Repository interface for task CRUD operations.
pub trait TaskRepository {
    /// Persists a new task and returns its storage-assigned id.
    fn create_task(&self, input: &NewTask) -> RepoResult<TaskId>;
    /// Applies a sparse patch to one existing task (active or deleted).
    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> RepoResult<()>;
    /// Gets one task by id.
    fn get_task(&self, id: TaskId, include_deleted: bool) -> RepoResult<Option<Task>>;
    /// Lists tasks ordered by creation time, newest first.
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    /// Tombstones one task; already-deleted tasks keep their timestamp.
    fn soft_delete_task(&self, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_task_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, input: &NewTask) -> RepoResult<TaskId> {
        validate_title(&input.title)?;

        // is_completed, created_at and deleted_at take their column defaults.
        self.conn.execute(
            "INSERT INTO tasks (title, description, due_date)
             VALUES (?1, ?2, ?3);",
            params![
                input.title.as_str(),
                input.description.as_deref().unwrap_or(""),
                input.due_date.map(date_to_db),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> RepoResult<()> {
        if let Some(title) = patch.title.as_deref() {
            validate_title(title)?;
        }

        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(title) = patch.title.as_deref() {
            assignments.push("title = ?");
            bind_values.push(Value::Text(title.to_string()));
        }
        if let Some(description) = patch.description.as_deref() {
            assignments.push("description = ?");
            bind_values.push(Value::Text(description.to_string()));
        }
        if let Some(is_completed) = patch.is_completed {
            assignments.push("is_completed = ?");
            bind_values.push(Value::Integer(bool_to_int(is_completed)));
        }
        if let Some(due_date) = patch.due_date {
            assignments.push("due_date = ?");
            bind_values.push(match due_date {
                Some(date) => Value::Text(date_to_db(date)),
                None => Value::Null,
            });
        }

        // An empty patch mutates nothing but must still report missing rows.
        if assignments.is_empty() {
            return match self.get_task(id, true)? {
                Some(_) => Ok(()),
                None => Err(RepoError::NotFound(id)),
            };
        }

        let sql = format!("UPDATE tasks SET {} WHERE id = ?;", assignments.join(", "));
        bind_values.push(Value::Integer(id));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn get_task(&self, id: TaskId, include_deleted: bool) -> RepoResult<Option<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE id = ?1
               AND (?2 = 1 OR deleted_at IS NULL);"
        ))?;

        let mut rows = stmt.query(params![id, bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        if !query.include_deleted {
            sql.push_str(" AND deleted_at IS NULL");
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn soft_delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET deleted_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND deleted_at IS NULL;",
            params![id],
        )?;

        // Zero changed rows covers two cases: the id is unknown, or the row
        // is already tombstoned and must keep its original timestamp.
        if changed == 0 {
            return match self.get_task(id, true)? {
                Some(_) => Ok(()),
                None => Err(RepoError::NotFound(id)),
            };
        }

        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let due_date = match row.get::<_, Option<String>>("due_date")? {
        Some(value) => Some(parse_date_value(&value)?),
        None => None,
    };

    let is_completed = match row.get::<_, i64>("is_completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_completed value `{other}` in tasks.is_completed"
            )));
        }
    };

    let created_at = parse_timestamp_value(row.get("created_at")?, "tasks.created_at")?;
    let deleted_at = match row.get::<_, Option<i64>>("deleted_at")? {
        Some(millis) => Some(parse_timestamp_value(millis, "tasks.deleted_at")?),
        None => None,
    };

    let task = Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        is_completed,
        due_date,
        created_at,
        deleted_at,
    };
    validate_title(&task.title)?;
    Ok(task)
}

fn date_to_db(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date_value(value: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        RepoError::InvalidData(format!("invalid date value `{value}` in tasks.due_date"))
    })
}

fn parse_timestamp_value(millis: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid timestamp `{millis}` in {column}")))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_task_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "tasks")? {
        return Err(RepoError::MissingRequiredTable("tasks"));
    }

    for column in [
        "id",
        "title",
        "description",
        "is_completed",
        "due_date",
        "created_at",
        "deleted_at",
    ] {
        if !table_has_column(conn, "tasks", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "tasks",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
