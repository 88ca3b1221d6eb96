//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Load and persist the task record extraction mutates.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - `update_task` replaces every mutable column in one statement.

use crate::db::ensure_tables;
use crate::model::task::{Task, TaskId};
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    project_uuid,
    title,
    description,
    date_due,
    date_started,
    priority,
    color_id
FROM tasks";

/// Repository interface for task persistence.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Fails with `RepoError::TaskNotFound` when no row matches `task.id`.
    fn update_task(&self, task: &Task) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["tasks"])?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                uuid,
                project_uuid,
                title,
                description,
                date_due,
                date_started,
                priority,
                color_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                task.id.to_string(),
                task.project_id.to_string(),
                task.title.as_str(),
                task.description.as_str(),
                task.due_at,
                task.started_at,
                task.priority,
                task.color_id.as_deref(),
            ],
        )?;

        Ok(task.id)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                project_uuid = ?1,
                title = ?2,
                description = ?3,
                date_due = ?4,
                date_started = ?5,
                priority = ?6,
                color_id = ?7,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?8;",
            params![
                task.project_id.to_string(),
                task.title.as_str(),
                task.description.as_str(),
                task.due_at,
                task.started_at,
                task.priority,
                task.color_id.as_deref(),
                task.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(task.id));
        }
        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("uuid")?;
    let project_text: String = row.get("project_uuid")?;

    let task = Task {
        id: parse_uuid(&id_text, "tasks.uuid")?,
        project_id: parse_uuid(&project_text, "tasks.project_uuid")?,
        title: row.get("title")?,
        description: row.get("description")?,
        due_at: row.get("date_due")?,
        started_at: row.get("date_started")?,
        priority: row.get("priority")?,
        color_id: row.get("color_id")?,
    };
    task.validate()?;
    Ok(task)
}
