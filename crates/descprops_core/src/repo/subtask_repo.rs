//! Subtask repository contract and SQLite implementation.
//!
//! # Invariants
//! - Each created subtask is appended after the task's existing subtasks;
//!   `position` reflects creation order.

use crate::db::ensure_tables;
use crate::model::task::{PendingSubtask, Subtask, SubtaskId, TaskId};
use crate::repo::{parse_uuid, RepoResult};
use rusqlite::{params, Connection};
use uuid::Uuid;

/// Repository interface for subtasks.
pub trait SubtaskRepository {
    fn create_subtask(&self, subtask: &PendingSubtask) -> RepoResult<SubtaskId>;
    /// Lists a task's subtasks in creation order.
    fn list_subtasks(&self, task_id: TaskId) -> RepoResult<Vec<Subtask>>;
}

/// SQLite-backed subtask repository.
pub struct SqliteSubtaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSubtaskRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["subtasks"])?;
        Ok(Self { conn })
    }
}

impl SubtaskRepository for SqliteSubtaskRepository<'_> {
    fn create_subtask(&self, subtask: &PendingSubtask) -> RepoResult<SubtaskId> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO subtasks (uuid, task_uuid, user_uuid, title, position)
             SELECT ?1, ?2, ?3, ?4, COALESCE(MAX(position) + 1, 0)
             FROM subtasks
             WHERE task_uuid = ?2;",
            params![
                id.to_string(),
                subtask.task_id.to_string(),
                subtask.user_id.to_string(),
                subtask.title.as_str(),
            ],
        )?;
        Ok(id)
    }

    fn list_subtasks(&self, task_id: TaskId) -> RepoResult<Vec<Subtask>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, task_uuid, user_uuid, title, position
             FROM subtasks
             WHERE task_uuid = ?1
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([task_id.to_string()])?;
        let mut subtasks = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get("uuid")?;
            let task_text: String = row.get("task_uuid")?;
            let user_text: String = row.get("user_uuid")?;
            subtasks.push(Subtask {
                id: parse_uuid(&id_text, "subtasks.uuid")?,
                task_id: parse_uuid(&task_text, "subtasks.task_uuid")?,
                user_id: parse_uuid(&user_text, "subtasks.user_uuid")?,
                title: row.get("title")?,
                position: row.get("position")?,
            });
        }
        Ok(subtasks)
    }
}
