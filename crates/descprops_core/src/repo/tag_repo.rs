//! Task tag repository contract and SQLite implementation.
//!
//! # Responsibility
//! - List a task's tags in their stored order.
//! - Replace a task's tag set, creating missing tags in the task's project.
//!
//! # Invariants
//! - Tag names are unique per project, compared case-insensitively.
//! - `save_task_tags` replaces the whole tag set in a single transaction.
//! - Blank names are dropped; duplicates collapse to their first occurrence.

use crate::db::ensure_tables;
use crate::model::task::{ProjectId, TaskId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Transaction};
use std::collections::HashSet;

/// Repository interface for task tags.
pub trait TagRepository {
    /// Returns the task's tag names in saved order.
    fn list_task_tags(&self, task_id: TaskId) -> RepoResult<Vec<String>>;
    /// Replaces the task's tags with `tags`, scoped to `project_id`.
    fn save_task_tags(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        tags: &[String],
    ) -> RepoResult<()>;
}

/// SQLite-backed tag repository.
pub struct SqliteTagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["tags", "task_tags"])?;
        Ok(Self { conn })
    }
}

impl TagRepository for SqliteTagRepository<'_> {
    fn list_task_tags(&self, task_id: TaskId) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.name
             FROM task_tags tt
             INNER JOIN tags t ON t.id = tt.tag_id
             WHERE tt.task_uuid = ?1
             ORDER BY tt.position ASC;",
        )?;
        let mut rows = stmt.query([task_id.to_string()])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.push(row.get(0)?);
        }
        Ok(tags)
    }

    fn save_task_tags(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        tags: &[String],
    ) -> RepoResult<()> {
        let names = normalize_tags(tags);
        let task_text = task_id.to_string();
        let project_text = project_id.to_string();

        // Repositories only hold `&Connection`, so the transaction is opened unchecked.
        let tx = self.conn.unchecked_transaction()?;
        if !task_exists_in_tx(&tx, &task_text)? {
            return Err(RepoError::TaskNotFound(task_id));
        }

        tx.execute("DELETE FROM task_tags WHERE task_uuid = ?1;", [&task_text])?;
        for (position, name) in names.iter().enumerate() {
            tx.execute(
                "INSERT OR IGNORE INTO tags (project_uuid, name) VALUES (?1, ?2);",
                params![project_text, name],
            )?;
            tx.execute(
                "INSERT INTO task_tags (task_uuid, tag_id, position)
                 SELECT ?1, id, ?2
                 FROM tags
                 WHERE project_uuid = ?3 AND name = ?4;",
                params![task_text, position as i64, project_text, name],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}

/// Trims names, drops blanks and keeps the first of case-insensitive duplicates.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .map(str::to_string)
        .collect()
}

fn task_exists_in_tx(tx: &Transaction<'_>, task_uuid: &str) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM tasks WHERE uuid = ?1);",
        [task_uuid],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[cfg(test)]
mod tests {
    use super::normalize_tags;

    #[test]
    fn normalize_keeps_order_and_first_spelling() {
        let tags = ["urgent", "", " Home ", "URGENT", "home", "work"]
            .iter()
            .map(|tag| tag.to_string())
            .collect::<Vec<_>>();
        assert_eq!(normalize_tags(&tags), vec!["urgent", "Home", "work"]);
    }
}
