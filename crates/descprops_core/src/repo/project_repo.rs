//! Project repository contract and SQLite implementation.
//!
//! Projects own the priority bounds `\prio` is validated against and the
//! namespace tags are created in.

use crate::db::ensure_tables;
use crate::model::task::{Project, ProjectId};
use crate::repo::{parse_uuid, RepoResult};
use rusqlite::{params, Connection};

/// Repository interface for project lookup.
pub trait ProjectRepository {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["projects"])?;
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        project.validate()?;

        self.conn.execute(
            "INSERT INTO projects (
                uuid,
                name,
                priority_start,
                priority_end,
                priority_default
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                project.id.to_string(),
                project.name.as_str(),
                project.priority_start,
                project.priority_end,
                project.priority_default,
            ],
        )?;

        Ok(project.id)
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, name, priority_start, priority_end, priority_default
             FROM projects
             WHERE uuid = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let id_text: String = row.get("uuid")?;
        Ok(Some(Project {
            id: parse_uuid(&id_text, "projects.uuid")?,
            name: row.get("name")?,
            priority_start: row.get("priority_start")?,
            priority_end: row.get("priority_end")?,
            priority_default: row.get("priority_default")?,
        }))
    }
}
