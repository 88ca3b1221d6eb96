//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define the store contracts extraction talks to (tasks, projects, tags, subtasks).
//! - Keep SQL details out of parsing and orchestration code.
//!
//! # Invariants
//! - Write paths validate domain records before SQL mutations.
//! - Repositories return semantic errors (`TaskNotFound`, `ProjectNotFound`)
//!   in addition to DB transport errors.

use crate::db::DbError;
use crate::model::task::{ProjectId, ProjectValidationError, TaskId, TaskValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod project_repo;
pub mod subtask_repo;
pub mod tag_repo;
pub mod task_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error shared by all repositories.
#[derive(Debug)]
pub enum RepoError {
    TaskValidation(TaskValidationError),
    ProjectValidation(ProjectValidationError),
    Db(DbError),
    TaskNotFound(TaskId),
    ProjectNotFound(ProjectId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskValidation(err) => write!(f, "{err}"),
            Self::ProjectValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TaskValidation(err) => Some(err),
            Self::ProjectValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::TaskNotFound(_) | Self::ProjectNotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::TaskValidation(value)
    }
}

impl From<ProjectValidationError> for RepoError {
    fn from(value: ProjectValidationError) -> Self {
        Self::ProjectValidation(value)
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

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}
