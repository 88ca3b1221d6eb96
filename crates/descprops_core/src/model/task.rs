//! Task, project and subtask domain model.
//!
//! # Responsibility
//! - Define the task record mutated by description commands.
//! - Define the project record that owns priority bounds and tag scope.
//! - Define buffered subtask creation requests.
//!
//! # Invariants
//! - `id` is stable and never nil.
//! - Task titles and project names are never blank.
//! - A project's `priority_start <= priority_default <= priority_end`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;
/// Stable identifier for a project (the group owning tasks, tags and priority bounds).
pub type ProjectId = Uuid;
/// Stable identifier for a user creating subtasks.
pub type UserId = Uuid;
/// Stable identifier for a persisted subtask.
pub type SubtaskId = Uuid;

/// Task record mutated in place by extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub title: String,
    /// Free text; trailing command lines are stripped by extraction.
    pub description: String,
    /// Unix epoch milliseconds.
    pub due_at: Option<i64>,
    /// Unix epoch milliseconds.
    pub started_at: Option<i64>,
    pub priority: Option<i64>,
    /// Palette color id, e.g. `deep_orange`.
    pub color_id: Option<String>,
}

impl Task {
    /// Creates a task with a generated id and no scheduling metadata.
    pub fn new(
        project_id: ProjectId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            title: title.into(),
            description: description.into(),
            due_at: None,
            started_at: None,
            priority: None,
            color_id: None,
        }
    }

    /// Checks write-time invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }
        Ok(())
    }
}

/// Validation failures for [`Task`] writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    NilId,
    BlankTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "task id must not be nil"),
            Self::BlankTitle => write!(f, "task title must not be blank"),
        }
    }
}

impl Error for TaskValidationError {}

/// Project record. Only the fields extraction depends on are modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// Lowest accepted priority (inclusive).
    pub priority_start: i64,
    /// Highest accepted priority (inclusive).
    pub priority_end: i64,
    pub priority_default: i64,
}

impl Project {
    /// Creates a project with a generated id and the given inclusive priority range.
    ///
    /// The default priority starts at `priority_start`.
    pub fn new(name: impl Into<String>, priority_start: i64, priority_end: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            priority_start,
            priority_end,
            priority_default: priority_start,
        }
    }

    /// Returns whether `priority` lies within `[priority_start, priority_end]`.
    pub fn accepts_priority(&self, priority: i64) -> bool {
        (self.priority_start..=self.priority_end).contains(&priority)
    }

    /// Checks write-time invariants.
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.id.is_nil() {
            return Err(ProjectValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(ProjectValidationError::BlankName);
        }
        if self.priority_start > self.priority_end {
            return Err(ProjectValidationError::InvertedPriorityRange {
                start: self.priority_start,
                end: self.priority_end,
            });
        }
        if !self.accepts_priority(self.priority_default) {
            return Err(ProjectValidationError::DefaultPriorityOutOfRange(
                self.priority_default,
            ));
        }
        Ok(())
    }
}

/// Validation failures for [`Project`] writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    NilId,
    BlankName,
    InvertedPriorityRange { start: i64, end: i64 },
    DefaultPriorityOutOfRange(i64),
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "project id must not be nil"),
            Self::BlankName => write!(f, "project name must not be blank"),
            Self::InvertedPriorityRange { start, end } => write!(
                f,
                "priority_start ({start}) must be <= priority_end ({end})"
            ),
            Self::DefaultPriorityOutOfRange(value) => {
                write!(f, "priority_default ({value}) is outside the priority range")
            }
        }
    }
}

impl Error for ProjectValidationError {}

/// Subtask creation request buffered during a scan.
///
/// Subtasks are created only after the scan finishes, so they can be
/// written in the order they appear in the description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSubtask {
    pub title: String,
    pub task_id: TaskId,
    pub user_id: UserId,
}

/// Persisted subtask read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: SubtaskId,
    pub task_id: TaskId,
    pub user_id: UserId,
    pub title: String,
    /// Zero-based creation order within the task.
    pub position: i64,
}
