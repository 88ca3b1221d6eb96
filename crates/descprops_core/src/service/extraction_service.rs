//! Description extraction use-case service.
//!
//! # Responsibility
//! - Load a task, apply the command lines trailing its description, and persist it.
//! - Create buffered subtasks in their original top-to-bottom order.
//!
//! # Invariants
//! - The task is read once and written at most once per run.
//! - "now" and the acting user are captured once per run.
//! - A run that consumes no line performs no write at all.
//! - Store failures abort the run; invalid command lines only end the scan.

use crate::color::ColorResolver;
use crate::model::command::CommandKind;
use crate::model::task::{PendingSubtask, TaskId};
use crate::parse::dispatch::{CommandDispatcher, LineOutcome};
use crate::parse::natural::FallbackDateResolver;
use crate::parse::scanner::scan_trailing_lines;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::subtask_repo::SubtaskRepository;
use crate::repo::tag_repo::TagRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::context::{Clock, ParseContext, SessionIdentity};
use log::{error, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type ExtractResult<T> = Result<T, ExtractError>;

/// Hard failures of an extraction run.
#[derive(Debug)]
pub enum ExtractError {
    TaskNotFound(TaskId),
    Repo(RepoError),
}

impl Display for ExtractError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ExtractError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TaskNotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ExtractError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TaskNotFound(id) => Self::TaskNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Summary of one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    pub task_id: TaskId,
    /// Applied command kinds, bottom line first.
    pub applied: Vec<CommandKind>,
    pub subtasks_created: usize,
    /// Description after extraction.
    pub description: String,
    /// Whether the task was written back.
    pub persisted: bool,
}

/// Collaborators an extraction run borrows.
#[derive(Clone, Copy)]
pub struct ExtractionDeps<'a> {
    pub tasks: &'a dyn TaskRepository,
    pub projects: &'a dyn ProjectRepository,
    pub tags: &'a dyn TagRepository,
    pub subtasks: &'a dyn SubtaskRepository,
    pub colors: &'a dyn ColorResolver,
    pub dates: &'a dyn FallbackDateResolver,
    pub clock: &'a dyn Clock,
    pub session: &'a dyn SessionIdentity,
}

/// Applies trailing description commands to stored tasks.
pub struct ExtractionService<'a> {
    deps: ExtractionDeps<'a>,
}

impl<'a> ExtractionService<'a> {
    pub fn new(deps: ExtractionDeps<'a>) -> Self {
        Self { deps }
    }

    /// Runs extraction for one task.
    ///
    /// # Errors
    /// - `ExtractError::TaskNotFound` when the task does not exist.
    /// - `ExtractError::Repo` for any store failure, including a missing project
    ///   when a `\prio` line is evaluated.
    pub fn extract(&self, task_id: TaskId) -> ExtractResult<ExtractionReport> {
        let started_at = Instant::now();
        info!("event=extract module=service status=start task_id={task_id}");

        match self.run(task_id) {
            Ok(report) => {
                info!(
                    "event=extract module=service status=ok task_id={task_id} applied={} subtasks={} persisted={} duration_ms={}",
                    report.applied.len(),
                    report.subtasks_created,
                    report.persisted,
                    started_at.elapsed().as_millis()
                );
                Ok(report)
            }
            Err(err) => {
                error!(
                    "event=extract module=service status=error task_id={task_id} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    fn run(&self, task_id: TaskId) -> ExtractResult<ExtractionReport> {
        let deps = &self.deps;
        let mut task = deps
            .tasks
            .get_task(task_id)?
            .ok_or(ExtractError::TaskNotFound(task_id))?;

        let context = ParseContext::capture(deps.clock, deps.session);
        let dispatcher =
            CommandDispatcher::new(deps.tags, deps.projects, deps.colors, deps.dates, context);

        let trimmed = task.description.trim_end().to_string();
        let mut pending: Vec<PendingSubtask> = Vec::new();
        let mut applied = Vec::new();

        let outcome = scan_trailing_lines(&trimmed, |line| -> RepoResult<bool> {
            match dispatcher.dispatch(line, &mut task, &mut pending)? {
                LineOutcome::Applied(kind) => {
                    applied.push(kind);
                    Ok(true)
                }
                LineOutcome::Rejected(_) => Ok(false),
            }
        })?;

        if outcome.consumed_lines == 0 {
            return Ok(ExtractionReport {
                task_id,
                applied,
                subtasks_created: 0,
                description: task.description,
                persisted: false,
            });
        }

        // Buffered bottom-up; create top-down.
        for subtask in pending.iter().rev() {
            deps.subtasks.create_subtask(subtask)?;
        }

        task.description = outcome.retained.to_string();
        deps.tasks.update_task(&task)?;

        Ok(ExtractionReport {
            task_id,
            applied,
            subtasks_created: pending.len(),
            description: task.description,
            persisted: true,
        })
    }
}
