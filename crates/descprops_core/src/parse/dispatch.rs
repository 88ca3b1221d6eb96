//! Command dispatch for one isolated description line.
//!
//! # Responsibility
//! - Parse a line into a [`Command`] and apply its effect to the task.
//! - Validate parameters against collaborators (project bounds, colors, dates).
//! - Buffer subtask creation instead of writing it.
//!
//! # Invariants
//! - A rejected line leaves the task, the buffer and every store untouched.
//! - Store failures are returned as errors, never folded into a rejection.

use crate::color::ColorResolver;
use crate::model::command::{parse_command_line, Command, CommandKind, LineRejection};
use crate::model::task::{PendingSubtask, Task};
use crate::parse::datetime::DateTimeResolver;
use crate::parse::natural::FallbackDateResolver;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::tag_repo::TagRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::context::ParseContext;
use log::debug;

/// What happened to one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Applied(CommandKind),
    Rejected(LineRejection),
}

/// Applies description commands to a task using borrowed collaborators.
pub struct CommandDispatcher<'a> {
    tags: &'a dyn TagRepository,
    projects: &'a dyn ProjectRepository,
    colors: &'a dyn ColorResolver,
    dates: DateTimeResolver<'a>,
    context: ParseContext<'a>,
}

impl<'a> CommandDispatcher<'a> {
    pub fn new(
        tags: &'a dyn TagRepository,
        projects: &'a dyn ProjectRepository,
        colors: &'a dyn ColorResolver,
        fallback_dates: &'a dyn FallbackDateResolver,
        context: ParseContext<'a>,
    ) -> Self {
        Self {
            tags,
            projects,
            colors,
            dates: DateTimeResolver::new(fallback_dates),
            context,
        }
    }

    /// Dispatches one line (without its line break).
    ///
    /// # Errors
    /// - Tag store failures while merging tags.
    /// - `RepoError::ProjectNotFound` when `\prio` runs for a task whose project is gone.
    pub fn dispatch(
        &self,
        line: &str,
        task: &mut Task,
        pending_subtasks: &mut Vec<PendingSubtask>,
    ) -> RepoResult<LineOutcome> {
        let outcome = match parse_command_line(line) {
            Ok(command) => self.apply(command, task, pending_subtasks)?,
            Err(rejection) => LineOutcome::Rejected(rejection),
        };

        match &outcome {
            LineOutcome::Applied(kind) => debug!(
                "event=command_applied module=parse status=ok task_id={} kind={}",
                task.id,
                kind.keyword()
            ),
            LineOutcome::Rejected(rejection) => debug!(
                "event=command_rejected module=parse status=stop task_id={} reason={}",
                task.id,
                rejection.code()
            ),
        }
        Ok(outcome)
    }

    fn apply(
        &self,
        command: Command<'_>,
        task: &mut Task,
        pending_subtasks: &mut Vec<PendingSubtask>,
    ) -> RepoResult<LineOutcome> {
        let kind = command.kind();
        match command {
            Command::Tags(names) => {
                let existing = self.tags.list_task_tags(task.id)?;
                let merged = names
                    .into_iter()
                    .map(str::to_string)
                    .chain(existing)
                    .collect::<Vec<_>>();
                self.tags
                    .save_task_tags(task.project_id, task.id, &merged)?;
            }
            Command::Subtask(title) => pending_subtasks.push(PendingSubtask {
                title: title.to_string(),
                task_id: task.id,
                user_id: self.context.user_id,
            }),
            Command::Due(token) => match self.resolve_millis(token) {
                Some(millis) => task.due_at = Some(millis),
                None => return Ok(unresolved_date(token)),
            },
            Command::Start(token) => match self.resolve_millis(token) {
                Some(millis) => task.started_at = Some(millis),
                None => return Ok(unresolved_date(token)),
            },
            Command::Priority(value) => {
                let project = self
                    .projects
                    .get_project(task.project_id)?
                    .ok_or(RepoError::ProjectNotFound(task.project_id))?;
                if !project.accepts_priority(value) {
                    return Ok(LineOutcome::Rejected(LineRejection::PriorityOutOfRange {
                        value,
                        start: project.priority_start,
                        end: project.priority_end,
                    }));
                }
                task.priority = Some(value);
            }
            Command::Color(name) => match self.colors.find(name) {
                Some(color_id) if !color_id.is_empty() => task.color_id = Some(color_id),
                _ => {
                    return Ok(LineOutcome::Rejected(LineRejection::UnknownColor(
                        name.to_string(),
                    )))
                }
            },
        }
        Ok(LineOutcome::Applied(kind))
    }

    fn resolve_millis(&self, token: &str) -> Option<i64> {
        self.dates
            .resolve(token, self.context.now)
            .map(|instant| instant.timestamp_millis())
    }
}

fn unresolved_date(token: &str) -> LineOutcome {
    LineOutcome::Rejected(LineRejection::UnresolvedDate(token.to_string()))
}
