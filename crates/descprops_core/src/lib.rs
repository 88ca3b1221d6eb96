//! Core domain logic for description property extraction.
//! Commands trailing a task description are applied to the task and removed
//! from the text.

pub mod color;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod parse;
pub mod repo;
pub mod service;

pub use color::{ColorPalette, ColorResolver};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::command::{parse_command_line, Command, CommandKind, LineRejection};
pub use model::task::{
    PendingSubtask, Project, ProjectId, ProjectValidationError, Subtask, SubtaskId, Task,
    TaskId, TaskValidationError, UserId,
};
pub use parse::natural::{FallbackDateResolver, NaturalDateResolver};
pub use parse::zone::{CalendarZone, LocalNow};
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::subtask_repo::{SqliteSubtaskRepository, SubtaskRepository};
pub use repo::tag_repo::{SqliteTagRepository, TagRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::context::{Clock, FixedClock, FixedSession, SessionIdentity, SystemClock};
pub use service::extraction_service::{
    ExtractError, ExtractResult, ExtractionDeps, ExtractionReport, ExtractionService,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
