//! Command-line entry point for description extraction.
//!
//! # Responsibility
//! - Run one extraction end to end against a real SQLite store.
//! - Keep output machine-readable (JSON on stdout, errors on stderr).
//!
//! Lines read from stdin are joined with `\r\n`, the separator extraction
//! recognizes, whatever line endings the input used.

use clap::Parser;
use descprops_core::db::{open_db, open_db_in_memory};
use descprops_core::{
    init_logging, ColorPalette, CoreConfig, ExtractionDeps, ExtractionService, FixedSession,
    NaturalDateResolver, Project, ProjectRepository, SqliteProjectRepository,
    SqliteSubtaskRepository, SqliteTagRepository, SqliteTaskRepository, SubtaskRepository,
    SystemClock, TagRepository, Task, TaskRepository,
};
use log::info;
use std::io::Read;
use std::process::ExitCode;
use uuid::Uuid;

/// Inclusive priority bounds of the scratch project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PriorityRange {
    start: i64,
    end: i64,
}

/// Applies the commands trailing a description read from stdin and prints the result.
#[derive(Parser, Debug)]
#[command(name = "descprops_cli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Priority bounds of the project the task is created in, as START:END.
    #[arg(long, default_value = "0:3", value_parser = parse_priority_range)]
    priority_range: PriorityRange,

    /// Title of the created task.
    #[arg(long, default_value = "cli task")]
    title: String,

    /// Print core ping and version, then exit.
    #[arg(long)]
    ping: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("descprops_cli: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();
    if cli.ping {
        println!("descprops_core ping={}", descprops_core::ping());
        println!("descprops_core version={}", descprops_core::core_version());
        return Ok(());
    }

    let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, &log_dir.to_string_lossy())?;
    }

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(|err| format!("failed to read stdin: {err}"))?;
    let description = join_crlf(&input);

    let conn = match &config.db_path {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    }
    .map_err(|err| err.to_string())?;

    let tasks = SqliteTaskRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let projects = SqliteProjectRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let tags = SqliteTagRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let subtasks = SqliteSubtaskRepository::try_new(&conn).map_err(|err| err.to_string())?;

    let project = Project::new("cli", cli.priority_range.start, cli.priority_range.end);
    projects
        .create_project(&project)
        .map_err(|err| err.to_string())?;
    let task = Task::new(project.id, cli.title, description);
    tasks.create_task(&task).map_err(|err| err.to_string())?;
    info!(
        "event=cli_extract module=cli status=start task_id={} project_id={}",
        task.id, project.id
    );

    let colors = ColorPalette::default();
    let session = FixedSession(Uuid::new_v4());
    let service = ExtractionService::new(ExtractionDeps {
        tasks: &tasks,
        projects: &projects,
        tags: &tags,
        subtasks: &subtasks,
        colors: &colors,
        dates: &NaturalDateResolver,
        clock: &SystemClock,
        session: &session,
    });
    let report = service.extract(task.id).map_err(|err| err.to_string())?;

    let stored = tasks
        .get_task(task.id)
        .map_err(|err| err.to_string())?
        .ok_or_else(|| format!("task {} vanished after extraction", task.id))?;
    let output = serde_json::json!({
        "report": report,
        "task": stored,
        "tags": tags.list_task_tags(task.id).map_err(|err| err.to_string())?,
        "subtasks": subtasks.list_subtasks(task.id).map_err(|err| err.to_string())?,
    });
    let rendered = serde_json::to_string_pretty(&output).map_err(|err| err.to_string())?;
    println!("{rendered}");
    Ok(())
}

fn parse_priority_range(value: &str) -> Result<PriorityRange, String> {
    let invalid = || format!("invalid priority range `{value}`; expected START:END");
    let (start, end) = value.split_once(':').ok_or_else(invalid)?;
    let start = start.trim().parse::<i64>().map_err(|_| invalid())?;
    let end = end.trim().parse::<i64>().map_err(|_| invalid())?;
    Ok(PriorityRange { start, end })
}

fn join_crlf(input: &str) -> String {
    input.lines().collect::<Vec<_>>().join("\r\n")
}

#[cfg(test)]
mod tests {
    use super::{join_crlf, parse_priority_range, Cli, PriorityRange};
    use clap::error::ErrorKind;
    use clap::Parser;

    #[test]
    fn defaults_apply_without_arguments() {
        let cli = Cli::try_parse_from(["descprops_cli"]).unwrap();
        assert_eq!(cli.priority_range, PriorityRange { start: 0, end: 3 });
        assert_eq!(cli.title, "cli task");
        assert!(!cli.ping);
    }

    #[test]
    fn priority_range_and_title_are_read() {
        let cli = Cli::try_parse_from([
            "descprops_cli",
            "--priority-range",
            "-1:4",
            "--title",
            "Groceries",
        ])
        .unwrap();
        assert_eq!(cli.priority_range, PriorityRange { start: -1, end: 4 });
        assert_eq!(cli.title, "Groceries");
    }

    #[test]
    fn version_flag_is_handled_by_clap() {
        let err = Cli::try_parse_from(["descprops_cli", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["descprops_cli", "--priority-range"]).is_err());
        assert!(Cli::try_parse_from(["descprops_cli", "--verbose"]).is_err());
        assert!(Cli::try_parse_from(["descprops_cli", "--priority-range", "1-5"]).is_err());
        assert!(parse_priority_range("a:5").is_err());
    }

    #[test]
    fn line_endings_become_crlf() {
        assert_eq!(join_crlf("Do it\n\\due tm\n"), "Do it\r\n\\due tm");
        assert_eq!(join_crlf("a\r\nb"), "a\r\nb");
    }
}
