use descprops_core::db::open_db_in_memory;
use descprops_core::{
    PendingSubtask, Project, ProjectRepository, ProjectValidationError, RepoError,
    SqliteProjectRepository, SqliteSubtaskRepository, SqliteTagRepository, SqliteTaskRepository,
    SubtaskRepository, TagRepository, Task, TaskRepository, TaskValidationError,
};
use rusqlite::Connection;
use uuid::Uuid;

fn seed_task(conn: &Connection) -> Task {
    let project = Project::new("home", 0, 3);
    SqliteProjectRepository::try_new(conn)
        .unwrap()
        .create_project(&project)
        .unwrap();
    let task = Task::new(project.id, "Fix the sink", "Leaks again");
    SqliteTaskRepository::try_new(conn)
        .unwrap()
        .create_task(&task)
        .unwrap();
    task
}

fn project_tag_count(conn: &Connection, task: &Task) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM tags WHERE project_uuid = ?1;",
        [task.project_id.to_string()],
        |row| row.get(0),
    )
    .unwrap()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn task_round_trips_every_mutable_field() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let mut task = seed_task(&conn);

    task.description = "Leaks again\r\nstill".to_string();
    task.due_at = Some(1_792_015_200_000);
    task.started_at = Some(-1);
    task.priority = Some(3);
    task.color_id = Some("teal".to_string());
    repo.update_task(&task).unwrap();

    assert_eq!(repo.get_task(task.id).unwrap(), Some(task));
}

#[test]
fn unknown_task_reads_as_none_and_updates_fail() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let project = Project::new("home", 0, 3);
    let ghost = Task::new(project.id, "ghost", "");

    assert_eq!(repo.get_task(ghost.id).unwrap(), None);
    let err = repo.update_task(&ghost).unwrap_err();
    assert!(matches!(err, RepoError::TaskNotFound(id) if id == ghost.id));
}

#[test]
fn task_writes_are_validated() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let mut task = seed_task(&conn);

    task.title = "   ".to_string();
    let err = repo.update_task(&task).unwrap_err();
    assert!(matches!(
        err,
        RepoError::TaskValidation(TaskValidationError::BlankTitle)
    ));
}

#[test]
fn project_writes_are_validated() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();

    let err = repo
        .create_project(&Project::new("inverted", 5, 1))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::ProjectValidation(ProjectValidationError::InvertedPriorityRange {
            start: 5,
            end: 1
        })
    ));

    let project = Project::new("ok", -2, 2);
    repo.create_project(&project).unwrap();
    assert_eq!(repo.get_project(project.id).unwrap(), Some(project));
    assert_eq!(repo.get_project(Uuid::new_v4()).unwrap(), None);
}

#[test]
fn saving_tags_replaces_the_set_and_keeps_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTagRepository::try_new(&conn).unwrap();
    let task = seed_task(&conn);

    repo.save_task_tags(task.project_id, task.id, &strings(&["b", " a ", "", "B"]))
        .unwrap();
    assert_eq!(repo.list_task_tags(task.id).unwrap(), vec!["b", "a"]);

    repo.save_task_tags(task.project_id, task.id, &strings(&["c"]))
        .unwrap();
    assert_eq!(repo.list_task_tags(task.id).unwrap(), vec!["c"]);
    // Unlinked tags stay known to the project.
    assert_eq!(project_tag_count(&conn, &task), 3);
}

#[test]
fn tags_are_scoped_to_their_project() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTagRepository::try_new(&conn).unwrap();
    let first = seed_task(&conn);
    let second = seed_task(&conn);

    repo.save_task_tags(first.project_id, first.id, &strings(&["Urgent"]))
        .unwrap();
    repo.save_task_tags(second.project_id, second.id, &strings(&["urgent"]))
        .unwrap();

    assert_eq!(repo.list_task_tags(first.id).unwrap(), vec!["Urgent"]);
    assert_eq!(repo.list_task_tags(second.id).unwrap(), vec!["urgent"]);
}

#[test]
fn saving_tags_for_missing_task_fails() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTagRepository::try_new(&conn).unwrap();
    let task = seed_task(&conn);
    let missing = Uuid::new_v4();

    let err = repo
        .save_task_tags(task.project_id, missing, &strings(&["x"]))
        .unwrap_err();
    assert!(matches!(err, RepoError::TaskNotFound(id) if id == missing));
    assert_eq!(project_tag_count(&conn, &task), 0);
}

#[test]
fn subtasks_list_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSubtaskRepository::try_new(&conn).unwrap();
    let task = seed_task(&conn);
    let user_id = Uuid::new_v4();

    for title in ["buy washer", "shut valve", "call plumber"] {
        repo.create_subtask(&PendingSubtask {
            title: title.to_string(),
            task_id: task.id,
            user_id,
        })
        .unwrap();
    }

    let subtasks = repo.list_subtasks(task.id).unwrap();
    let summary = subtasks
        .iter()
        .map(|subtask| (subtask.position, subtask.title.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        summary,
        vec![(0, "buy washer"), (1, "shut valve"), (2, "call plumber")]
    );
    assert!(subtasks.iter().all(|subtask| subtask.user_id == user_id));
}
