use descprops_core::db::migrations::latest_version;
use descprops_core::db::{open_db, open_db_in_memory, DbError};
use descprops_core::{RepoError, SqliteTagRepository, SqliteTaskRepository};
use rusqlite::Connection;

const ALL_TABLES: [&str; 5] = ["projects", "tasks", "tags", "task_tags", "subtasks"];

#[test]
fn in_memory_database_is_fully_migrated() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in ALL_TABLES {
        assert!(table_exists(&conn, table), "table {table} does not exist");
    }
}

#[test]
fn reopening_a_file_database_keeps_its_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("descprops.db");

    let first = open_db(&path).unwrap();
    assert_eq!(schema_version(&first), latest_version());
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    assert!(table_exists(&second, "subtasks"));
}

#[test]
fn newer_schema_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repositories_refuse_unmigrated_connections() {
    let conn = Connection::open_in_memory().unwrap();

    let err = SqliteTaskRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::Db(DbError::MissingTable("tasks"))));

    conn.execute_batch("CREATE TABLE tags (id INTEGER PRIMARY KEY);")
        .unwrap();
    let err = SqliteTagRepository::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        RepoError::Db(DbError::MissingTable("task_tags"))
    ));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn table_exists(conn: &Connection, table_name: &str) -> bool {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    exists == 1
}
