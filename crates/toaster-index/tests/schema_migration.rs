//! Integration tests for schema migration
//!
//! Database::open drops and recreates every table when the stored schema
//! version differs from SCHEMA_VERSION; the dataset is expected to be
//! re-imported afterwards. Database::open_read_only never migrates.

use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::Path;
use tempfile::TempDir;
use toaster_index::{Database, Dataset, Error, ProjectRecord, SCHEMA_VERSION};
use toaster_types::ProjectId;

/// An older store that kept projects without release or machine columns
fn create_old_schema_db(path: &Path) {
    let conn = Connection::open(path).unwrap();

    conn.execute_batch(
        r#"
        CREATE TABLE projects (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            is_default BOOLEAN NOT NULL DEFAULT 0,
            created TEXT NOT NULL,
            updated TEXT NOT NULL
        );

        CREATE TABLE builds (
            id INTEGER PRIMARY KEY,
            project_id INTEGER NOT NULL,
            outcome INTEGER NOT NULL
        );

        PRAGMA user_version = 0;
        "#,
    )
    .unwrap();

    conn.execute(
        "INSERT INTO projects (id, name, is_default, created, updated)
         VALUES (1, 'old project', 0, '2024-01-01 00:00:00', '2024-01-01 00:00:00')",
        [],
    )
    .unwrap();
}

fn project(id: i64, name: &str) -> ProjectRecord {
    let ts = NaiveDate::from_ymd_opt(2026, 1, 5)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    ProjectRecord {
        id: ProjectId::new(id),
        name: name.to_string(),
        is_default: false,
        release_id: None,
        machine: None,
        created: ts,
        updated: ts,
    }
}

fn user_version(path: &Path) -> i32 {
    let conn = Connection::open(path).unwrap();
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn test_auto_migration_from_old_schema() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("toaster.db");

    create_old_schema_db(&db_path);
    assert_eq!(user_version(&db_path), 0);

    let mut db = Database::open(&db_path).expect("Database::open should migrate the old schema");
    assert_eq!(user_version(&db_path), SCHEMA_VERSION);

    // New columns are usable after migration
    let mut data = Dataset::default();
    let mut record = project(2, "new project");
    record.machine = Some("qemuarm64".to_string());
    data.projects.push(record);
    db.import(&data).unwrap();

    let loaded = db.get_project(ProjectId::new(2)).unwrap().unwrap();
    assert_eq!(loaded.machine.as_deref(), Some("qemuarm64"));
}

#[test]
fn test_old_data_is_cleared_on_migration() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("toaster.db");

    create_old_schema_db(&db_path);
    let db = Database::open(&db_path).unwrap();

    assert!(
        db.get_project(ProjectId::new(1)).unwrap().is_none(),
        "Old projects should be cleared after migration"
    );
    assert_eq!(db.projects().count(db.conn()).unwrap(), 0);
}

#[test]
fn test_current_version_preserves_data() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("toaster.db");

    let mut db = Database::open(&db_path).unwrap();
    let mut data = Dataset::default();
    data.projects.push(project(7, "kept"));
    db.import(&data).unwrap();
    drop(db);

    let db = Database::open(&db_path).unwrap();
    let loaded = db.get_project(ProjectId::new(7)).unwrap().unwrap();
    assert_eq!(loaded.name, "kept");
}

#[test]
fn test_read_only_open_leaves_file_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("toaster.db");

    let mut db = Database::open(&db_path).unwrap();
    let mut data = Dataset::default();
    data.projects.push(project(3, "demo"));
    db.import(&data).unwrap();
    drop(db);
    let before = std::fs::read(&db_path).unwrap();

    let db = Database::open_read_only(&db_path).unwrap();
    assert_eq!(db.projects().count(db.conn()).unwrap(), 1);
    assert_eq!(db.builds().fetch(db.conn(), None).unwrap().len(), 0);
    assert!(db.get_project(ProjectId::new(3)).unwrap().is_some());
    drop(db);

    assert_eq!(std::fs::read(&db_path).unwrap(), before);
}

#[test]
fn test_read_only_open_rejects_old_schema_without_clearing_it() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("toaster.db");
    create_old_schema_db(&db_path);

    let err = Database::open_read_only(&db_path).err().unwrap();
    assert!(matches!(
        err,
        Error::SchemaVersion { found: 0, expected } if expected == SCHEMA_VERSION
    ));
    assert!(err.to_string().contains("Re-import the dataset"));

    assert_eq!(user_version(&db_path), 0);
    let conn = Connection::open(&db_path).unwrap();
    let name: String = conn
        .query_row("SELECT name FROM projects WHERE id = 1", [], |row| row.get(0))
        .unwrap();
    assert_eq!(name, "old project");
}

#[test]
fn test_read_only_open_does_not_create_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("missing.db");

    assert!(matches!(Database::open_read_only(&db_path), Err(Error::Database(_))));
    assert!(!db_path.exists());
}

#[test]
fn test_dataset_from_json_defaults() {
    let json = r#"{
        "projects": [
            {"id": 1, "name": "p", "created": "2026-01-05T12:00:00", "updated": "2026-01-05T12:00:00"}
        ],
        "project_layers": [{"project_id": 1, "layer_version_id": 4}]
    }"#;

    let data = Dataset::from_json(json).unwrap();
    assert_eq!(data.projects.len(), 1);
    assert!(data.builds.is_empty());
    assert!(data.project_layers[0].optional);
}
