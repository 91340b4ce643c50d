use rusqlite::Connection;

use crate::{Error, Result};

// Schema version (increment when changing table definitions)
pub const SCHEMA_VERSION: i32 = 1;

// The store mirrors the dashboard's relational model. Domain rows are owned
// by the build system; this crate never mutates them outside dataset import,
// so a version mismatch simply drops everything and expects a re-import.

fn user_version(conn: &Connection) -> Result<i32> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

/// Fail unless the store was written with the current schema.
pub fn check_version(conn: &Connection) -> Result<()> {
    let found = user_version(conn)?;
    if found != SCHEMA_VERSION {
        return Err(Error::SchemaVersion {
            found,
            expected: SCHEMA_VERSION,
        });
    }
    Ok(())
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    if user_version(conn)? != SCHEMA_VERSION {
        drop_all_tables(conn)?;
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS releases (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            branch_name TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS layers (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            summary TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            vcs_url TEXT NOT NULL DEFAULT '',
            vcs_web_url TEXT,
            vcs_web_tree_base_url TEXT,
            vcs_web_file_base_url TEXT
        );

        CREATE TABLE IF NOT EXISTS projects (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            is_default BOOLEAN NOT NULL DEFAULT 0,
            release_id INTEGER,
            machine TEXT,
            created TEXT NOT NULL,
            updated TEXT NOT NULL,
            FOREIGN KEY (release_id) REFERENCES releases(id)
        );

        CREATE TABLE IF NOT EXISTS builds (
            id INTEGER PRIMARY KEY,
            project_id INTEGER NOT NULL,
            machine TEXT NOT NULL DEFAULT '',
            outcome INTEGER NOT NULL,
            started_on TEXT NOT NULL,
            completed_on TEXT NOT NULL,
            cooker_log_path TEXT,
            FOREIGN KEY (project_id) REFERENCES projects(id)
        );

        CREATE TABLE IF NOT EXISTS layer_versions (
            id INTEGER PRIMARY KEY,
            layer_id INTEGER NOT NULL,
            release_id INTEGER,
            project_id INTEGER,
            build_id INTEGER,
            branch TEXT NOT NULL DEFAULT '',
            commit_ref TEXT NOT NULL DEFAULT '',
            dirpath TEXT NOT NULL DEFAULT '',
            FOREIGN KEY (layer_id) REFERENCES layers(id),
            FOREIGN KEY (release_id) REFERENCES releases(id),
            FOREIGN KEY (project_id) REFERENCES projects(id),
            FOREIGN KEY (build_id) REFERENCES builds(id)
        );

        CREATE TABLE IF NOT EXISTS layer_version_dependencies (
            layer_version_id INTEGER NOT NULL,
            depends_on_id INTEGER NOT NULL,
            PRIMARY KEY (layer_version_id, depends_on_id),
            FOREIGN KEY (layer_version_id) REFERENCES layer_versions(id),
            FOREIGN KEY (depends_on_id) REFERENCES layer_versions(id)
        );

        CREATE TABLE IF NOT EXISTS project_layers (
            project_id INTEGER NOT NULL,
            layer_version_id INTEGER NOT NULL,
            optional BOOLEAN NOT NULL DEFAULT 1,
            PRIMARY KEY (project_id, layer_version_id),
            FOREIGN KEY (project_id) REFERENCES projects(id),
            FOREIGN KEY (layer_version_id) REFERENCES layer_versions(id)
        );

        CREATE TABLE IF NOT EXISTS recipes (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL DEFAULT '',
            version TEXT NOT NULL DEFAULT '',
            summary TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            section TEXT NOT NULL DEFAULT '',
            license TEXT NOT NULL DEFAULT '',
            file_path TEXT NOT NULL DEFAULT '',
            is_image BOOLEAN NOT NULL DEFAULT 0,
            layer_version_id INTEGER NOT NULL,
            FOREIGN KEY (layer_version_id) REFERENCES layer_versions(id)
        );

        CREATE TABLE IF NOT EXISTS machines (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            layer_version_id INTEGER NOT NULL,
            FOREIGN KEY (layer_version_id) REFERENCES layer_versions(id)
        );

        CREATE TABLE IF NOT EXISTS packages (
            id INTEGER PRIMARY KEY,
            build_id INTEGER,
            name TEXT NOT NULL,
            version TEXT NOT NULL DEFAULT '',
            revision TEXT NOT NULL DEFAULT '',
            size INTEGER NOT NULL DEFAULT 0,
            summary TEXT NOT NULL DEFAULT '',
            FOREIGN KEY (build_id) REFERENCES builds(id)
        );

        CREATE TABLE IF NOT EXISTS custom_image_recipes (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            base_recipe_id INTEGER,
            project_id INTEGER NOT NULL,
            file_path TEXT NOT NULL DEFAULT '',
            FOREIGN KEY (base_recipe_id) REFERENCES recipes(id),
            FOREIGN KEY (project_id) REFERENCES projects(id)
        );

        CREATE TABLE IF NOT EXISTS custom_image_packages (
            recipe_id INTEGER NOT NULL,
            package_id INTEGER NOT NULL,
            PRIMARY KEY (recipe_id, package_id),
            FOREIGN KEY (recipe_id) REFERENCES custom_image_recipes(id),
            FOREIGN KEY (package_id) REFERENCES packages(id)
        );

        CREATE TABLE IF NOT EXISTS targets (
            id INTEGER PRIMARY KEY,
            build_id INTEGER NOT NULL,
            target TEXT NOT NULL,
            task TEXT,
            FOREIGN KEY (build_id) REFERENCES builds(id)
        );

        CREATE TABLE IF NOT EXISTS target_image_files (
            target_id INTEGER NOT NULL,
            file_name TEXT NOT NULL,
            file_size INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (target_id, file_name),
            FOREIGN KEY (target_id) REFERENCES targets(id)
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY,
            build_id INTEGER NOT NULL,
            recipe_name TEXT NOT NULL DEFAULT '',
            task_name TEXT NOT NULL,
            outcome INTEGER NOT NULL,
            FOREIGN KEY (build_id) REFERENCES builds(id)
        );

        CREATE TABLE IF NOT EXISTS log_messages (
            id INTEGER PRIMARY KEY,
            build_id INTEGER NOT NULL,
            level INTEGER NOT NULL,
            message TEXT NOT NULL DEFAULT '',
            FOREIGN KEY (build_id) REFERENCES builds(id)
        );

        CREATE INDEX IF NOT EXISTS idx_layer_versions_release ON layer_versions(release_id);
        CREATE INDEX IF NOT EXISTS idx_layer_versions_project ON layer_versions(project_id);
        CREATE INDEX IF NOT EXISTS idx_recipes_layer_version ON recipes(layer_version_id);
        CREATE INDEX IF NOT EXISTS idx_machines_layer_version ON machines(layer_version_id);
        CREATE INDEX IF NOT EXISTS idx_builds_project ON builds(project_id);
        CREATE INDEX IF NOT EXISTS idx_builds_completed ON builds(completed_on DESC);
        CREATE INDEX IF NOT EXISTS idx_tasks_build ON tasks(build_id, outcome);
        CREATE INDEX IF NOT EXISTS idx_log_messages_build ON log_messages(build_id, level);
        CREATE INDEX IF NOT EXISTS idx_packages_build ON packages(build_id);
        CREATE INDEX IF NOT EXISTS idx_targets_build ON targets(build_id);
        "#,
    )?;

    conn.execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION), [])?;

    Ok(())
}

fn drop_all_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DROP TABLE IF EXISTS log_messages;
        DROP TABLE IF EXISTS tasks;
        DROP TABLE IF EXISTS target_image_files;
        DROP TABLE IF EXISTS targets;
        DROP TABLE IF EXISTS custom_image_packages;
        DROP TABLE IF EXISTS custom_image_recipes;
        DROP TABLE IF EXISTS packages;
        DROP TABLE IF EXISTS machines;
        DROP TABLE IF EXISTS recipes;
        DROP TABLE IF EXISTS project_layers;
        DROP TABLE IF EXISTS layer_version_dependencies;
        DROP TABLE IF EXISTS layer_versions;
        DROP TABLE IF EXISTS builds;
        DROP TABLE IF EXISTS projects;
        DROP TABLE IF EXISTS layers;
        DROP TABLE IF EXISTS releases;
        "#,
    )?;
    Ok(())
}
