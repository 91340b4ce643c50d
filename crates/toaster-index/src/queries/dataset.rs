use rusqlite::{Connection, params};
use toaster_types::format_timestamp;
use tracing::debug;

use crate::records::{Dataset, ImportStats};
use crate::{Error, Result};

// Rows are keyed by their exported ids; importing the same dataset twice
// replaces rather than duplicates. Parents are written before children.

pub fn import(conn: &Connection, dataset: &Dataset) -> Result<ImportStats> {
    let defaults = dataset.projects.iter().filter(|p| p.is_default).count();
    if defaults > 1 {
        return Err(Error::Query(format!(
            "dataset has {} default projects, expected at most one",
            defaults
        )));
    }

    for release in &dataset.releases {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO releases (id, name, description, branch_name)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![release.id, &release.name, &release.description, &release.branch_name],
        )?;
    }

    for layer in &dataset.layers {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO layers (id, name, summary, description, vcs_url, vcs_web_url,
                                           vcs_web_tree_base_url, vcs_web_file_base_url)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                layer.id,
                &layer.name,
                &layer.summary,
                &layer.description,
                &layer.vcs_url,
                &layer.vcs_web_url,
                &layer.vcs_web_tree_base_url,
                &layer.vcs_web_file_base_url
            ],
        )?;
    }

    for project in &dataset.projects {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO projects (id, name, is_default, release_id, machine, created, updated)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                project.id,
                &project.name,
                project.is_default,
                project.release_id,
                &project.machine,
                format_timestamp(&project.created),
                format_timestamp(&project.updated)
            ],
        )?;
    }

    for build in &dataset.builds {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO builds (id, project_id, machine, outcome, started_on, completed_on,
                                           cooker_log_path)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                build.id,
                build.project_id,
                &build.machine,
                build.outcome.code(),
                format_timestamp(&build.started_on),
                format_timestamp(&build.completed_on),
                &build.cooker_log_path
            ],
        )?;
    }

    for lv in &dataset.layer_versions {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO layer_versions (id, layer_id, release_id, project_id, build_id,
                                                   branch, commit_ref, dirpath)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                lv.id,
                lv.layer_id,
                lv.release_id,
                lv.project_id,
                lv.build_id,
                &lv.branch,
                &lv.commit,
                &lv.dirpath
            ],
        )?;
    }

    for dep in &dataset.layer_dependencies {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO layer_version_dependencies (layer_version_id, depends_on_id)
            VALUES (?1, ?2)
            "#,
            params![dep.layer_version_id, dep.depends_on_id],
        )?;
    }

    for pl in &dataset.project_layers {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO project_layers (project_id, layer_version_id, optional)
            VALUES (?1, ?2, ?3)
            "#,
            params![pl.project_id, pl.layer_version_id, pl.optional],
        )?;
    }

    for recipe in &dataset.recipes {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO recipes (id, name, version, summary, description, section, license,
                                            file_path, is_image, layer_version_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                recipe.id,
                &recipe.name,
                &recipe.version,
                &recipe.summary,
                &recipe.description,
                &recipe.section,
                &recipe.license,
                &recipe.file_path,
                recipe.is_image,
                recipe.layer_version_id
            ],
        )?;
    }

    for machine in &dataset.machines {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO machines (id, name, description, layer_version_id)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![machine.id, &machine.name, &machine.description, machine.layer_version_id],
        )?;
    }

    for target in &dataset.targets {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO targets (id, build_id, target, task)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![target.id, target.build_id, &target.target, &target.task],
        )?;
    }

    for file in &dataset.target_image_files {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO target_image_files (target_id, file_name, file_size)
            VALUES (?1, ?2, ?3)
            "#,
            params![file.target_id, &file.file_name, file.file_size],
        )?;
    }

    for task in &dataset.tasks {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO tasks (id, build_id, recipe_name, task_name, outcome)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                task.id,
                task.build_id,
                &task.recipe_name,
                &task.task_name,
                task.outcome.code()
            ],
        )?;
    }

    for package in &dataset.packages {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO packages (id, build_id, name, version, revision, size, summary)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                package.id,
                package.build_id,
                &package.name,
                &package.version,
                &package.revision,
                package.size,
                &package.summary
            ],
        )?;
    }

    for recipe in &dataset.custom_image_recipes {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO custom_image_recipes (id, name, base_recipe_id, project_id, file_path)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                recipe.id,
                &recipe.name,
                recipe.base_recipe_id,
                recipe.project_id,
                &recipe.file_path
            ],
        )?;

        conn.execute(
            "DELETE FROM custom_image_packages WHERE recipe_id = ?1",
            [recipe.id],
        )?;
        for package_id in &recipe.packages {
            conn.execute(
                r#"
                INSERT OR REPLACE INTO custom_image_packages (recipe_id, package_id)
                VALUES (?1, ?2)
                "#,
                params![recipe.id, package_id],
            )?;
        }
    }

    for message in &dataset.log_messages {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO log_messages (id, build_id, level, message)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![message.id, message.build_id, message.level.code(), &message.message],
        )?;
    }

    let stats = ImportStats {
        projects: dataset.projects.len(),
        layer_versions: dataset.layer_versions.len(),
        recipes: dataset.recipes.len(),
        machines: dataset.machines.len(),
        builds: dataset.builds.len(),
        packages: dataset.packages.len(),
        log_messages: dataset.log_messages.len(),
    };
    debug!(?stats, "dataset imported");

    Ok(stats)
}
