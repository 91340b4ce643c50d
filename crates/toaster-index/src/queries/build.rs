use rusqlite::types::Value;
use rusqlite::{Connection, Row};
use toaster_types::{Build, BuildId, BuildOutcome, ProjectId, Target, Task, TaskOutcome, image_file_extensions};

use super::{build_outcome, task_outcome, timestamp};
use crate::Result;
use crate::queryset::{OrderBy, Page, Predicate, Queryset};
use crate::records::BuildSummary;

pub const SEARCH_FIELDS: &[&str] = &["machine", "cooker_log_path", "targets_text", "project_name"];

/// Builds annotated with their project and log message counts.
///
/// `errors_no` counts ERROR and EXCEPTION messages, `warnings_no` WARNING
/// messages; CRITICAL and INFO count towards neither.
pub fn queryset() -> Queryset<BuildSummary> {
    Queryset::new(
        r#"
        SELECT b.id, b.project_id, b.machine, b.outcome, b.started_on, b.completed_on,
               b.cooker_log_path,
               p.name AS project_name, p.is_default AS project_is_default,
               (SELECT COUNT(*) FROM log_messages lm
                 WHERE lm.build_id = b.id AND lm.level IN (2, 4)) AS errors_no,
               (SELECT COUNT(*) FROM log_messages lm
                 WHERE lm.build_id = b.id AND lm.level = 1) AS warnings_no,
               (SELECT GROUP_CONCAT(t.target, ' ') FROM targets t
                 WHERE t.build_id = b.id) AS targets_text
        FROM builds b
        JOIN projects p ON p.id = b.project_id
        "#,
        Vec::new(),
        build_summary_from_row,
    )
}

fn build_summary_from_row(row: &Row<'_>) -> rusqlite::Result<BuildSummary> {
    Ok(BuildSummary {
        build: Build {
            id: row.get("id")?,
            project_id: row.get("project_id")?,
            machine: row.get("machine")?,
            outcome: build_outcome(row, "outcome")?,
            started_on: timestamp(row, "started_on")?,
            completed_on: timestamp(row, "completed_on")?,
            cooker_log_path: row.get("cooker_log_path")?,
        },
        project_name: row.get("project_name")?,
        project_is_default: row.get("project_is_default")?,
        errors_no: row.get("errors_no")?,
        warnings_no: row.get("warnings_no")?,
        failed_tasks: Vec::new(),
        target_labels: Vec::new(),
        image_extensions: String::new(),
    })
}

pub fn outcome_is(outcome: BuildOutcome) -> Predicate {
    Predicate::eq("outcome", outcome.code())
}

pub fn in_project(project_id: ProjectId) -> Predicate {
    Predicate::eq("project_id", project_id.get())
}

/// Builds with at least one task that failed.
pub fn has_failed_tasks() -> Predicate {
    Predicate::raw(
        "EXISTS (SELECT 1 FROM tasks t WHERE t.build_id = q.id AND t.outcome = ?)",
        vec![Value::Integer(TaskOutcome::Failed.code())],
    )
}

pub fn failed_tasks(conn: &Connection, build_id: BuildId) -> Result<Vec<Task>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, build_id, recipe_name, task_name, outcome
        FROM tasks
        WHERE build_id = ?1 AND outcome = ?2
        ORDER BY id
        "#,
    )?;

    let tasks = stmt
        .query_map([build_id.get(), TaskOutcome::Failed.code()], |row| {
            Ok(Task {
                id: row.get("id")?,
                build_id: row.get("build_id")?,
                recipe_name: row.get("recipe_name")?,
                task_name: row.get("task_name")?,
                outcome: task_outcome(row, "outcome")?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(tasks)
}

pub fn targets(conn: &Connection, build_id: BuildId) -> Result<Vec<Target>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, build_id, target, task
        FROM targets
        WHERE build_id = ?1
        ORDER BY id
        "#,
    )?;

    let targets = stmt
        .query_map([build_id.get()], |row| {
            Ok(Target {
                id: row.get(0)?,
                build_id: row.get(1)?,
                target: row.get(2)?,
                task: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(targets)
}

/// Distinct image file types produced by a build, e.g. `ext4, tar.bz2`.
pub fn image_extensions(conn: &Connection, build_id: BuildId) -> Result<String> {
    let mut stmt = conn.prepare(
        r#"
        SELECT f.file_name
        FROM target_image_files f
        JOIN targets t ON t.id = f.target_id
        WHERE t.build_id = ?1
        "#,
    )?;

    let names = stmt
        .query_map([build_id.get()], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(image_file_extensions(names.iter().map(String::as_str)))
}

/// Load failed tasks, target labels and image types for one page of rows.
pub fn decorate(conn: &Connection, rows: &mut [BuildSummary]) -> Result<()> {
    for row in rows.iter_mut() {
        let id = row.build.id;
        row.failed_tasks = failed_tasks(conn, id)?;
        row.target_labels = targets(conn, id)?.iter().map(Target::label).collect();
        row.image_extensions = image_extensions(conn, id)?;
    }
    Ok(())
}

/// Builds still running (newest first) followed by the three most
/// recently completed finished builds.
pub fn recent(conn: &Connection, project_id: Option<ProjectId>) -> Result<Vec<BuildSummary>> {
    let mut base = queryset();
    if let Some(pid) = project_id {
        base = base.filter(in_project(pid));
    }

    let mut builds = base
        .clone()
        .filter(outcome_is(BuildOutcome::InProgress))
        .order_by(vec![OrderBy::desc("started_on")])
        .fetch(conn, None)?;

    let finished = base
        .filter(outcome_is(BuildOutcome::Succeeded).or(outcome_is(BuildOutcome::Failed)))
        .order_by(vec![OrderBy::desc("completed_on")])
        .fetch(conn, Some(Page::new(1, 3)))?;
    builds.extend(finished);

    decorate(conn, &mut builds)?;
    Ok(builds)
}
