use rusqlite::{Connection, OptionalExtension, Row};
use toaster_types::{BuildId, Project, ProjectId, Release};

use super::{build, build_outcome, timestamp};
use crate::Result;
use crate::queryset::{Predicate, Queryset};
use crate::records::{LastBuild, ProjectSummary};

pub const SEARCH_FIELDS: &[&str] = &["name", "release_name", "machine"];

const PROJECT_COLUMNS: &str = r#"
    p.id, p.name, p.is_default, p.release_id, p.machine, p.created, p.updated,
    rel.name AS release_name, rel.description AS release_description,
    rel.branch_name AS release_branch_name
"#;

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    let release = match row.get::<_, Option<i64>>("release_id")? {
        Some(id) => Some(Release {
            id: id.into(),
            name: row.get::<_, Option<String>>("release_name")?.unwrap_or_default(),
            description: row
                .get::<_, Option<String>>("release_description")?
                .unwrap_or_default(),
            branch_name: row
                .get::<_, Option<String>>("release_branch_name")?
                .unwrap_or_default(),
        }),
        None => None,
    };

    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        is_default: row.get("is_default")?,
        release,
        machine: row.get("machine")?,
        created: timestamp(row, "created")?,
        updated: timestamp(row, "updated")?,
    })
}

pub fn get(conn: &Connection, id: ProjectId) -> Result<Option<Project>> {
    let sql = format!(
        "SELECT {} FROM projects p LEFT JOIN releases rel ON rel.id = p.release_id WHERE p.id = ?1",
        PROJECT_COLUMNS
    );
    let project = conn.query_row(&sql, [id.get()], project_from_row).optional()?;
    Ok(project)
}

/// Projects annotated with build counts and the id of the last finished build.
///
/// `num_builds` counts every build; `finished_builds` only those that ran
/// to completion. The last build is the most recently completed one that
/// is no longer in progress.
pub fn queryset() -> Queryset<ProjectSummary> {
    let source = format!(
        r#"
        SELECT {columns},
               (SELECT COUNT(*) FROM builds b WHERE b.project_id = p.id) AS num_builds,
               (SELECT COUNT(*) FROM builds b
                 WHERE b.project_id = p.id AND b.outcome IN (0, 1)) AS finished_builds,
               (SELECT b.id FROM builds b
                 WHERE b.project_id = p.id AND b.outcome != 2
                 ORDER BY b.completed_on DESC, b.id DESC LIMIT 1) AS last_build_id
        FROM projects p
        LEFT JOIN releases rel ON rel.id = p.release_id
        "#,
        columns = PROJECT_COLUMNS
    );

    Queryset::new(source, Vec::new(), |row| {
        Ok(ProjectSummary {
            project: project_from_row(row)?,
            num_builds: row.get("num_builds")?,
            finished_builds: row.get("finished_builds")?,
            last_build_id: row.get("last_build_id")?,
            last_build: None,
        })
    })
}

/// Hides the default (command line builds) project until it has builds.
pub fn visible() -> Predicate {
    Predicate::raw("q.is_default = 0 OR q.num_builds > 0", Vec::new())
}

pub fn last_build(conn: &Connection, build_id: BuildId) -> Result<Option<LastBuild>> {
    let row = conn
        .query_row(
            r#"
            SELECT b.id, b.outcome,
                   (SELECT t.target FROM targets t WHERE t.build_id = b.id
                     ORDER BY t.id LIMIT 1) AS target,
                   (SELECT COUNT(*) FROM log_messages lm
                     WHERE lm.build_id = b.id AND lm.level IN (2, 4)) AS errors,
                   (SELECT COUNT(*) FROM log_messages lm
                     WHERE lm.build_id = b.id AND lm.level = 1) AS warnings
            FROM builds b
            WHERE b.id = ?1
            "#,
            [build_id.get()],
            |row| {
                Ok((
                    row.get::<_, BuildId>("id")?,
                    build_outcome(row, "outcome")?,
                    row.get::<_, Option<String>>("target")?,
                    row.get::<_, i64>("errors")?,
                    row.get::<_, i64>("warnings")?,
                ))
            },
        )
        .optional()?;

    let Some((id, outcome, target, errors, warnings)) = row else {
        return Ok(None);
    };

    Ok(Some(LastBuild {
        id,
        outcome,
        target: target.unwrap_or_default(),
        errors,
        warnings,
        image_extensions: build::image_extensions(conn, id)?,
    }))
}

/// Load last-build details for one page of rows.
pub fn decorate(conn: &Connection, rows: &mut [ProjectSummary]) -> Result<()> {
    for row in rows.iter_mut() {
        row.last_build = match row.last_build_id {
            Some(id) => last_build(conn, id)?,
            None => None,
        };
    }
    Ok(())
}
