use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row};
use toaster_types::{Layer, LayerDependency, LayerVersion, LayerVersionId, Project, ProjectId, Release};

use crate::Result;
use crate::queryset::{Predicate, Queryset};
use crate::records::LayerSummary;

/// Joins that bring a layer version's layer (`l`) and release (`rel`) in
/// alongside `lv`.
pub(crate) const LAYER_VERSION_JOINS: &str =
    "JOIN layers l ON l.id = lv.layer_id LEFT JOIN releases rel ON rel.id = lv.release_id";

/// Select list for a layer version with every column name prefixed.
pub(crate) fn layer_version_columns(prefix: &str) -> String {
    format!(
        r#"lv.id AS {p}id, lv.layer_id AS {p}layer_id, lv.release_id AS {p}release_id,
           lv.project_id AS {p}project_id, lv.build_id AS {p}build_id,
           lv.branch AS {p}branch, lv.commit_ref AS {p}commit_ref, lv.dirpath AS {p}dirpath,
           l.name AS {p}layer_name, l.summary AS {p}layer_summary,
           l.description AS {p}layer_description, l.vcs_url AS {p}layer_vcs_url,
           l.vcs_web_url AS {p}vcs_web_url, l.vcs_web_tree_base_url AS {p}vcs_web_tree_base_url,
           l.vcs_web_file_base_url AS {p}vcs_web_file_base_url,
           rel.name AS {p}release_name, rel.description AS {p}release_description,
           rel.branch_name AS {p}release_branch_name"#,
        p = prefix
    )
}

pub(crate) fn layer_version_from_row(row: &Row<'_>, prefix: &str) -> rusqlite::Result<LayerVersion> {
    let col = |name: &str| format!("{}{}", prefix, name);

    let release = match row.get::<_, Option<i64>>(col("release_id").as_str())? {
        Some(id) => Some(Release {
            id: id.into(),
            name: row
                .get::<_, Option<String>>(col("release_name").as_str())?
                .unwrap_or_default(),
            description: row
                .get::<_, Option<String>>(col("release_description").as_str())?
                .unwrap_or_default(),
            branch_name: row
                .get::<_, Option<String>>(col("release_branch_name").as_str())?
                .unwrap_or_default(),
        }),
        None => None,
    };

    Ok(LayerVersion {
        id: row.get(col("id").as_str())?,
        layer: Layer {
            id: row.get(col("layer_id").as_str())?,
            name: row.get(col("layer_name").as_str())?,
            summary: row.get(col("layer_summary").as_str())?,
            description: row.get(col("layer_description").as_str())?,
            vcs_url: row.get(col("layer_vcs_url").as_str())?,
            vcs_web_url: row.get(col("vcs_web_url").as_str())?,
            vcs_web_tree_base_url: row.get(col("vcs_web_tree_base_url").as_str())?,
            vcs_web_file_base_url: row.get(col("vcs_web_file_base_url").as_str())?,
        },
        release,
        project_id: row.get(col("project_id").as_str())?,
        build_id: row.get(col("build_id").as_str())?,
        branch: row.get(col("branch").as_str())?,
        commit: row.get(col("commit_ref").as_str())?,
        dirpath: row.get(col("dirpath").as_str())?,
    })
}

/// Layer versions where a project could pick its layers from, under the
/// given column prefix: versions of the project's release not tied to a
/// build or another project, plus layers imported into the project.
///
/// A project without a release has no compatible layers at all.
pub(crate) fn compatible_with_prefixed(project: &Project, prefix: &str) -> Predicate {
    let Some(release) = project.release.as_ref() else {
        return Predicate::never();
    };

    Predicate::raw(
        format!(
            "(q.{p}build_id IS NULL AND q.{p}project_id IS NULL AND q.{p}release_id = ?) \
             OR q.{p}project_id = ?",
            p = prefix
        ),
        vec![Value::Integer(release.id.get()), Value::Integer(project.id.get())],
    )
}

pub fn compatible_with(project: &Project) -> Predicate {
    compatible_with_prefixed(project, "")
}

/// Columns a free-text search over layer versions looks at.
pub const SEARCH_FIELDS: &[&str] = &[
    "layer_name",
    "layer_summary",
    "layer_description",
    "layer_vcs_url",
    "dirpath",
    "release_name",
    "commit_ref",
    "branch",
];

pub fn queryset() -> Queryset<LayerSummary> {
    let source = format!(
        r#"
        SELECT {columns},
               (SELECT COUNT(*) FROM layer_version_dependencies d
                 WHERE d.layer_version_id = lv.id) AS dependencies_count
        FROM layer_versions lv
        {joins}
        "#,
        columns = layer_version_columns(""),
        joins = LAYER_VERSION_JOINS
    );

    Queryset::new(source, Vec::new(), |row| {
        Ok(LayerSummary {
            layer_version: layer_version_from_row(row, "")?,
            dependencies_count: row.get("dependencies_count")?,
            dependencies: Vec::new(),
        })
    })
}

pub fn get(conn: &Connection, id: LayerVersionId) -> Result<Option<LayerVersion>> {
    let sql = format!(
        "SELECT {} FROM layer_versions lv {} WHERE lv.id = ?1",
        layer_version_columns(""),
        LAYER_VERSION_JOINS
    );
    let layer_version = conn
        .query_row(&sql, [id.get()], |row| layer_version_from_row(row, ""))
        .optional()?;

    Ok(layer_version)
}

/// Ids of the layer versions added to a project.
pub fn project_layer_ids(conn: &Connection, project_id: ProjectId) -> Result<Vec<LayerVersionId>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT layer_version_id
        FROM project_layers
        WHERE project_id = ?1
        ORDER BY layer_version_id
        "#,
    )?;

    let ids = stmt
        .query_map([project_id.get()], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(ids)
}

/// How many times a layer version was added to a project (0 or 1).
pub fn count_in_project(
    conn: &Connection,
    project_id: ProjectId,
    layer_version_id: LayerVersionId,
) -> Result<usize> {
    let count: i64 = conn.query_row(
        r#"
        SELECT COUNT(*)
        FROM project_layers
        WHERE project_id = ?1 AND layer_version_id = ?2
        "#,
        [project_id.get(), layer_version_id.get()],
        |row| row.get(0),
    )?;

    Ok(count as usize)
}

pub fn dependencies(conn: &Connection, id: LayerVersionId) -> Result<Vec<LayerDependency>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT d.layer_version_id, d.depends_on_id, l.name
        FROM layer_version_dependencies d
        JOIN layer_versions lv ON lv.id = d.depends_on_id
        JOIN layers l ON l.id = lv.layer_id
        WHERE d.layer_version_id = ?1
        ORDER BY l.name, d.depends_on_id
        "#,
    )?;

    let deps = stmt
        .query_map([id.get()], |row| {
            Ok(LayerDependency {
                layer_version_id: row.get(0)?,
                depends_on: row.get(1)?,
                depends_on_name: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(deps)
}

/// Load dependency lists for one page of rows.
pub fn decorate(conn: &Connection, rows: &mut [LayerSummary]) -> Result<()> {
    for row in rows.iter_mut() {
        row.dependencies = dependencies(conn, row.layer_version.id)?;
    }
    Ok(())
}
