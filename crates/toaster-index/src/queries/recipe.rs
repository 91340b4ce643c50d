use rusqlite::{Connection, OptionalExtension, Row};
use toaster_types::{CustomImageRecipe, Machine, PackageId, Project, ProjectId, Recipe, RecipeId};

use super::layer::{LAYER_VERSION_JOINS, compatible_with_prefixed, layer_version_columns, layer_version_from_row};
use crate::Result;
use crate::queryset::{Predicate, Queryset};

// Recipes and machines both hang off a layer version; its columns are
// selected under the `lv_` prefix so `q.lv_id` and `q.lv_layer_name` can be
// filtered and ordered on.

const LV: &str = "lv_";

pub const RECIPE_SEARCH_FIELDS: &[&str] = &[
    "name",
    "version",
    "file_path",
    "section",
    "summary",
    "description",
    "license",
    "lv_layer_name",
    "lv_branch",
    "lv_commit_ref",
];

pub const MACHINE_SEARCH_FIELDS: &[&str] = &["name", "description"];

pub const CUSTOM_IMAGE_SEARCH_FIELDS: &[&str] = &["name", "file_path"];

fn recipe_from_row(row: &Row<'_>) -> rusqlite::Result<Recipe> {
    Ok(Recipe {
        id: row.get("id")?,
        name: row.get("name")?,
        version: row.get("version")?,
        summary: row.get("summary")?,
        description: row.get("description")?,
        section: row.get("section")?,
        license: row.get("license")?,
        file_path: row.get("file_path")?,
        is_image: row.get("is_image")?,
        layer_version: layer_version_from_row(row, LV)?,
    })
}

pub fn queryset() -> Queryset<Recipe> {
    let source = format!(
        r#"
        SELECT r.id, r.name, r.version, r.summary, r.description, r.section,
               r.license, r.file_path, r.is_image, {columns}
        FROM recipes r
        JOIN layer_versions lv ON lv.id = r.layer_version_id
        {joins}
        "#,
        columns = layer_version_columns(LV),
        joins = LAYER_VERSION_JOINS
    );
    Queryset::new(source, Vec::new(), recipe_from_row)
}

/// Named recipes provided by layer versions compatible with the project.
pub fn compatible_with(project: &Project) -> Predicate {
    compatible_with_prefixed(project, LV).and(Predicate::raw("q.name != ''", Vec::new()))
}

pub fn is_image(value: bool) -> Predicate {
    Predicate::eq("is_image", value)
}

/// Rows whose layer version is one of `ids`.
pub fn provided_by(ids: impl IntoIterator<Item = i64>) -> Predicate {
    Predicate::is_in("lv_id", ids)
}

fn machine_from_row(row: &Row<'_>) -> rusqlite::Result<Machine> {
    Ok(Machine {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        layer_version: layer_version_from_row(row, LV)?,
    })
}

pub fn machine_queryset() -> Queryset<Machine> {
    let source = format!(
        r#"
        SELECT m.id, m.name, m.description, {columns}
        FROM machines m
        JOIN layer_versions lv ON lv.id = m.layer_version_id
        {joins}
        "#,
        columns = layer_version_columns(LV),
        joins = LAYER_VERSION_JOINS
    );
    Queryset::new(source, Vec::new(), machine_from_row)
}

pub fn machine_compatible_with(project: &Project) -> Predicate {
    compatible_with_prefixed(project, LV)
}

fn custom_image_from_row(row: &Row<'_>) -> rusqlite::Result<CustomImageRecipe> {
    Ok(CustomImageRecipe {
        id: row.get("id")?,
        name: row.get("name")?,
        base_recipe_id: row.get("base_recipe_id")?,
        project_id: row.get("project_id")?,
        file_path: row.get("file_path")?,
        package_count: row.get("package_count")?,
    })
}

const CUSTOM_IMAGE_SOURCE: &str = r#"
    SELECT c.id, c.name, c.base_recipe_id, c.project_id, c.file_path,
           (SELECT COUNT(*) FROM custom_image_packages cp
             WHERE cp.recipe_id = c.id) AS package_count
    FROM custom_image_recipes c
"#;

pub fn custom_image_queryset() -> Queryset<CustomImageRecipe> {
    Queryset::new(CUSTOM_IMAGE_SOURCE, Vec::new(), custom_image_from_row)
}

pub fn custom_image_in_project(project_id: ProjectId) -> Predicate {
    Predicate::eq("project_id", project_id.get())
}

pub fn get_custom_image(conn: &Connection, id: RecipeId) -> Result<Option<CustomImageRecipe>> {
    let sql = format!("SELECT * FROM ({}) AS q WHERE q.id = ?1", CUSTOM_IMAGE_SOURCE);
    let recipe = conn
        .query_row(&sql, [id.get()], custom_image_from_row)
        .optional()?;

    Ok(recipe)
}

pub fn custom_image_package_ids(conn: &Connection, id: RecipeId) -> Result<Vec<PackageId>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT package_id
        FROM custom_image_packages
        WHERE recipe_id = ?1
        ORDER BY package_id
        "#,
    )?;

    let ids = stmt
        .query_map([id.get()], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(ids)
}
