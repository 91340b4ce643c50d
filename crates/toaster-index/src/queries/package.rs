use rusqlite::types::Value;
use toaster_types::{Package, ProjectId, RecipeId};

use crate::queryset::{Predicate, Queryset};

pub const SEARCH_FIELDS: &[&str] = &["name", "version", "revision", "summary"];

pub fn queryset() -> Queryset<Package> {
    Queryset::new(
        r#"
        SELECT p.id, p.build_id, p.name, p.version, p.revision, p.size, p.summary,
               b.project_id AS build_project_id
        FROM packages p
        LEFT JOIN builds b ON b.id = p.build_id
        "#,
        Vec::new(),
        |row| {
            Ok(Package {
                id: row.get("id")?,
                build_id: row.get("build_id")?,
                name: row.get("name")?,
                version: row.get("version")?,
                revision: row.get("revision")?,
                size: row.get("size")?,
                summary: row.get("summary")?,
            })
        },
    )
}

/// Packages currently part of a custom image.
pub fn in_custom_image(recipe_id: RecipeId) -> Predicate {
    Predicate::raw(
        "q.id IN (SELECT package_id FROM custom_image_packages WHERE recipe_id = ?)",
        vec![Value::Integer(recipe_id.get())],
    )
}

/// Packages whose name matches one already in a custom image.
pub fn name_in_custom_image(recipe_id: RecipeId) -> Predicate {
    Predicate::raw(
        r#"q.name IN (
            SELECT pk.name FROM custom_image_packages cp
            JOIN packages pk ON pk.id = cp.package_id
            WHERE cp.recipe_id = ?)"#,
        vec![Value::Integer(recipe_id.get())],
    )
}

/// Packages produced by any build of the project.
pub fn built_in_project(project_id: ProjectId) -> Predicate {
    Predicate::eq("build_project_id", project_id.get())
}

/// Candidates for a custom image: its own packages, plus packages built in
/// the project that do not share a name with one already in the image.
pub fn image_candidates(recipe_id: RecipeId, project_id: ProjectId) -> Predicate {
    in_custom_image(recipe_id).or(built_in_project(project_id).and(name_in_custom_image(recipe_id).not()))
}
