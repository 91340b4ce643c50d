use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use toaster_types::{
    CustomImageRecipe, LayerVersion, LayerVersionId, Machine, Package, PackageId, Project,
    ProjectId, Recipe, RecipeId,
};

use crate::queries::{build, dataset, layer, package, project, recipe};
use crate::queryset::Queryset;
use crate::records::{BuildSummary, Dataset, ImportStats, LayerSummary, ProjectSummary};
use crate::{Result, schema};

/// Handle on the dashboard store.
///
/// [`Database::open`] brings the schema up to date and is used for import.
/// [`Database::open_read_only`] serves tables and never writes the file.
/// A handle is meant to live for a single request; it is not shared across
/// threads.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an existing store without creating or migrating it.
    pub fn open_read_only(db_path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        schema::check_version(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Load a dataset in one transaction, replacing rows with the same ids.
    pub fn import(&mut self, data: &Dataset) -> Result<ImportStats> {
        let tx = self.conn.transaction()?;
        let stats = dataset::import(&tx, data)?;
        tx.commit()?;
        Ok(stats)
    }

    // Lookups

    pub fn get_project(&self, id: ProjectId) -> Result<Option<Project>> {
        project::get(&self.conn, id)
    }

    pub fn get_layer_version(&self, id: LayerVersionId) -> Result<Option<LayerVersion>> {
        layer::get(&self.conn, id)
    }

    pub fn get_custom_image_recipe(&self, id: RecipeId) -> Result<Option<CustomImageRecipe>> {
        recipe::get_custom_image(&self.conn, id)
    }

    pub fn project_layer_version_ids(&self, project_id: ProjectId) -> Result<Vec<LayerVersionId>> {
        layer::project_layer_ids(&self.conn, project_id)
    }

    pub fn count_project_layer(
        &self,
        project_id: ProjectId,
        layer_version_id: LayerVersionId,
    ) -> Result<usize> {
        layer::count_in_project(&self.conn, project_id, layer_version_id)
    }

    pub fn custom_image_package_ids(&self, recipe_id: RecipeId) -> Result<Vec<PackageId>> {
        recipe::custom_image_package_ids(&self.conn, recipe_id)
    }

    // Base querysets

    pub fn layer_versions(&self) -> Queryset<LayerSummary> {
        layer::queryset()
    }

    pub fn recipes(&self) -> Queryset<Recipe> {
        recipe::queryset()
    }

    pub fn machines(&self) -> Queryset<Machine> {
        recipe::machine_queryset()
    }

    pub fn custom_image_recipes(&self) -> Queryset<CustomImageRecipe> {
        recipe::custom_image_queryset()
    }

    pub fn packages(&self) -> Queryset<Package> {
        package::queryset()
    }

    pub fn projects(&self) -> Queryset<ProjectSummary> {
        project::queryset()
    }

    pub fn builds(&self) -> Queryset<BuildSummary> {
        build::queryset()
    }

    // Page decoration

    pub fn decorate_layers(&self, rows: &mut [LayerSummary]) -> Result<()> {
        layer::decorate(&self.conn, rows)
    }

    pub fn decorate_builds(&self, rows: &mut [BuildSummary]) -> Result<()> {
        build::decorate(&self.conn, rows)
    }

    pub fn decorate_projects(&self, rows: &mut [ProjectSummary]) -> Result<()> {
        project::decorate(&self.conn, rows)
    }

    pub fn recent_builds(&self, project_id: Option<ProjectId>) -> Result<Vec<BuildSummary>> {
        build::recent(&self.conn, project_id)
    }
}
