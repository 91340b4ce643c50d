use chrono::NaiveDate;
use serde::Serialize;
use toaster_index::Database;
use toaster_types::{LayerVersionId, PackageId, Project, ProjectId, RecipeId};

use crate::{Error, Result};

/// Identifiers a table is scoped by, plus the reference date for
/// "today"/"yesterday" filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableContext {
    pub pid: Option<ProjectId>,
    pub layerid: Option<LayerVersionId>,
    pub recipeid: Option<RecipeId>,
    pub today: NaiveDate,
}

impl TableContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            pid: None,
            layerid: None,
            recipeid: None,
            today,
        }
    }

    pub fn with_project(mut self, pid: ProjectId) -> Self {
        self.pid = Some(pid);
        self
    }

    pub fn with_layer(mut self, layerid: LayerVersionId) -> Self {
        self.layerid = Some(layerid);
        self
    }

    pub fn with_recipe(mut self, recipeid: RecipeId) -> Self {
        self.recipeid = Some(recipeid);
        self
    }

    pub fn require_project_id(&self) -> Result<ProjectId> {
        self.pid.ok_or(Error::MissingParameter("pid"))
    }

    pub fn require_layer_id(&self) -> Result<LayerVersionId> {
        self.layerid.ok_or(Error::MissingParameter("layerid"))
    }

    pub fn require_recipe_id(&self) -> Result<RecipeId> {
        self.recipeid.ok_or(Error::MissingParameter("recipeid"))
    }

    /// The project this table is scoped to; it must exist.
    pub fn project(&self, db: &Database) -> Result<Project> {
        let pid = self.require_project_id()?;
        db.get_project(pid)?.ok_or(Error::NotFound {
            entity: "project",
            id: pid.get(),
        })
    }
}

/// Values computed while setting up the queryset and shared with every
/// cell renderer of the request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Extra {
    pub pid: Option<ProjectId>,
    /// Layer versions added to the project.
    pub current_layers: Vec<LayerVersionId>,
    /// How many times the viewed layer version is in the project.
    pub in_prj: usize,
    pub recipe_id: Option<RecipeId>,
    /// Packages currently in the viewed custom image.
    pub current_packages: Vec<PackageId>,
}

impl Extra {
    pub fn for_context(ctx: &TableContext) -> Self {
        Self {
            pid: ctx.pid,
            recipe_id: ctx.recipeid,
            ..Self::default()
        }
    }

    pub fn layer_in_project(&self, id: LayerVersionId) -> bool {
        self.current_layers.contains(&id)
    }

    pub fn package_in_image(&self, id: PackageId) -> bool {
        self.current_packages.contains(&id)
    }

    /// Project id for links; renderers only run for project-scoped tables.
    pub fn project_id(&self) -> ProjectId {
        self.pid.unwrap_or(ProjectId::new(0))
    }
}
