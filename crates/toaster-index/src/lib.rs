// SQLite store for the dashboard tables
// The table layer only reads; writes happen through dataset import

mod db;
mod error;
mod queries;
mod queryset;
mod records;
mod schema;

// Public API
pub use db::Database;
pub use error::{Error, Result};
pub use queries::{build, layer, package, project, recipe};
pub use queryset::{OrderBy, Page, Predicate, Queryset};
pub use records::{
    BuildRecord, BuildSummary, CustomImageRecipeRecord, Dataset, ImportStats, LastBuild,
    LayerDependencyRecord, LayerRecord, LayerSummary, LayerVersionRecord, LogMessageRecord,
    MachineRecord, PackageRecord, ProjectLayerRecord, ProjectRecord, ProjectSummary, RecipeRecord,
    ReleaseRecord, TargetImageFileRecord, TargetRecord, TaskRecord,
};
pub use schema::SCHEMA_VERSION;
