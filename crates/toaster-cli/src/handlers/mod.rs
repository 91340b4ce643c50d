pub mod filter_info;
pub mod import;
pub mod recent_builds;
pub mod serve;
pub mod table;
pub mod tables;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use std::path::Path;
use toaster_index::Database;
use toaster_tables::TableContext;
use toaster_types::{LayerVersionId, ProjectId, RecipeId};

use crate::args::ScopeArgs;

/// Open the database read-only; it must have been imported first.
pub fn open_database(db_path: &Path) -> Result<Database> {
    if !db_path.exists() {
        bail!(
            "No database at {}. Run `toaster import <FILE>` first",
            db_path.display()
        );
    }
    Ok(Database::open_read_only(db_path)?)
}

/// Table context for the identifiers and reference date given on the
/// command line.
pub fn scope_context(scope: &ScopeArgs) -> Result<TableContext> {
    let today = match &scope.today {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid --today date '{}', expected YYYY-MM-DD", date))?,
        None => Utc::now().date_naive(),
    };

    let mut ctx = TableContext::new(today);
    if let Some(pid) = scope.project {
        ctx = ctx.with_project(ProjectId::new(pid));
    }
    if let Some(layer) = scope.layer {
        ctx = ctx.with_layer(LayerVersionId::new(layer));
    }
    if let Some(recipe) = scope.recipe {
        ctx = ctx.with_recipe(RecipeId::new(recipe));
    }
    Ok(ctx)
}
