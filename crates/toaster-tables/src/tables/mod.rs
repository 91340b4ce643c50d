//! Table definitions and the name → table registry.

mod builds;
mod custom_images;
mod layers;
mod machines;
mod projects;
mod recipes;

use serde::Serialize;
use toaster_index::Database;

use crate::context::TableContext;
use crate::filter::FilterInfo;
use crate::request::{TableRequest, TableResponse};
use crate::table::{self, ToasterTable};
use crate::{Error, Result};

pub use builds::{BuildsTable, recent_builds};
pub use custom_images::{CustomImagesTable, SelectPackagesTable};
pub use layers::LayersTable;
pub use machines::{LayerMachinesTable, MachinesTable};
pub use projects::ProjectsTable;
pub use recipes::{ImageRecipesTable, LayerRecipesTable, NewCustomImagesTable, SoftwareRecipesTable};

/// Type-erased view of a [`ToasterTable`], so tables can be looked up by
/// the name used in URLs.
pub trait Table: Send + Sync {
    fn name(&self) -> &'static str;
    fn title(&self, ctx: &TableContext) -> String;
    fn get_data(&self, db: &Database, ctx: &TableContext, request: &TableRequest) -> Result<TableResponse>;
    fn filter_info(
        &self,
        db: &Database,
        ctx: &TableContext,
        filter_name: &str,
        search: Option<&str>,
    ) -> Result<FilterInfo>;
}

impl<T> Table for T
where
    T: ToasterTable + Send + Sync,
{
    fn name(&self) -> &'static str {
        ToasterTable::name(self)
    }

    fn title(&self, ctx: &TableContext) -> String {
        ToasterTable::title(self, ctx)
    }

    fn get_data(&self, db: &Database, ctx: &TableContext, request: &TableRequest) -> Result<TableResponse> {
        table::get_data(self, db, ctx, request)
    }

    fn filter_info(
        &self,
        db: &Database,
        ctx: &TableContext,
        filter_name: &str,
        search: Option<&str>,
    ) -> Result<FilterInfo> {
        table::filter_info(self, db, ctx, filter_name, search)
    }
}

static TABLES: &[&dyn Table] = &[
    &LayersTable,
    &MachinesTable,
    &LayerMachinesTable,
    &LayerRecipesTable,
    &CustomImagesTable,
    &ImageRecipesTable,
    &NewCustomImagesTable,
    &SoftwareRecipesTable,
    &SelectPackagesTable,
    &ProjectsTable,
    &BuildsTable,
];

/// Every registered table, in registration order.
pub fn registry() -> &'static [&'static dyn Table] {
    TABLES
}

pub fn lookup(name: &str) -> Result<&'static dyn Table> {
    TABLES
        .iter()
        .copied()
        .find(|t| t.name() == name)
        .ok_or_else(|| Error::UnknownTable(name.to_string()))
}

/// Listing entry for a registered table.
#[derive(Debug, Clone, Serialize)]
pub struct TableInfo {
    pub name: &'static str,
    pub title: String,
}

/// Names and titles of every table, with titles rendered for `ctx`.
pub fn list(ctx: &TableContext) -> Vec<TableInfo> {
    TABLES
        .iter()
        .map(|t| TableInfo {
            name: t.name(),
            title: t.title(ctx),
        })
        .collect()
}
