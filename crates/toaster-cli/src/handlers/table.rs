use anyhow::Result;
use toaster_index::Database;
use toaster_tables::{TableRequest, lookup};
use tracing::info;

use super::scope_context;
use crate::args::ScopeArgs;
use crate::types::OutputFormat;
use crate::views;

pub fn handle(
    db: &Database,
    name: &str,
    scope: &ScopeArgs,
    request: &TableRequest,
    format: OutputFormat,
) -> Result<()> {
    let table = lookup(name)?;
    let ctx = scope_context(scope)?;

    let response = table.get_data(db, &ctx, request)?;
    info!(table = name, total = response.total, page = response.page, "rendered table");

    print!("{}", views::render_table(&response, format)?);
    Ok(())
}
