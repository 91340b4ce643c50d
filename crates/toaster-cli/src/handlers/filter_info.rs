use anyhow::Result;
use toaster_index::Database;
use toaster_tables::lookup;

use super::scope_context;
use crate::args::ScopeArgs;
use crate::types::OutputFormat;
use crate::views::FilterInfoView;

pub fn handle(
    db: &Database,
    name: &str,
    filter: &str,
    scope: &ScopeArgs,
    search: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let table = lookup(name)?;
    let ctx = scope_context(scope)?;
    let info = table.filter_info(db, &ctx, filter, search)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
        _ => print!("{}", FilterInfoView::new(&info)),
    }
    Ok(())
}
