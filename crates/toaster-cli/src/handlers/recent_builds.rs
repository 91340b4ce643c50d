use anyhow::Result;
use toaster_index::Database;
use toaster_tables::recent_builds;

use super::scope_context;
use crate::args::ScopeArgs;
use crate::types::OutputFormat;
use crate::views::RecentBuildsView;

pub fn handle(db: &Database, scope: &ScopeArgs, format: OutputFormat) -> Result<()> {
    let ctx = scope_context(scope)?;
    let builds = recent_builds(db, &ctx)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&builds)?),
        _ => print!("{}", RecentBuildsView::new(&builds)),
    }
    Ok(())
}
