use anyhow::Result;
use chrono::Utc;
use toaster_tables::TableContext;

use crate::types::OutputFormat;
use crate::views::TableListView;

pub fn handle(format: OutputFormat) -> Result<()> {
    let ctx = TableContext::new(Utc::now().date_naive());
    let tables = toaster_tables::tables::list(&ctx);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tables)?),
        _ => print!("{}", TableListView::new(&tables)),
    }
    Ok(())
}
