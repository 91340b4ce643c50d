mod builds;
mod filter_info;
mod table;
mod tables;
mod text;

pub use builds::RecentBuildsView;
pub use filter_info::FilterInfoView;
pub use table::{HtmlTableView, PlainTableView, render_csv};
pub use tables::TableListView;

use anyhow::Result;
use is_terminal::IsTerminal;
use toaster_tables::TableResponse;

use crate::types::OutputFormat;

/// Render a table response in the requested output format.
pub fn render_table(response: &TableResponse, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(response)?),
        OutputFormat::Html => HtmlTableView::new(response).to_string(),
        OutputFormat::Csv => render_csv(response)?,
        OutputFormat::Plain => PlainTableView::new(response)
            .with_color(std::io::stdout().is_terminal())
            .to_string(),
    })
}
