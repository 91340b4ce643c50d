use anyhow::Result;
use owo_colors::OwoColorize;
use std::fmt;
use toaster_tables::{ColumnDescriptor, TableResponse, html};

use super::text::{cell_text, pad, truncate};

const MAX_CELL_WIDTH: usize = 40;

/// Columns shown by default: displayable and not hidden.
fn visible_columns(response: &TableResponse) -> Vec<&ColumnDescriptor> {
    response
        .displayable_columns()
        .filter(|c| !c.hidden)
        .collect()
}

/// Aligned text table with a title and paging footer.
pub struct PlainTableView<'a> {
    response: &'a TableResponse,
    color: bool,
}

impl<'a> PlainTableView<'a> {
    pub fn new(response: &'a TableResponse) -> Self {
        Self {
            response,
            color: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

impl fmt::Display for PlainTableView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.response;

        if self.color {
            writeln!(f, "{}", response.title.bold())?;
        } else {
            writeln!(f, "{}", response.title)?;
        }

        if response.is_empty() {
            return writeln!(f, "{}", response.empty_state);
        }

        let columns = visible_columns(response);
        let rows: Vec<Vec<String>> = response
            .rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| {
                        let text = row.get(&c.key).map(cell_text).unwrap_or_default();
                        truncate(&text, MAX_CELL_WIDTH)
                    })
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                rows.iter()
                    .map(|r| r[i].chars().count())
                    .chain(std::iter::once(c.title.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header = columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(&c.title, *w))
            .collect::<Vec<_>>()
            .join("  ");
        if self.color {
            writeln!(f, "{}", header.trim_end().cyan())?;
        } else {
            writeln!(f, "{}", header.trim_end())?;
        }

        for row in &rows {
            let line = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| pad(cell, *w))
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(f, "{}", line.trim_end())?;
        }

        if rows.is_empty() {
            return writeln!(
                f,
                "\nPage {} is past the last of {} results",
                response.page, response.total
            );
        }

        let first = (response.page - 1) * response.limit + 1;
        let last = first + rows.len() - 1;
        writeln!(
            f,
            "\nShowing {}-{} of {} (page {}, ordered by {})",
            first, last, response.total, response.page, response.orderby
        )
    }
}

/// HTML `<table>` fragment with the rendered cells as-is.
pub struct HtmlTableView<'a> {
    response: &'a TableResponse,
}

impl<'a> HtmlTableView<'a> {
    pub fn new(response: &'a TableResponse) -> Self {
        Self { response }
    }
}

impl fmt::Display for HtmlTableView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.response;
        let columns: Vec<_> = response.displayable_columns().collect();

        writeln!(
            f,
            "<table class=\"table table-bordered table-hover\" id=\"{}\">",
            html::escape(&response.table)
        )?;
        writeln!(f, "<thead><tr>")?;
        for c in &columns {
            let style = if c.hidden { " style=\"display:none;\"" } else { "" };
            writeln!(
                f,
                "<th class=\"{}\"{}>{}</th>",
                html::escape(&c.key),
                style,
                html::escape(&c.title)
            )?;
        }
        writeln!(f, "</tr></thead>")?;
        writeln!(f, "<tbody>")?;

        if response.is_empty() {
            writeln!(
                f,
                "<tr><td colspan=\"{}\">{}</td></tr>",
                columns.len(),
                html::escape(&response.empty_state)
            )?;
        }

        for row in &response.rows {
            write!(f, "<tr>")?;
            for c in &columns {
                let cell = match row.get(&c.key) {
                    Some(serde_json::Value::String(s)) => s.clone(),
                    Some(serde_json::Value::Null) | None => String::new(),
                    Some(other) => html::escape(&other.to_string()),
                };
                write!(f, "<td class=\"{}\">{}</td>", html::escape(&c.key), cell)?;
            }
            writeln!(f, "</tr>")?;
        }
        writeln!(f, "</tbody>")?;
        writeln!(f, "</table>")
    }
}

/// CSV with column titles as header and cells reduced to text.
pub fn render_csv(response: &TableResponse) -> Result<String> {
    let columns = visible_columns(response);
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(columns.iter().map(|c| c.title.as_str()))?;
    for row in &response.rows {
        writer.write_record(
            columns
                .iter()
                .map(|c| row.get(&c.key).map(cell_text).unwrap_or_default()),
        )?;
    }

    Ok(String::from_utf8(writer.into_inner()?)?)
}
