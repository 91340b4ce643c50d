use std::fmt;
use toaster_tables::TableInfo;

use super::text::pad;

pub struct TableListView<'a> {
    tables: &'a [TableInfo],
}

impl<'a> TableListView<'a> {
    pub fn new(tables: &'a [TableInfo]) -> Self {
        Self { tables }
    }
}

impl fmt::Display for TableListView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.tables.iter().map(|t| t.name.len()).max().unwrap_or(0);
        for table in self.tables {
            writeln!(f, "{}  {}", pad(table.name, width), table.title)?;
        }
        Ok(())
    }
}
