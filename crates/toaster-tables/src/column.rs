use serde::Serialize;
use serde_json::Value;

use crate::context::Extra;

/// How a column turns a row into its cell.
pub enum Cell<R> {
    /// Rendered HTML fragment.
    Template(fn(&R, &Extra) -> String),
    /// Raw value, passed through as JSON.
    Field(fn(&R, &Extra) -> Value),
}

/// One column of a table.
pub struct Column<R> {
    title: String,
    key: String,
    help_text: Option<String>,
    hideable: bool,
    hidden: bool,
    /// Column of the queryset this column sorts by, when orderable.
    order_column: Option<&'static str>,
    filter_name: Option<String>,
    displayable: bool,
    cell: Cell<R>,
}

/// Serializable description of a column, as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub title: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    pub hideable: bool,
    pub hidden: bool,
    pub orderable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_name: Option<String>,
    pub displayable: bool,
}

impl<R> Column<R> {
    fn new(title: &str, key: &str, cell: Cell<R>) -> Self {
        Self {
            title: title.to_string(),
            key: key.to_string(),
            help_text: None,
            hideable: true,
            hidden: false,
            order_column: None,
            filter_name: None,
            displayable: true,
            cell,
        }
    }

    pub fn template(title: &str, key: &str, render: fn(&R, &Extra) -> String) -> Self {
        Self::new(title, key, Cell::Template(render))
    }

    pub fn field(title: &str, key: &str, value: fn(&R, &Extra) -> Value) -> Self {
        Self::new(title, key, Cell::Field(value))
    }

    pub fn help_text(mut self, text: &str) -> Self {
        self.help_text = Some(text.to_string());
        self
    }

    pub fn not_hideable(mut self) -> Self {
        self.hideable = false;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Sortable through the given queryset column.
    pub fn orderable(mut self, order_column: &'static str) -> Self {
        self.order_column = Some(order_column);
        self
    }

    pub fn filter(mut self, filter_name: &str) -> Self {
        self.filter_name = Some(filter_name.to_string());
        self
    }

    /// Data-only column, not shown as a table column.
    pub fn not_displayable(mut self) -> Self {
        self.displayable = false;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn order_column(&self) -> Option<&'static str> {
        self.order_column
    }

    pub fn is_displayable(&self) -> bool {
        self.displayable
    }

    pub fn render(&self, row: &R, extra: &Extra) -> Value {
        match &self.cell {
            Cell::Template(render) => Value::String(render(row, extra).trim().to_string()),
            Cell::Field(value) => value(row, extra),
        }
    }

    pub fn descriptor(&self) -> ColumnDescriptor {
        ColumnDescriptor {
            title: self.title.clone(),
            key: self.key.clone(),
            help_text: self.help_text.clone(),
            hideable: self.hideable,
            hidden: self.hidden,
            orderable: self.order_column.is_some(),
            filter_name: self.filter_name.clone(),
            displayable: self.displayable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let column: Column<i64> = Column::field("Number", "n", |n, _| json!(n));
        let d = column.descriptor();
        assert!(d.hideable);
        assert!(!d.hidden);
        assert!(!d.orderable);
        assert!(d.displayable);
    }

    #[test]
    fn test_render_template_and_field() {
        let extra = Extra::default();
        let template: Column<i64> =
            Column::template("Doubled", "d", |n, _| format!("  <b>{}</b>\n", n * 2));
        let field: Column<i64> = Column::field("Raw", "r", |n, _| json!(n));

        assert_eq!(template.render(&21, &extra), json!("<b>42</b>"));
        assert_eq!(field.render(&21, &extra), json!(21));
    }

    #[test]
    fn test_builder_flags() {
        let column: Column<i64> = Column::field("Name", "name", |_, _| Value::Null)
            .not_hideable()
            .hidden()
            .orderable("name")
            .filter("in_current_project");
        let d = column.descriptor();
        assert!(!d.hideable);
        assert!(d.hidden);
        assert!(d.orderable);
        assert_eq!(d.filter_name.as_deref(), Some("in_current_project"));
        assert_eq!(column.order_column(), Some("name"));
    }
}
