use serde::Serialize;
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::column::ColumnDescriptor;
use crate::{Error, Result};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// `filter_name:action_name`, optionally followed by `:value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub filter: String,
    pub action: String,
    pub value: Option<String>,
}

impl FromStr for FilterSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        let filter = parts.next().unwrap_or_default().trim();
        let action = parts.next().unwrap_or_default().trim();
        if filter.is_empty() {
            return Err(Error::UnknownFilter(s.to_string()));
        }
        if action.is_empty() {
            return Err(Error::UnknownFilterAction {
                filter: filter.to_string(),
                action: String::new(),
            });
        }

        Ok(Self {
            filter: filter.to_string(),
            action: action.to_string(),
            value: parts.next().map(str::to_string).filter(|v| !v.is_empty()),
        })
    }
}

/// Sort, filter, search and paging parameters of one table request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRequest {
    /// Column key, `-` prefixed for descending. `None` uses the table default.
    pub orderby: Option<String>,
    pub filters: Vec<FilterSelection>,
    /// Value for selected actions that did not carry one inline.
    pub filter_value: Option<String>,
    pub search: Option<String>,
    pub limit: usize,
    /// 1-based.
    pub page: usize,
}

impl Default for TableRequest {
    fn default() -> Self {
        Self {
            orderby: None,
            filters: Vec::new(),
            filter_value: None,
            search: None,
            limit: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

impl TableRequest {
    /// Build a request from URL query pairs. `filter` may repeat.
    ///
    /// Identifier parameters (`pid`, `layerid`, `recipeid`) are ignored here.
    pub fn from_query_pairs(pairs: &[(String, String)], default_limit: usize) -> Result<Self> {
        let mut request = Self {
            limit: default_limit,
            ..Self::default()
        };

        for (key, value) in pairs {
            let value = value.trim();
            match key.as_str() {
                "orderby" if !value.is_empty() => request.orderby = Some(value.to_string()),
                "filter" if !value.is_empty() => request.filters.push(value.parse()?),
                "filter_value" if !value.is_empty() => {
                    request.filter_value = Some(value.to_string())
                }
                "search" if !value.is_empty() => request.search = Some(value.to_string()),
                "limit" => {
                    request.limit = parse_positive(value).unwrap_or(default_limit);
                }
                "page" => {
                    request.page = parse_positive(value).unwrap_or(1);
                }
                _ => {}
            }
        }

        Ok(request)
    }

    /// Whitespace separated search terms.
    pub fn search_terms(&self) -> Vec<&str> {
        self.search
            .as_deref()
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Selections with later ones replacing earlier ones for the same filter.
    pub fn effective_filters(&self) -> Vec<&FilterSelection> {
        let mut selected: Vec<&FilterSelection> = Vec::new();
        for selection in &self.filters {
            match selected.iter_mut().find(|s| s.filter == selection.filter) {
                Some(existing) => *existing = selection,
                None => selected.push(selection),
            }
        }
        selected
    }
}

fn parse_positive(value: &str) -> Option<usize> {
    value.parse::<usize>().ok().filter(|n| *n > 0)
}

/// One rendered page of a table.
#[derive(Debug, Clone, Serialize)]
pub struct TableResponse {
    pub table: String,
    pub title: String,
    pub empty_state: String,
    pub default_orderby: String,
    /// Sort key actually applied.
    pub orderby: String,
    pub columns: Vec<ColumnDescriptor>,
    /// Rows matching search and filters, across all pages.
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    /// Cells keyed by column key.
    pub rows: Vec<Map<String, Value>>,
}

impl TableResponse {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn displayable_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| c.displayable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_selection_with_inline_value() {
        let sel: FilterSelection = "started_on_filter:date_range:2026-01-01,2026-01-02"
            .parse()
            .unwrap();
        assert_eq!(sel.filter, "started_on_filter");
        assert_eq!(sel.action, "date_range");
        assert_eq!(sel.value.as_deref(), Some("2026-01-01,2026-01-02"));
    }

    #[test]
    fn test_parse_selection_without_action() {
        assert!(matches!(
            "outcome_filter".parse::<FilterSelection>(),
            Err(Error::UnknownFilterAction { .. })
        ));
    }

    #[test]
    fn test_from_query_pairs() {
        let request = TableRequest::from_query_pairs(
            &pairs(&[
                ("pid", "1"),
                ("orderby", "-machine"),
                ("filter", "outcome_filter:failed_builds"),
                ("filter", "failed_tasks_filter:with_failed_tasks"),
                ("search", " core  image "),
                ("limit", "0"),
                ("page", "3"),
            ]),
            25,
        )
        .unwrap();

        assert_eq!(request.orderby.as_deref(), Some("-machine"));
        assert_eq!(request.filters.len(), 2);
        assert_eq!(request.search_terms(), vec!["core", "image"]);
        assert_eq!(request.limit, 25);
        assert_eq!(request.page, 3);
    }

    #[test]
    fn test_last_selection_wins_within_filter() {
        let request = TableRequest {
            filters: vec![
                "outcome_filter:successful_builds".parse().unwrap(),
                "failed_tasks_filter:with_failed_tasks".parse().unwrap(),
                "outcome_filter:failed_builds".parse().unwrap(),
            ],
            ..TableRequest::default()
        };

        let effective = request.effective_filters();
        assert_eq!(effective.len(), 2);
        assert_eq!(effective[0].action, "failed_builds");
    }
}
