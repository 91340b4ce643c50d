//! Shared helpers for table integration tests.
//!
//! Clippy cannot track usage across integration test files, hence the
//! `allow(dead_code)`.
#![cfg(test)]
#![allow(dead_code)]

use serde_json::Value;
use toaster_index::Database;
use toaster_tables::{FilterSelection, TableContext, TableRequest, TableResponse};
use toaster_testing::DatasetBuilder;
use toaster_testing::fixtures::date;

/// Reference day for "today"/"yesterday" filters.
pub const TODAY: &str = "2024-03-10";

pub fn open(data: DatasetBuilder) -> Database {
    let mut db = Database::open_in_memory().expect("open in-memory database");
    db.import(&data.finish()).expect("import dataset");
    db
}

pub fn ctx() -> TableContext {
    TableContext::new(date(TODAY))
}

pub fn request() -> TableRequest {
    TableRequest {
        limit: 100,
        ..TableRequest::default()
    }
}

pub fn with_filter(selection: &str) -> TableRequest {
    let mut req = request();
    req.filters.push(selection.parse::<FilterSelection>().expect("valid selection"));
    req
}

pub fn cell<'a>(response: &'a TableResponse, row: usize, key: &str) -> &'a str {
    match response.rows[row].get(key) {
        Some(Value::String(s)) => s.as_str(),
        other => panic!("column {} of row {} is not a string: {:?}", key, row, other),
    }
}

/// Integer following `marker` in each row's `key` cell, e.g. the build id
/// in a `/toastergui/build/{id}` link.
pub fn ids_after(response: &TableResponse, key: &str, marker: &str) -> Vec<i64> {
    (0..response.rows.len())
        .map(|row| {
            let html = cell(response, row, key);
            let start = html
                .find(marker)
                .unwrap_or_else(|| panic!("no '{}' in {}", marker, html))
                + marker.len();
            let digits: String = html[start..].chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().expect("numeric id")
        })
        .collect()
}

pub fn build_ids(response: &TableResponse) -> Vec<i64> {
    ids_after(response, "outcome", "/toastergui/build/")
}
