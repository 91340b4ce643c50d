pub mod build;
pub mod dataset;
pub mod layer;
pub mod package;
pub mod project;
pub mod recipe;

use chrono::NaiveDateTime;
use rusqlite::Row;
use rusqlite::types::Type;
use toaster_types::{BuildOutcome, TaskOutcome, parse_timestamp};

// Row readers for columns whose stored form differs from the domain type.
// Failures surface as conversion errors on the offending column.

fn conversion_error(row: &Row<'_>, column: &str, ty: Type, err: toaster_types::Error) -> rusqlite::Error {
    let index = row.as_ref().column_index(column).unwrap_or_default();
    rusqlite::Error::FromSqlConversionFailure(index, ty, Box::new(err))
}

pub(crate) fn timestamp(row: &Row<'_>, column: &str) -> rusqlite::Result<NaiveDateTime> {
    let text: String = row.get(column)?;
    parse_timestamp(&text).map_err(|err| conversion_error(row, column, Type::Text, err))
}

pub(crate) fn build_outcome(row: &Row<'_>, column: &str) -> rusqlite::Result<BuildOutcome> {
    let code: i64 = row.get(column)?;
    BuildOutcome::from_code(code).map_err(|err| conversion_error(row, column, Type::Integer, err))
}

pub(crate) fn task_outcome(row: &Row<'_>, column: &str) -> rusqlite::Result<TaskOutcome> {
    let code: i64 = row.get(column)?;
    TaskOutcome::from_code(code).map_err(|err| conversion_error(row, column, Type::Integer, err))
}

