//! Assertions over rendered table JSON (`TableResponse`).

use anyhow::{Context, Result};
use serde_json::Value;

fn rows(json: &Value) -> Result<&Vec<Value>> {
    json["rows"]
        .as_array()
        .context("Expected 'rows' array in JSON")
}

/// Assert the total row count of the filtered queryset.
pub fn assert_total(json: &Value, expected: usize) -> Result<()> {
    let total = json["total"]
        .as_u64()
        .context("Expected numeric 'total' in JSON")?;

    if total as usize != expected {
        anyhow::bail!("Expected total {}, got {}", expected, total);
    }

    Ok(())
}

/// Assert the number of rows on the rendered page.
pub fn assert_row_count(json: &Value, expected: usize) -> Result<()> {
    let rows = rows(json)?;
    if rows.len() != expected {
        anyhow::bail!("Expected {} rows, got {}", expected, rows.len());
    }
    Ok(())
}

/// Cell values of one column, in row order. Strings are returned as-is,
/// other values in their JSON form.
pub fn column_values(json: &Value, key: &str) -> Result<Vec<String>> {
    rows(json)?
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let cell = row
                .get(key)
                .with_context(|| format!("Row {} missing column '{}'", i, key))?;
            Ok(match cell {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
        })
        .collect()
}

/// Assert that some cell of `key` contains `needle`.
pub fn assert_column_contains(json: &Value, key: &str, needle: &str) -> Result<()> {
    let values = column_values(json, key)?;
    if !values.iter().any(|v| v.contains(needle)) {
        anyhow::bail!("No '{}' cell contains '{}': {:?}", key, needle, values);
    }
    Ok(())
}

/// Assert the error body produced for a failed request.
pub fn assert_error_contains(json: &Value, needle: &str) -> Result<()> {
    let message = json["error"]
        .as_str()
        .context("Expected 'error' string in JSON")?;
    if !message.contains(needle) {
        anyhow::bail!("Error '{}' does not contain '{}'", message, needle);
    }
    Ok(())
}
