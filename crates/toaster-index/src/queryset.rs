//! Composable read queries.
//!
//! A [`Queryset`] wraps an entity's base `SELECT` as the subquery `q`, so
//! predicates and orderings can refer to annotated columns (`q.errors_no`)
//! exactly like stored ones. Nothing touches the database until
//! [`Queryset::count`] or [`Queryset::fetch`].

use rusqlite::types::Value;
use rusqlite::{Connection, Row, params_from_iter};
use tracing::debug;

use crate::Result;

pub type RowMapper<T> = fn(&Row<'_>) -> rusqlite::Result<T>;

/// A boolean SQL condition over the columns of `q`, with its bound values.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    sql: String,
    params: Vec<Value>,
}

impl Predicate {
    /// Raw condition; use `?` placeholders in the order of `params`.
    pub fn raw(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    pub fn always() -> Self {
        Self::raw("1", Vec::new())
    }

    pub fn never() -> Self {
        Self::raw("0", Vec::new())
    }

    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Self::raw(format!("q.{} = ?", column), vec![value.into()])
    }

    pub fn is_null(column: &str) -> Self {
        Self::raw(format!("q.{} IS NULL", column), Vec::new())
    }

    /// `column IN (ids)`; an empty set matches nothing.
    pub fn is_in(column: &str, ids: impl IntoIterator<Item = i64>) -> Self {
        let params: Vec<Value> = ids.into_iter().map(Value::Integer).collect();
        if params.is_empty() {
            return Self::never();
        }
        let placeholders = vec!["?"; params.len()].join(", ");
        Self::raw(format!("q.{} IN ({})", column, placeholders), params)
    }

    /// Half-open range `from <= column < until` on a text timestamp column.
    pub fn between(column: &str, from: String, until: String) -> Self {
        Self::raw(
            format!("(q.{col} >= ? AND q.{col} < ?)", col = column),
            vec![Value::Text(from), Value::Text(until)],
        )
    }

    /// Case-insensitive substring match against any of `columns`.
    pub fn contains_any(columns: &[&str], term: &str) -> Self {
        if columns.is_empty() {
            return Self::never();
        }
        let pattern = format!("%{}%", escape_like(term));
        let sql = columns
            .iter()
            .map(|c| format!("q.{} LIKE ? ESCAPE '\\'", c))
            .collect::<Vec<_>>()
            .join(" OR ");
        let params = columns.iter().map(|_| Value::Text(pattern.clone())).collect();
        Self::raw(format!("({})", sql), params)
    }

    pub fn and(mut self, other: Predicate) -> Self {
        self.sql = format!("({}) AND ({})", self.sql, other.sql);
        self.params.extend(other.params);
        self
    }

    pub fn or(mut self, other: Predicate) -> Self {
        self.sql = format!("({}) OR ({})", self.sql, other.sql);
        self.params.extend(other.params);
        self
    }

    /// Logical negation where an unknown (NULL) result counts as false, so
    /// `p` and `p.not()` always split a set in two.
    #[allow(clippy::should_implement_trait)]
    pub fn not(mut self) -> Self {
        self.sql = format!("NOT COALESCE(({}), 0)", self.sql);
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// One ORDER BY term on a column of `q`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }
}

/// 1-based page of `limit` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub limit: usize,
}

impl Page {
    pub fn new(number: usize, limit: usize) -> Self {
        Self {
            number: number.max(1),
            limit: limit.max(1),
        }
    }

    /// Rows to skip, saturating instead of overflowing for huge page numbers.
    pub fn offset(&self) -> usize {
        (self.number - 1).saturating_mul(self.limit)
    }
}

/// SQLite binds signed 64-bit integers; anything larger is clamped.
fn bind_count(n: usize) -> Value {
    Value::Integer(i64::try_from(n).unwrap_or(i64::MAX))
}

/// Lazily evaluated, filtered and ordered set of rows of one entity.
pub struct Queryset<T> {
    source: String,
    source_params: Vec<Value>,
    predicates: Vec<Predicate>,
    ordering: Vec<OrderBy>,
    mapper: RowMapper<T>,
}

impl<T> Clone for Queryset<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            source_params: self.source_params.clone(),
            predicates: self.predicates.clone(),
            ordering: self.ordering.clone(),
            mapper: self.mapper,
        }
    }
}

impl<T> Queryset<T> {
    /// `source` must select an `id` column; it becomes the subquery `q`.
    pub fn new(source: impl Into<String>, source_params: Vec<Value>, mapper: RowMapper<T>) -> Self {
        Self {
            source: source.into(),
            source_params,
            predicates: Vec::new(),
            ordering: Vec::new(),
            mapper,
        }
    }

    /// Narrow the set; successive filters are ANDed.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn exclude(self, predicate: Predicate) -> Self {
        self.filter(predicate.not())
    }

    /// Replace the ordering. Rows are always tie-broken by ascending id.
    pub fn order_by(mut self, ordering: Vec<OrderBy>) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn ordering(&self) -> &[OrderBy] {
        &self.ordering
    }

    pub fn count(&self, conn: &Connection) -> Result<usize> {
        let (where_clause, params) = self.where_clause();
        let sql = format!(
            "SELECT COUNT(*) FROM ({}) AS q {}",
            self.source, where_clause
        );
        debug!(sql = %sql, "counting queryset");

        let count: i64 = conn.query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn fetch(&self, conn: &Connection, page: Option<Page>) -> Result<Vec<T>> {
        let (where_clause, mut params) = self.where_clause();
        let limit_clause = match page {
            Some(page) => {
                params.push(bind_count(page.limit));
                params.push(bind_count(page.offset()));
                "LIMIT ? OFFSET ?"
            }
            None => "",
        };
        let sql = format!(
            "SELECT * FROM ({}) AS q {} {} {}",
            self.source,
            where_clause,
            self.order_clause(),
            limit_clause
        );
        debug!(sql = %sql, "fetching queryset");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), self.mapper)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        Ok(rows)
    }

    fn where_clause(&self) -> (String, Vec<Value>) {
        let mut params = self.source_params.clone();
        if self.predicates.is_empty() {
            return (String::new(), params);
        }
        let conditions: Vec<String> = self
            .predicates
            .iter()
            .map(|p| format!("({})", p.sql))
            .collect();
        for predicate in &self.predicates {
            params.extend(predicate.params.iter().cloned());
        }
        (format!("WHERE {}", conditions.join(" AND ")), params)
    }

    fn order_clause(&self) -> String {
        let mut terms: Vec<String> = self
            .ordering
            .iter()
            .map(|o| format!("q.{} {}", o.column, if o.descending { "DESC" } else { "ASC" }))
            .collect();
        terms.push("q.id ASC".to_string());
        format!("ORDER BY {}", terms.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(conn: &Connection) -> Queryset<(i64, Option<String>)> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS numbers (id INTEGER PRIMARY KEY, label TEXT);
            DELETE FROM numbers;
            INSERT INTO numbers (id, label) VALUES (1, 'one'), (2, 'two'), (3, NULL), (4, 'fo%ur');
            "#,
        )
        .unwrap();
        Queryset::new("SELECT id, label FROM numbers", Vec::new(), |row| {
            Ok((row.get("id")?, row.get("label")?))
        })
    }

    #[test]
    fn test_negation_partitions_with_nulls() {
        let conn = Connection::open_in_memory().unwrap();
        let qs = numbers(&conn);
        let p = Predicate::eq("label", "one".to_string());

        let matched = qs.clone().filter(p.clone()).count(&conn).unwrap();
        let unmatched = qs.clone().exclude(p).count(&conn).unwrap();

        assert_eq!(matched, 1);
        assert_eq!(unmatched, 3);
        assert_eq!(matched + unmatched, qs.count(&conn).unwrap());
    }

    #[test]
    fn test_empty_in_matches_nothing() {
        let conn = Connection::open_in_memory().unwrap();
        let qs = numbers(&conn);
        assert_eq!(qs.clone().filter(Predicate::is_in("id", [])).count(&conn).unwrap(), 0);
        assert_eq!(qs.exclude(Predicate::is_in("id", [])).count(&conn).unwrap(), 4);
    }

    #[test]
    fn test_order_and_page() {
        let conn = Connection::open_in_memory().unwrap();
        let qs = numbers(&conn).order_by(vec![OrderBy::desc("id")]);

        let page: Vec<i64> = qs
            .fetch(&conn, Some(Page::new(2, 2)))
            .unwrap()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(page, vec![2, 1]);
    }

    #[test]
    fn test_page_far_past_the_end_is_empty() {
        let conn = Connection::open_in_memory().unwrap();
        let qs = numbers(&conn);

        let page = Page::new(usize::MAX, 10);
        assert_eq!(page.offset(), usize::MAX);
        assert!(qs.fetch(&conn, Some(page)).unwrap().is_empty());
        assert!(qs.fetch(&conn, Some(Page::new(3, usize::MAX))).unwrap().is_empty());
        assert_eq!(qs.fetch(&conn, Some(Page::new(1, usize::MAX))).unwrap().len(), 4);
    }

    #[test]
    fn test_contains_escapes_wildcards() {
        let conn = Connection::open_in_memory().unwrap();
        let qs = numbers(&conn);

        let rows = qs
            .clone()
            .filter(Predicate::contains_any(&["label"], "%"))
            .fetch(&conn, None)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, 4);

        let rows = qs
            .filter(Predicate::contains_any(&["label"], "ON"))
            .fetch(&conn, None)
            .unwrap();
        assert_eq!(rows.len(), 1);
    }
}
