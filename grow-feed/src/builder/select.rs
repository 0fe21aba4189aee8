//! `SELECT` statements over one feed table.

use std::fmt::Write as _;

use crate::dialect::Dialect;
use crate::validate::assert_valid_sql_identifier;

use super::filter::build_filter_expr_impl;
use super::types::{FilterExpr, QueryResult, SortField, Value};

/// Builder for a single-table `SELECT`.
///
/// Filters added with [`filter`](Self::filter) are combined with `AND`, in
/// insertion order, so parameter numbering is deterministic.
#[derive(Debug)]
pub struct QueryBuilder<D: Dialect> {
    dialect: D,
    table: String,
    fields: Vec<String>,
    filters: Vec<FilterExpr>,
    sorts: Vec<SortField>,
    limit: Option<u32>,
    offset: Option<u64>,
    count: bool,
}

impl<D: Dialect> QueryBuilder<D> {
    /// Select from `table`.
    ///
    /// # Panics
    ///
    /// Panics if the table name is not a valid SQL identifier.
    pub fn new(dialect: D, table: impl Into<String>) -> Self {
        let table = table.into();
        assert_valid_sql_identifier(&table, "table");
        Self {
            dialect,
            table,
            fields: Vec::new(),
            filters: Vec::new(),
            sorts: Vec::new(),
            limit: None,
            offset: None,
            count: false,
        }
    }

    /// Columns to project; empty means `*`.
    ///
    /// # Panics
    ///
    /// Panics if any field name is not a valid SQL identifier.
    pub fn fields(mut self, fields: &[&str]) -> Self {
        for field in fields {
            assert_valid_sql_identifier(field, "field");
        }
        self.fields = fields.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Select `COUNT(*) AS count` instead of fields.
    pub const fn count(mut self) -> Self {
        self.count = true;
        self
    }

    /// Add a condition, `AND`ed with the rest.
    pub fn filter(mut self, expr: FilterExpr) -> Self {
        self.filters.push(expr);
        self
    }

    /// Add each of `exprs`.
    pub fn filters(mut self, exprs: impl IntoIterator<Item = FilterExpr>) -> Self {
        self.filters.extend(exprs);
        self
    }

    /// Append an `ORDER BY` term.
    pub fn sort(mut self, sort: SortField) -> Self {
        self.sorts.push(sort);
        self
    }

    /// `LIMIT limit`.
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set an offset. A zero offset is omitted from the SQL.
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = if offset == 0 { None } else { Some(offset) };
        self
    }

    /// Render the statement with its parameters in placeholder order.
    pub fn build(self) -> QueryResult {
        let projection = match (self.count, self.fields.is_empty()) {
            (true, _) => "COUNT(*) AS count".to_string(),
            (false, true) => "*".to_string(),
            (false, false) => self.fields.join(", "),
        };
        let mut sql = format!("SELECT {projection} FROM {}", self.table);

        let (conditions, params) = self.where_clause();
        if !conditions.is_empty() {
            let _ = write!(sql, " WHERE {}", conditions.join(" AND "));
        }
        if !self.sorts.is_empty() {
            let terms: Vec<String> = self.sorts.iter().map(SortField::to_sql).collect();
            let _ = write!(sql, " ORDER BY {}", terms.join(", "));
        }
        if let Some(limit) = self.limit {
            let _ = write!(sql, " LIMIT {limit}");
        }
        if let Some(offset) = self.offset {
            let _ = write!(sql, " OFFSET {offset}");
        }

        QueryResult { sql, params }
    }

    /// One rendered condition per filter, numbering placeholders from 1.
    fn where_clause(&self) -> (Vec<String>, Vec<Value>) {
        let mut next = 1;
        let mut params = Vec::new();
        let conditions = self
            .filters
            .iter()
            .map(|expr| {
                let (sql, bound, after) =
                    build_filter_expr_impl(&self.dialect, &self.table, expr, next);
                params.extend(bound);
                next = after;
                sql
            })
            .collect();
        (conditions, params)
    }
}
