//! Backing store abstraction.

use thiserror::Error;

use crate::builder::{QueryResult, Value};
use crate::dialect::Dialect;

/// Backing store failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// The driver reported an error.
    #[cfg(feature = "sqlite")]
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A store without a dedicated variant failed.
    #[error("{0}")]
    Backend(String),

    /// A selected column was absent from the returned row.
    #[error("column '{0}' missing from result row")]
    MissingColumn(String),

    /// A column held a value of the wrong type.
    #[error("column '{column}' expected {expected}, found {found}")]
    ColumnType {
        /// Column name.
        column: String,
        /// Expected type.
        expected: &'static str,
        /// What was found.
        found: &'static str,
    },
}

/// One result row, as column name and value pairs in select order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: Vec<(String, Value)>,
}

impl Row {
    /// Create an empty row.
    #[must_use]
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Append a column.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.values.push((column.into(), value.into()));
    }

    /// Builder form of [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    /// Value of `column`, if selected.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    /// Non-null text column.
    pub fn text(&self, column: &str) -> Result<String, FetchError> {
        self.opt_text(column)?.ok_or_else(|| FetchError::ColumnType {
            column: column.to_string(),
            expected: "text",
            found: "null",
        })
    }

    /// Nullable text column.
    pub fn opt_text(&self, column: &str) -> Result<Option<String>, FetchError> {
        match self.get(column) {
            None => Err(FetchError::MissingColumn(column.to_string())),
            Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(FetchError::ColumnType {
                column: column.to_string(),
                expected: "text",
                found: type_name(other),
            }),
        }
    }
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Int(_) => "integer",
        Value::Float(_) => "float",
        Value::String(_) => "text",
    }
}

/// Executes planned queries.
///
/// Implementations are read-only from the feed's point of view and must not
/// retry; callers decide whether to retry a failed page.
pub trait FeedStore {
    /// SQL dialect the store speaks.
    type Dialect: Dialect;

    /// Dialect instance used to plan queries for this store.
    fn dialect(&self) -> Self::Dialect;

    /// Run a row query.
    fn fetch_rows(&self, query: &QueryResult) -> Result<Vec<Row>, FetchError>;

    /// Run a `COUNT(*) AS count` query.
    fn count(&self, query: &QueryResult) -> Result<u64, FetchError>;
}

impl<S: FeedStore + ?Sized> FeedStore for &S {
    type Dialect = S::Dialect;

    fn dialect(&self) -> Self::Dialect {
        (**self).dialect()
    }

    fn fetch_rows(&self, query: &QueryResult) -> Result<Vec<Row>, FetchError> {
        (**self).fetch_rows(query)
    }

    fn count(&self, query: &QueryResult) -> Result<u64, FetchError> {
        (**self).count(query)
    }
}
