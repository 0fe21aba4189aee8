//! Predicates, sort terms and bound values the planner composes.

use crate::validate::assert_valid_sql_identifier;

/// SQL comparison operators used by feed predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Equal: `=` (or `IS NULL` against a null value)
    Eq,
    /// Not equal: `!=` (or `IS NOT NULL` against a null value)
    Ne,
    /// Greater than: `>`
    Gt,
    /// Less than: `<`
    Lt,
    /// Case-insensitive pattern match: `ILIKE` (Postgres) or `LIKE` (`SQLite`)
    ILike,
}

/// How a [`CompoundFilter`] joins its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// All conditions must match: `AND`
    And,
    /// At least one condition must match: `OR`
    Or,
}

/// One node of a `WHERE` tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// `column op value`.
    Simple(Filter),
    /// Children joined by `AND` or `OR`.
    Compound(CompoundFilter),
    /// The row has no matching row in a link table.
    NotExists(Relation),
    /// Some row of a related table, joined through the relation, passes the
    /// comparison. The comparison's column belongs to the related table.
    Exists(Relation, Filter),
}

/// Children joined by one logical operator.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundFilter {
    /// How the children are combined.
    pub op: LogicalOp,
    /// Child expressions.
    pub filters: Vec<FilterExpr>,
}

impl CompoundFilter {
    /// Conjunction of `filters`.
    #[must_use]
    pub const fn and(filters: Vec<FilterExpr>) -> Self {
        Self {
            op: LogicalOp::And,
            filters,
        }
    }

    /// Disjunction of `filters`.
    #[must_use]
    pub const fn or(filters: Vec<FilterExpr>) -> Self {
        Self {
            op: LogicalOp::Or,
            filters,
        }
    }
}

/// A table related to the queried one by `{table}.{column} = {parent}.{parent_column}`.
///
/// Used in `EXISTS` and `NOT EXISTS` subqueries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    /// Related table name.
    pub table: &'static str,
    /// Column of the related table matched against the parent row.
    pub column: &'static str,
    /// Referenced column of the parent table.
    pub parent_column: &'static str,
}

/// A value bound to a placeholder, or read back from a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL `NULL`.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// Double precision float.
    Float(f64),
    /// Text.
    String(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDir {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortDir {
    /// Wire name (`"asc"` / `"desc"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Parse a wire name, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    pub(crate) const fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Where nulls are placed relative to non-null values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nulls {
    /// Nulls before every value.
    First,
    /// Nulls after every value.
    Last,
}

/// One `ORDER BY` term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    /// Column name.
    pub field: String,
    /// Direction.
    pub dir: SortDir,
    /// Explicit null placement; `None` for non-nullable columns.
    pub nulls: Option<Nulls>,
}

impl SortField {
    /// Term over a non-nullable column.
    ///
    /// # Panics
    ///
    /// Panics if the field name is not a valid SQL identifier.
    pub fn new(field: impl Into<String>, dir: SortDir) -> Self {
        let field = field.into();
        assert_valid_sql_identifier(&field, "sort field");
        Self {
            field,
            dir,
            nulls: None,
        }
    }

    /// Set explicit null placement.
    pub const fn nulls(mut self, nulls: Nulls) -> Self {
        self.nulls = Some(nulls);
        self
    }

    pub(crate) fn to_sql(&self) -> String {
        match self.nulls {
            None => format!("{} {}", self.field, self.dir.sql()),
            Some(Nulls::First) => format!("{} {} NULLS FIRST", self.field, self.dir.sql()),
            Some(Nulls::Last) => format!("{} {} NULLS LAST", self.field, self.dir.sql()),
        }
    }
}

/// `column op value` comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Column name.
    pub field: String,
    /// Comparison.
    pub op: Operator,
    /// Right-hand side, bound as a parameter.
    pub value: Value,
}

/// Rendered statement ready for a [`FeedStore`](crate::FeedStore).
#[derive(Debug, Clone, PartialEq)]
#[must_use = "a rendered statement does nothing until a store runs it"]
pub struct QueryResult {
    /// SQL text with dialect placeholders.
    pub sql: String,
    /// Parameters in placeholder order.
    pub params: Vec<Value>,
}

/// `field op value` as a filter node.
///
/// # Panics
///
/// Panics if the field name is not a valid SQL identifier.
pub fn simple(field: impl Into<String>, op: Operator, value: impl Into<Value>) -> FilterExpr {
    let field = field.into();
    assert_valid_sql_identifier(&field, "filter field");
    FilterExpr::Simple(Filter {
        field,
        op,
        value: value.into(),
    })
}

/// Related rows of `relation` where `field op value` holds.
///
/// # Panics
///
/// Panics if the field name is not a valid SQL identifier.
pub fn exists(
    relation: Relation,
    field: impl Into<String>,
    op: Operator,
    value: impl Into<Value>,
) -> FilterExpr {
    let field = field.into();
    assert_valid_sql_identifier(&field, "filter field");
    FilterExpr::Exists(
        relation,
        Filter {
            field,
            op,
            value: value.into(),
        },
    )
}

/// `AND` of `filters`.
///
/// A single child is returned unwrapped.
#[must_use]
pub fn and(mut filters: Vec<FilterExpr>) -> FilterExpr {
    if filters.len() == 1
        && let Some(only) = filters.pop()
    {
        return only;
    }
    FilterExpr::Compound(CompoundFilter::and(filters))
}

/// `OR` of `filters`.
///
/// A single child is returned unwrapped.
#[must_use]
pub fn or(mut filters: Vec<FilterExpr>) -> FilterExpr {
    if filters.len() == 1
        && let Some(only) = filters.pop()
    {
        return only;
    }
    FilterExpr::Compound(CompoundFilter::or(filters))
}
