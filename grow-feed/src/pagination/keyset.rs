//! Keyset pagination condition generation.

use crate::builder::{FilterExpr, Nulls, Operator, SortDir, Value, and, or, simple};
use crate::registry::{ComparatorDescriptor, SortKey};

use super::cursor::BoundaryCursor;

/// "Strictly after the boundary row" under `(sort column, id)` ordering.
///
/// Expanded into OR branches instead of a row-value comparison so that it
/// works on every dialect and handles nullable sort columns:
///
/// - non-null boundary: `col > v OR (col = v AND id > bid)`, plus
///   `OR col IS NULL` when nulls sort last
/// - null boundary, nulls last: `col IS NULL AND id > bid`
///
/// `<` replaces `>` for descending order. Nulls-first columns mirror the
/// null branches.
#[derive(Debug, Clone, PartialEq)]
pub struct KeysetCondition {
    descriptor: ComparatorDescriptor,
    id_column: &'static str,
    dir: SortDir,
    value: Value,
    id: String,
}

impl KeysetCondition {
    /// Condition selecting rows after `cursor`.
    #[must_use]
    pub fn after<K: SortKey>(cursor: &BoundaryCursor<K>, id_column: &'static str) -> Self {
        Self {
            descriptor: cursor.sort.field.descriptor(),
            id_column,
            dir: cursor.sort.order,
            value: cursor.value.clone(),
            id: cursor.id.clone(),
        }
    }

    const fn operator(&self) -> Operator {
        match self.dir {
            SortDir::Asc => Operator::Gt,
            SortDir::Desc => Operator::Lt,
        }
    }

    /// Convert to a filter expression for the query builder.
    #[must_use]
    pub fn to_filter_expr(&self) -> FilterExpr {
        let column = self.descriptor.column;
        let op = self.operator();
        let nulls = self.descriptor.order_nulls();
        let id_after = simple(self.id_column, op, self.id.as_str());

        if self.value.is_null() {
            let tie = and(vec![simple(column, Operator::Eq, Value::Null), id_after]);
            return match nulls {
                Some(Nulls::First) => or(vec![tie, simple(column, Operator::Ne, Value::Null)]),
                _ => tie,
            };
        }

        let mut branches = vec![
            simple(column, op, self.value.clone()),
            and(vec![simple(column, Operator::Eq, self.value.clone()), id_after]),
        ];
        if nulls == Some(Nulls::Last) {
            branches.push(simple(column, Operator::Eq, Value::Null));
        }
        or(branches)
    }
}
