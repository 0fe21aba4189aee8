//! Rendering of `WHERE` trees into SQL with numbered placeholders.

use super::types::{CompoundFilter, Filter, FilterExpr, LogicalOp, Operator, Relation, Value};
use crate::dialect::Dialect;

/// Render `expr`, numbering placeholders from `start_idx`.
///
/// Returns the SQL, its bound values and the next free placeholder index.
pub(super) fn build_filter_expr_impl<D: Dialect>(
    dialect: &D,
    table: &str,
    expr: &FilterExpr,
    start_idx: usize,
) -> (String, Vec<Value>, usize) {
    match expr {
        FilterExpr::Simple(filter) => build_condition_impl(dialect, filter, start_idx),
        FilterExpr::Compound(compound) => {
            build_compound_filter_impl(dialect, table, compound, start_idx)
        },
        FilterExpr::NotExists(relation) => (
            format!("NOT EXISTS ({})", related_rows(table, relation)),
            vec![],
            start_idx,
        ),
        FilterExpr::Exists(relation, filter) => {
            let qualified = Filter {
                field: format!("{}.{}", relation.table, filter.field),
                ..filter.clone()
            };
            let (condition, params, next) = build_condition_impl(dialect, &qualified, start_idx);
            let sql = format!("EXISTS ({} AND {condition})", related_rows(table, relation));
            (sql, params, next)
        },
    }
}

/// Join a compound filter's children, parenthesised when there are several.
pub(super) fn build_compound_filter_impl<D: Dialect>(
    dialect: &D,
    table: &str,
    compound: &CompoundFilter,
    start_idx: usize,
) -> (String, Vec<Value>, usize) {
    let mut next = start_idx;
    let mut params = Vec::new();
    let mut parts: Vec<String> = compound
        .filters
        .iter()
        .map(|child| {
            let (sql, bound, after) = build_filter_expr_impl(dialect, table, child, next);
            params.extend(bound);
            next = after;
            sql
        })
        .collect();

    let sql = match (parts.len(), compound.op) {
        // Identity elements of AND and OR
        (0, LogicalOp::And) => "1=1".to_string(),
        (0, LogicalOp::Or) => "1=0".to_string(),
        (1, _) => parts.remove(0),
        (_, LogicalOp::And) => format!("({})", parts.join(" AND ")),
        (_, LogicalOp::Or) => format!("({})", parts.join(" OR ")),
    };

    (sql, params, next)
}

/// Render one comparison; `= NULL` and `!= NULL` become `IS [NOT] NULL`.
pub(super) fn build_condition_impl<D: Dialect>(
    dialect: &D,
    filter: &Filter,
    start_idx: usize,
) -> (String, Vec<Value>, usize) {
    let field = &filter.field;
    match (filter.op, &filter.value) {
        (Operator::Eq, Value::Null) => (format!("{field} IS NULL"), vec![], start_idx),
        (Operator::Ne, Value::Null) => (format!("{field} IS NOT NULL"), vec![], start_idx),
        (op, value) => {
            let keyword = match op {
                Operator::Eq => "=",
                Operator::Ne => "!=",
                Operator::Gt => ">",
                Operator::Lt => "<",
                Operator::ILike => dialect.ilike(),
            };
            let sql = format!("{field} {keyword} {}", dialect.param(start_idx));
            (sql, vec![value.clone()], start_idx + 1)
        },
    }
}

fn related_rows(table: &str, relation: &Relation) -> String {
    format!(
        "SELECT 1 FROM {link} WHERE {link}.{column} = {table}.{parent}",
        link = relation.table,
        column = relation.column,
        parent = relation.parent_column,
    )
}
