//! SQL query builder for feed fetches.

mod filter;
mod select;
mod types;

pub use select::QueryBuilder;
pub use types::{
    CompoundFilter, Filter, FilterExpr, LogicalOp, Nulls, Operator, QueryResult, Relation,
    SortDir, SortField, Value, and, exists, or, simple,
};
