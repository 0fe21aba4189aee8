//! Query planning: from a validated request to SQL.

use crate::builder::{FilterExpr, Operator, QueryBuilder, QueryResult, SortField, simple};
use crate::dialect::Dialect;
use crate::entity::Entity;
use crate::error::FeedError;
use crate::normalize::PageRequest;
use crate::pagination::{Cursor, KeysetCondition};
use crate::registry::SortKey;

/// Whose records a listing may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerScope {
    /// Only records owned by this user.
    Owner(String),
    /// Every record.
    Public,
}

impl OwnerScope {
    /// Restrict to `owner_id`.
    pub fn owner(owner_id: impl Into<String>) -> Self {
        Self::Owner(owner_id.into())
    }
}

/// Queries for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSpec {
    /// Row query, returning up to `limit + 1` rows.
    pub rows: QueryResult,
    /// Count query over the same scope and filters, in page mode only.
    pub count: Option<QueryResult>,
}

/// Plan the fetch for `request` within `scope`.
///
/// Scope and filters are ANDed. Keyset mode adds the boundary predicate;
/// page mode skips `(page - 1) * limit` rows instead. Rows are ordered by
/// the sort column, then id, both in the requested direction.
///
/// The sort column is looked up in the registry under `E::KIND`; an entity
/// whose kind does not list its own sort field fails with
/// [`FeedError::InvalidSortField`].
pub fn plan<E: Entity, D: Dialect>(
    dialect: D,
    request: &PageRequest<E::SortKey>,
    scope: &OwnerScope,
) -> Result<FetchSpec, FeedError> {
    let descriptor = E::KIND.resolve(request.sort.field.name())?;
    let dir = request.sort.order;

    let mut conditions: Vec<FilterExpr> = Vec::with_capacity(request.filters.len() + 2);
    if let OwnerScope::Owner(owner) = scope {
        conditions.push(simple(E::OWNER_COLUMN, Operator::Eq, owner.as_str()));
    }
    conditions.extend(request.filters.iter().map(|f| f.to_expr()));

    let count = match request.cursor {
        Some(Cursor::Page(_)) => Some(
            QueryBuilder::new(dialect, E::TABLE)
                .count()
                .filters(conditions.iter().cloned())
                .build(),
        ),
        _ => None,
    };

    let mut sort = SortField::new(descriptor.column, dir);
    if let Some(nulls) = descriptor.order_nulls() {
        sort = sort.nulls(nulls);
    }

    let mut rows = QueryBuilder::new(dialect, E::TABLE)
        .fields(E::COLUMNS)
        .filters(conditions)
        .sort(sort)
        .sort(SortField::new(E::ID_COLUMN, dir))
        .limit(request.limit.saturating_add(1));

    match &request.cursor {
        Some(Cursor::Boundary(boundary)) => {
            rows = rows.filter(KeysetCondition::after(boundary, E::ID_COLUMN).to_filter_expr());
        },
        Some(Cursor::Page(page)) => {
            rows = rows.offset(u64::from(page.saturating_sub(1)) * u64::from(request.limit));
        },
        None => {},
    }

    Ok(FetchSpec {
        rows: rows.build(),
        count,
    })
}
