//! Pagination parameter normalization.
//!
//! Turns caller-supplied parameters into a [`PageRequest`], or rejects them.
//! Nothing here touches the store.

use crate::builder::{FilterExpr, SortDir, Value};
use crate::entity::{FilterSpec, find_filter};
use crate::error::{FeedError, ValidationError};
use crate::pagination::{BoundaryCursor, Cursor};
use crate::registry::{SortKey, SortSpec};

/// Cursor as sent by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawCursor {
    /// Integer cursor, read as a page number.
    Page(i64),
    /// Boundary token.
    Token(String),
}

/// Unvalidated pagination parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawParams {
    /// Requested page size.
    pub limit: Option<i64>,
    /// Continuation cursor.
    pub cursor: Option<RawCursor>,
    /// 1-based page number.
    pub page: Option<i64>,
    /// Sort field wire name.
    pub sort_field: Option<String>,
    /// `"asc"` or `"desc"`.
    pub sort_order: Option<String>,
    /// Filter key and value pairs, in input order.
    pub filters: Vec<(String, Value)>,
}

/// Per-listing defaults and bounds.
#[derive(Debug, Clone, Copy)]
pub struct Defaults<K> {
    /// Page size when none is given.
    pub limit: u32,
    /// Sort when none is given.
    pub sort: SortSpec<K>,
    /// Largest accepted page size.
    pub max_page_size: u32,
    /// Filters this listing accepts.
    pub filters: &'static [FilterSpec],
}

/// A declared filter with an active value.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedFilter {
    /// Declaration.
    pub spec: FilterSpec,
    /// Type-checked value.
    pub value: Value,
}

impl AppliedFilter {
    /// Predicate for the query planner.
    #[must_use]
    pub fn to_expr(&self) -> FilterExpr {
        self.spec.to_expr(&self.value)
    }
}

/// Validated pagination request.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest<K> {
    /// Page size, within `1..=max_page_size`.
    pub limit: u32,
    /// `None` starts a keyset listing from the top.
    pub cursor: Option<Cursor<K>>,
    /// Sort field and order.
    pub sort: SortSpec<K>,
    /// Active filters.
    pub filters: Vec<AppliedFilter>,
}

impl<K> PageRequest<K> {
    /// Whether the request runs in offset mode.
    #[must_use]
    pub const fn is_page_mode(&self) -> bool {
        matches!(self.cursor, Some(Cursor::Page(_)))
    }
}

/// Validate and default raw parameters.
///
/// - `limit` outside `1..=max_page_size` is rejected, never clamped.
/// - A cursor takes precedence over `page`; an empty token counts as absent.
/// - A token must have been minted for the resolved sort, otherwise the
///   result is [`FeedError::MalformedCursor`].
/// - Filters set to null, `false`, `""` or blank search text are dropped.
pub fn normalize<K: SortKey>(raw: &RawParams, defaults: &Defaults<K>) -> Result<PageRequest<K>, FeedError> {
    let limit = normalize_limit(raw.limit, defaults)?;
    let sort = normalize_sort(raw, defaults.sort)?;
    let filters = normalize_filters(&raw.filters, defaults.filters)?;

    let cursor = match &raw.cursor {
        Some(RawCursor::Token(token)) if !token.is_empty() => {
            Some(Cursor::Boundary(BoundaryCursor::decode(token, sort)?))
        },
        Some(RawCursor::Page(page)) => Some(Cursor::Page(page_number(*page, "cursor")?)),
        Some(RawCursor::Token(_)) | None => match raw.page {
            Some(page) => Some(Cursor::Page(page_number(page, "page")?)),
            None => None,
        },
    };

    Ok(PageRequest {
        limit,
        cursor,
        sort,
        filters,
    })
}

fn normalize_limit<K>(limit: Option<i64>, defaults: &Defaults<K>) -> Result<u32, ValidationError> {
    let max = defaults.max_page_size;
    let Some(limit) = limit else {
        return Ok(defaults.limit.clamp(1, max.max(1)));
    };
    u32::try_from(limit)
        .ok()
        .filter(|l| (1..=max).contains(l))
        .ok_or(ValidationError::LimitOutOfRange { limit, max })
}

fn normalize_sort<K: SortKey>(raw: &RawParams, default: SortSpec<K>) -> Result<SortSpec<K>, ValidationError> {
    let field = match raw.sort_field.as_deref() {
        None | Some("") => default.field,
        Some(name) => K::parse(name).ok_or_else(|| ValidationError::UnknownSortField {
            entity: K::ENTITY,
            field: name.to_string(),
            allowed: K::ALL.iter().map(|k| k.name()).collect::<Vec<_>>().join(", "),
        })?,
    };
    let order = match raw.sort_order.as_deref() {
        None | Some("") => default.order,
        Some(order) => SortDir::parse(order).ok_or_else(|| ValidationError::UnknownSortOrder {
            order: order.to_string(),
        })?,
    };
    Ok(SortSpec::new(field, order))
}

fn normalize_filters(
    raw: &[(String, Value)],
    declared: &[FilterSpec],
) -> Result<Vec<AppliedFilter>, ValidationError> {
    let mut applied = Vec::new();
    for (key, value) in raw {
        let spec = find_filter(declared, key)
            .ok_or_else(|| ValidationError::UnknownFilter { key: key.clone() })?;
        if !spec.accepts(value) {
            return Err(ValidationError::FilterType {
                key: key.clone(),
                expected: spec.expected(),
            });
        }
        if spec.is_inactive(value) {
            continue;
        }
        applied.push(AppliedFilter {
            spec: *spec,
            value: value.clone(),
        });
    }
    Ok(applied)
}

fn page_number(page: i64, field: &'static str) -> Result<u32, ValidationError> {
    u32::try_from(page)
        .ok()
        .filter(|p| *p >= 1)
        .ok_or(ValidationError::PageOutOfRange { field, page })
}
