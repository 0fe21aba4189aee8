//! Page assembly from fetched rows.

use crate::entity::Record;
use crate::normalize::PageRequest;
use crate::registry::SortKey;

use super::cursor::{BoundaryCursor, Cursor};

/// One page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T, K> {
    /// At most `limit` items, in sort order.
    pub items: Vec<T>,
    /// Where the next page starts; `None` on the last page.
    pub next_cursor: Option<Cursor<K>>,
    /// Whether more rows matched than fit on this page.
    pub has_next_page: bool,
    /// Page count at the requested limit (page mode only).
    pub total_pages: Option<u64>,
    /// Matching rows (page mode only).
    pub total_count: Option<u64>,
}

impl<T, K> Page<T, K> {
    /// Number of items on the page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Trim the lookahead row and attach pagination metadata.
///
/// `rows` is the fetch result of at most `limit + 1` rows. `total_count` is
/// the count query result, present only in page mode. In page mode the next
/// cursor is the following page number; otherwise it is the boundary of the
/// last kept row.
pub fn assemble<T, K>(mut rows: Vec<T>, request: &PageRequest<K>, total_count: Option<u64>) -> Page<T, K>
where
    T: Record<K>,
    K: SortKey,
{
    let limit = request.limit as usize;
    let has_next_page = rows.len() > limit;
    rows.truncate(limit);

    let next_cursor = if has_next_page {
        match &request.cursor {
            Some(Cursor::Page(page)) => Some(Cursor::Page(page.saturating_add(1))),
            Some(Cursor::Boundary(_)) | None => rows.last().map(|last| {
                Cursor::Boundary(BoundaryCursor::new(
                    request.sort,
                    last.sort_value(request.sort.field),
                    last.id(),
                ))
            }),
        }
    } else {
        None
    };

    let total_pages = total_count.map(|count| count.div_ceil(u64::from(request.limit)));

    Page {
        items: rows,
        next_cursor,
        has_next_page,
        total_pages,
        total_count,
    }
}
