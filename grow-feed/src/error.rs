//! Error taxonomy for feed pagination.

use thiserror::Error;

use crate::registry::EntityKind;
use crate::pagination::CursorError;
use crate::store::FetchError;

/// Caller-fixable problem with pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// `limit` outside `1..=max`.
    #[error("limit must be between 1 and {max}, got {limit}")]
    LimitOutOfRange {
        /// Requested limit.
        limit: i64,
        /// Largest accepted limit.
        max: u32,
    },

    /// Page number below 1 or too large to address.
    #[error("{field} must be a page number of at least 1, got {page}")]
    PageOutOfRange {
        /// `"page"`, or `"cursor"` for integer cursors.
        field: &'static str,
        /// Requested page.
        page: i64,
    },

    /// `sortField` is not sortable for this entity.
    #[error("unknown sort field '{field}' for {entity}, expected one of: {allowed}")]
    UnknownSortField {
        /// Entity being listed.
        entity: EntityKind,
        /// Requested field.
        field: String,
        /// Comma-separated accepted names.
        allowed: String,
    },

    /// `sortOrder` is neither `asc` nor `desc`.
    #[error("sort order must be 'asc' or 'desc', got '{order}'")]
    UnknownSortOrder {
        /// Requested order.
        order: String,
    },

    /// Filter key not declared for this listing.
    #[error("unknown filter '{key}'")]
    UnknownFilter {
        /// Offending key.
        key: String,
    },

    /// Filter value of the wrong type.
    #[error("filter '{key}' expects a {expected}")]
    FilterType {
        /// Offending key.
        key: String,
        /// Expected type name.
        expected: &'static str,
    },
}

impl ValidationError {
    /// Input field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &str {
        match self {
            Self::LimitOutOfRange { .. } => "limit",
            Self::PageOutOfRange { field, .. } => *field,
            Self::UnknownSortField { .. } => "sortField",
            Self::UnknownSortOrder { .. } => "sortOrder",
            Self::UnknownFilter { .. } | Self::FilterType { .. } => "filters",
        }
    }
}

/// Any failure of a feed request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FeedError {
    /// Bad parameters; report to the caller with field detail.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Stale or tampered cursor; restart from the first page.
    #[error("malformed cursor: {0}")]
    MalformedCursor(#[from] CursorError),

    /// Backing store failure.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// A sort field missing from the registry.
    #[error("no sort field '{field}' registered for {entity}")]
    InvalidSortField {
        /// Entity being listed.
        entity: EntityKind,
        /// Unresolved field name.
        field: String,
    },
}

impl FeedError {
    /// Whether the caller should drop its cursor and start over.
    #[must_use]
    pub const fn is_malformed_cursor(&self) -> bool {
        matches!(self, Self::MalformedCursor(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_field_names() {
        assert_eq!(
            ValidationError::LimitOutOfRange { limit: 0, max: 100 }.field(),
            "limit"
        );
        assert_eq!(
            ValidationError::PageOutOfRange {
                field: "cursor",
                page: -1
            }
            .field(),
            "cursor"
        );
        assert_eq!(
            ValidationError::UnknownFilter { key: "x".into() }.field(),
            "filters"
        );
    }

    #[test]
    fn test_messages() {
        let err = ValidationError::LimitOutOfRange {
            limit: 10_000,
            max: 100,
        };
        assert_eq!(err.to_string(), "limit must be between 1 and 100, got 10000");

        let err = FeedError::from(ValidationError::UnknownSortOrder {
            order: "up".into(),
        });
        assert_eq!(err.to_string(), "sort order must be 'asc' or 'desc', got 'up'");
        assert!(!err.is_malformed_cursor());
    }
}
