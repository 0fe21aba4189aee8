// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Wire names like `createdAt` in prose
#![allow(clippy::missing_errors_doc)] // Error enums document their variants
#![allow(clippy::missing_panics_doc)] // Panics are identifier asserts on static names
#![allow(clippy::module_name_repetitions)] // PageRequest in normalize, FeedStore in store
#![allow(clippy::return_self_not_must_use)] // Builder methods return Self
#![allow(clippy::must_use_candidate)] // Builder methods - fluent API doesn't need must_use
#![allow(clippy::format_push_string)] // String building style preference

//! # grow-feed - Feed pagination and sorting for grows, plants and photos
//!
//! Lists records a page at a time under a per-entity sort field, in one of
//! two modes: keyset cursors for infinite scroll, or page numbers with totals
//! for browsable lists. Rows are always ordered by `(sort field, id)` so ties
//! on the sort field never skip or repeat a record across pages.
//!
//! The pipeline:
//!
//! 1. [`normalize`] validates raw parameters into a [`PageRequest`]
//!    (the sort field must be in the entity's [`SortKey`] registry).
//! 2. [`plan`] turns it into SQL fetching `limit + 1` rows, plus a count
//!    query in page mode.
//! 3. A [`FeedStore`] runs the queries.
//! 4. [`assemble`] drops the lookahead row and mints the next [`Cursor`].
//!
//! [`paginate`] runs steps 2 to 4 and [`fetch_page`] runs all of them.
//!
//! ## Quick Start
//!
//! ```
//! # #[cfg(feature = "sqlite")] {
//! use grow_feed::prelude::*;
//!
//! let store = SqliteStore::open_in_memory().unwrap();
//! store.create_schema().unwrap();
//!
//! let defaults = Defaults {
//!     limit: 12,
//!     sort: SortSpec::new(PlantSortField::Name, SortDir::Asc),
//!     max_page_size: 100,
//!     filters: Plants::FILTERS,
//! };
//! let page = fetch_page::<Plants, _>(
//!     &store,
//!     &RawParams::default(),
//!     &defaults,
//!     &OwnerScope::owner("u1"),
//! )
//! .unwrap();
//!
//! assert!(page.items.is_empty());
//! assert!(!page.has_next_page);
//! # }
//! ```
//!
//! ## Generated SQL
//!
//! ```
//! use grow_feed::prelude::*;
//!
//! let sort = SortSpec::new(PlantSortField::Name, SortDir::Asc);
//! let request = PageRequest {
//!     limit: 2,
//!     cursor: Some(Cursor::Boundary(BoundaryCursor::new(sort, Value::from("B"), "2"))),
//!     sort,
//!     filters: Vec::new(),
//! };
//! let spec = plan::<Plants, _>(Postgres, &request, &OwnerScope::Public).unwrap();
//!
//! assert!(spec.rows.sql.contains("WHERE (name > $1 OR (name = $2 AND id > $3))"));
//! assert!(spec.rows.sql.ends_with("ORDER BY name ASC, id ASC LIMIT 3"));
//! ```

mod builder;
mod dialect;
mod entity;
mod error;
mod feed;
mod normalize;
mod pagination;
mod plan;
mod registry;
#[cfg(feature = "sqlite")]
mod sqlite;
mod store;
mod validate;

pub use builder::{
    CompoundFilter, Filter, FilterExpr, LogicalOp, Nulls, Operator, QueryBuilder, QueryResult,
    Relation, SortDir, SortField, Value, and, exists, or, simple,
};
pub use dialect::{Dialect, Postgres, Sqlite};
pub use entity::{
    Entity, FilterKind, FilterSpec, Grow, Grows, OWNER_USER, PLANT_IMAGES, Photo, Photos, Plant,
    Plants, Record, find_filter,
};
pub use error::{FeedError, ValidationError};
pub use feed::{EntityPage, fetch_page, paginate};
pub use normalize::{AppliedFilter, Defaults, PageRequest, RawCursor, RawParams, normalize};
pub use pagination::{
    BoundaryCursor, Cursor, CursorError, KeysetCondition, MAX_CURSOR_SIZE, Page, assemble,
};
pub use plan::{FetchSpec, OwnerScope, plan};
pub use registry::{
    ComparatorDescriptor, DataType, EntityKind, GrowSortField, PhotoSortField, PlantSortField,
    SortKey, SortSpec,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
pub use store::{FeedStore, FetchError, Row};
pub use validate::{assert_valid_sql_identifier, is_valid_sql_identifier};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        BoundaryCursor, Cursor, Defaults, Dialect, Entity, EntityKind, FeedError, FeedStore,
        GrowSortField, Grows, OwnerScope, Page, PageRequest, PhotoSortField, Photos,
        PlantSortField, Plants, Postgres, RawCursor, RawParams, Record, SortDir, SortKey,
        SortSpec, Sqlite, Value, assemble, fetch_page, normalize, paginate, plan,
    };

    #[cfg(feature = "sqlite")]
    pub use crate::SqliteStore;
}

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
