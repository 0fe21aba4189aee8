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
#![allow(clippy::doc_markdown)] // Procedure names like `grows.getOwnGrows` in prose
#![allow(clippy::missing_errors_doc)] // Error enums document their variants
#![allow(clippy::module_name_repetitions)] // RpcError in error, RequestContext in context

//! # grow-rpc - Feed procedures for grows, plants and photos
//!
//! Named procedures (`grows.getOwnGrows`, `plants.getAllPlants`,
//! `photos.getOwnPhotos`, ...) that take a JSON input, resolve the caller's
//! scope from the session, page through [`grow_feed`] and answer with JSON.
//!
//! ```text
//! body ──► Input::parse ──► normalize ──► plan ──► FeedStore ──► assemble ──► JSON
//!                              │
//!                              └─ malformed cursor: restart, "cursorReset": true
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use grow_feed::SqliteStore;
//! use grow_rpc::{FeedConfig, RequestContext, Router};
//!
//! let config = FeedConfig::from_env();
//! grow_rpc::log::init_with_filter(&config.log_filter);
//!
//! let store = SqliteStore::open_in_memory().unwrap();
//! store.create_schema().unwrap();
//! let router = Router::new(store, config);
//!
//! let mut ctx = RequestContext::signed_in("u1");
//! let response = router.call(
//!     &mut ctx,
//!     "photos.getOwnPhotos",
//!     r#"{"sortField":"captureDate","filters":{"filterNotConnected":true}}"#,
//! );
//! assert_eq!(response.status, 200);
//! ctx.finish();
//! ```
//!
//! ## Errors
//!
//! Failures are RFC 7807 problem documents:
//!
//! | Status | When                                             |
//! |--------|--------------------------------------------------|
//! | 400    | invalid JSON, bad limit, sort field or filter    |
//! | 401    | owner-scoped procedure without a session         |
//! | 404    | unknown procedure                                |
//! | 500    | store failure, sort field missing from registry  |

pub mod config;
mod context;
pub mod env;
mod error;
mod input;
pub mod json;
pub mod log;
mod procedure;
mod response;
mod router;

pub use config::FeedConfig;
pub use context::{RequestContext, RequestSummary, Session};
pub use error::RpcError;
pub use input::{Input, InputError};
pub use procedure::{Listing, Procedure};
pub use response::{MIME_JSON, MIME_PROBLEM_JSON, Response};
pub use router::Router;

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
