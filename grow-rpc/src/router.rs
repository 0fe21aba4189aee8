//! Procedure dispatch.

use std::time::Instant;

use grow_feed::{
    Dialect, Entity, FeedError, FeedStore, FetchError, Grows, OwnerScope, Photos, Plants,
    QueryResult, RawParams, Row, SortSpec, normalize, paginate,
};
use miniserde::json::Value;
use tracing::{debug, error, info, warn};

use crate::config::FeedConfig;
use crate::context::RequestContext;
use crate::error::RpcError;
use crate::input::Input;
use crate::json::{ToJson, page_to_json};
use crate::procedure::{Listing, Procedure};
use crate::response::Response;

/// Serves feed procedures from a store.
///
/// ```
/// use grow_feed::SqliteStore;
/// use grow_rpc::{FeedConfig, RequestContext, Router};
///
/// let store = SqliteStore::open_in_memory().unwrap();
/// store.create_schema().unwrap();
/// let router = Router::new(store, FeedConfig::default());
///
/// let mut ctx = RequestContext::signed_in("u1");
/// let response = router.call(&mut ctx, "plants.getOwnPlants", r#"{"limit":2}"#);
/// assert_eq!(response.status, 200);
/// assert_eq!(response.body, r#"{"hasNextPage":false,"items":[]}"#);
///
/// let response = router.call(&mut RequestContext::anonymous(), "plants.getOwnPlants", "");
/// assert_eq!(response.status, 401);
/// ```
#[derive(Debug)]
pub struct Router<S> {
    store: S,
    config: FeedConfig,
}

struct Served {
    body: Value,
    items: usize,
    has_next_page: bool,
}

impl<S: FeedStore> Router<S> {
    /// Router over `store` with `config`.
    pub const fn new(store: S, config: FeedConfig) -> Self {
        Self { store, config }
    }

    /// Active configuration.
    pub const fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Call procedure `name` with a JSON `body`.
    ///
    /// Never fails: errors become problem documents. A malformed cursor is
    /// not an error; the listing restarts from the first page and the body
    /// carries `"cursorReset": true`.
    pub fn call(&self, ctx: &mut RequestContext, name: &str, body: &str) -> Response {
        let started = Instant::now();
        ctx.record_call();

        let Some(procedure) = Procedure::parse(name) else {
            return fail(name, &RpcError::UnknownProcedure(name.to_string()));
        };
        let input = match Input::parse(body, self.config.max_input_size) {
            Ok(input) => input,
            Err(err) => return fail(procedure.name(), &err.into()),
        };
        if let Some(response) = ctx.cached(procedure, &input.canonical) {
            debug!(procedure = procedure.name(), "served from request cache");
            return response;
        }

        match self.dispatch(ctx, procedure, &input.params) {
            Ok(served) => {
                info!(
                    procedure = procedure.name(),
                    items = served.items,
                    has_next_page = served.has_next_page,
                    elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
                    "procedure served"
                );
                let response = Response::ok(&served.body);
                ctx.remember(procedure, input.canonical, &response);
                response
            },
            Err(err) => fail(procedure.name(), &err),
        }
    }

    fn dispatch(
        &self,
        ctx: &RequestContext,
        procedure: Procedure,
        raw: &RawParams,
    ) -> Result<Served, RpcError> {
        let scope = if procedure.requires_session() {
            let session = ctx.session().ok_or(RpcError::Unauthorized {
                procedure: procedure.name(),
            })?;
            OwnerScope::owner(session.user_id.as_str())
        } else {
            OwnerScope::Public
        };

        match procedure.listing() {
            Listing::Grows(sort) => self.serve::<Grows>(procedure, sort, raw, &scope),
            Listing::Plants(sort) => self.serve::<Plants>(procedure, sort, raw, &scope),
            Listing::Photos(sort) => self.serve::<Photos>(procedure, sort, raw, &scope),
        }
    }

    fn serve<E>(
        &self,
        procedure: Procedure,
        sort: SortSpec<E::SortKey>,
        raw: &RawParams,
        scope: &OwnerScope,
    ) -> Result<Served, RpcError>
    where
        E: Entity,
        E::Record: ToJson,
    {
        let defaults = procedure.defaults(sort, &self.config);
        let (request, cursor_reset) = match normalize(raw, &defaults) {
            Ok(request) => (request, false),
            Err(FeedError::MalformedCursor(err)) => {
                warn!(
                    procedure = procedure.name(),
                    error = %err,
                    "discarding malformed cursor, restarting from first page"
                );
                let fresh = RawParams {
                    cursor: None,
                    page: None,
                    ..raw.clone()
                };
                (normalize(&fresh, &defaults)?, true)
            },
            Err(err) => return Err(err.into()),
        };

        let store = Traced {
            store: &self.store,
            procedure,
        };
        let page = paginate::<E, _>(&store, &request, scope)?;

        Ok(Served {
            body: page_to_json(&page, cursor_reset),
            items: page.len(),
            has_next_page: page.has_next_page,
        })
    }
}

/// Log and render a failed call.
fn fail(procedure: &str, err: &RpcError) -> Response {
    match err {
        RpcError::Feed(FeedError::Fetch(source)) => {
            error!(procedure, error = %source, "store fetch failed");
        },
        RpcError::Feed(FeedError::InvalidSortField { .. }) => {
            error!(procedure, error = %err, "sort field missing from registry");
        },
        _ => warn!(procedure, status = err.status(), error = %err, "procedure rejected"),
    }
    Response::problem(err)
}

/// Store wrapper that logs each planned query at debug level.
struct Traced<'a, S> {
    store: &'a S,
    procedure: Procedure,
}

impl<S: FeedStore> FeedStore for Traced<'_, S> {
    type Dialect = S::Dialect;

    fn dialect(&self) -> Self::Dialect {
        self.store.dialect()
    }

    fn fetch_rows(&self, query: &QueryResult) -> Result<Vec<Row>, FetchError> {
        debug!(
            procedure = self.procedure.name(),
            dialect = self.dialect().name(),
            sql = %query.sql,
            params = query.params.len(),
            "fetching rows"
        );
        self.store.fetch_rows(query)
    }

    fn count(&self, query: &QueryResult) -> Result<u64, FetchError> {
        debug!(
            procedure = self.procedure.name(),
            dialect = self.dialect().name(),
            sql = %query.sql,
            "counting rows"
        );
        self.store.count(query)
    }
}
