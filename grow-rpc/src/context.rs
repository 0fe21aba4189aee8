//! Per-request context.
//!
//! A [`RequestContext`] lives for one incoming request. It carries the
//! caller's session and remembers successful procedure responses, so a
//! prefetch and the render that follows it share one store round trip.
//! Call [`RequestContext::finish`] once the response is serialized.

use std::collections::HashMap;

use tracing::debug;

use crate::procedure::Procedure;
use crate::response::Response;

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Id of the signed-in user, matched against `owner_id`.
    pub user_id: String,
}

impl Session {
    /// Session for `user_id`.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Counters reported by [`RequestContext::finish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestSummary {
    /// Procedure calls made through the context.
    pub calls: usize,
    /// Calls answered from the response cache.
    pub cache_hits: usize,
}

/// State for a single request.
#[derive(Debug, Default)]
pub struct RequestContext {
    session: Option<Session>,
    responses: HashMap<(Procedure, String), Response>,
    summary: RequestSummary,
}

impl RequestContext {
    /// Context for a request with an optional session.
    #[must_use]
    pub fn new(session: Option<Session>) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }

    /// Context for a signed-in user.
    #[must_use]
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self::new(Some(Session::new(user_id)))
    }

    /// Context without a session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(None)
    }

    /// The caller's session.
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Number of cached responses.
    pub fn cached_len(&self) -> usize {
        self.responses.len()
    }

    pub(crate) fn record_call(&mut self) {
        self.summary.calls += 1;
    }

    pub(crate) fn cached(&mut self, procedure: Procedure, canonical: &str) -> Option<Response> {
        let response = self
            .responses
            .get(&(procedure, canonical.to_string()))
            .cloned()?;
        self.summary.cache_hits += 1;
        Some(response)
    }

    /// Only successful responses are kept.
    pub(crate) fn remember(&mut self, procedure: Procedure, canonical: String, response: &Response) {
        if response.is_success() {
            self.responses.insert((procedure, canonical), response.clone());
        }
    }

    /// End the request, dropping the session and cached responses.
    pub fn finish(self) -> RequestSummary {
        debug!(
            calls = self.summary.calls,
            cache_hits = self.summary.cache_hits,
            "request finished"
        );
        self.summary
    }
}
