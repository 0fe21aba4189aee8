//! Procedure-level errors.

use grow_feed::FeedError;
use thiserror::Error;

use crate::input::InputError;

/// Why a procedure call failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RpcError {
    /// No procedure with that name.
    #[error("unknown procedure '{0}'")]
    UnknownProcedure(String),

    /// Owner-scoped procedure called without a session.
    #[error("{procedure} requires a signed-in user")]
    Unauthorized {
        /// Procedure name.
        procedure: &'static str,
    },

    /// Body is not a usable input object.
    #[error(transparent)]
    Input(#[from] InputError),

    /// Pagination failed.
    #[error(transparent)]
    Feed(#[from] FeedError),
}

impl RpcError {
    /// HTTP status for the problem document.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::UnknownProcedure(_) => 404,
            Self::Unauthorized { .. } => 401,
            Self::Input(_) => 400,
            Self::Feed(FeedError::Validation(_) | FeedError::MalformedCursor(_)) => 400,
            Self::Feed(_) => 500,
        }
    }

    /// Problem type URI.
    #[must_use]
    pub const fn problem_type(&self) -> &'static str {
        match self {
            Self::UnknownProcedure(_) => "urn:problem:not-found",
            Self::Unauthorized { .. } => "urn:problem:unauthorized",
            Self::Input(_) => "urn:problem:invalid-input",
            Self::Feed(FeedError::Validation(_)) => "urn:problem:validation",
            Self::Feed(FeedError::MalformedCursor(_)) => "urn:problem:malformed-cursor",
            Self::Feed(FeedError::Fetch(_)) => "urn:problem:fetch-failed",
            Self::Feed(_) => "urn:problem:internal",
        }
    }

    /// Short human-readable summary.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self.status() {
            400 => "Bad Request",
            401 => "Unauthorized",
            404 => "Not Found",
            _ => "Internal Server Error",
        }
    }

    /// Input field at fault, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Input(err) => err.field(),
            Self::Feed(FeedError::Validation(err)) => Some(err.field()),
            Self::Feed(FeedError::MalformedCursor(_)) => Some("cursor"),
            _ => None,
        }
    }
}
