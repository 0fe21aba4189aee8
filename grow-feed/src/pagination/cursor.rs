//! Cursor encoding and decoding.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use miniserde::{Deserialize, Serialize, json};
use thiserror::Error;

use crate::builder::{SortDir, Value};
use crate::registry::{SortKey, SortSpec};

use super::value_conv::{from_json, to_json};

/// Largest accepted token, checked before decoding.
pub const MAX_CURSOR_SIZE: usize = 4 * 1024;

/// Position to continue a listing from.
///
/// The two pagination modes are separate variants so a page number can never
/// be read as a boundary or the reverse.
#[derive(Debug, Clone, PartialEq)]
pub enum Cursor<K> {
    /// Offset mode: 1-based page number.
    Page(u32),
    /// Keyset mode: continue strictly after a boundary row.
    Boundary(BoundaryCursor<K>),
}

/// The last row of the previous page, in keyset mode.
///
/// Tokens are base64url JSON and are not signed. They carry only the sort
/// value and id of a row the caller has already seen.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryCursor<K> {
    /// Sort spec the token was minted under.
    pub sort: SortSpec<K>,
    /// Sort field value of the boundary row.
    pub value: Value,
    /// Id of the boundary row.
    pub id: String,
}

/// Wire shape of a boundary token.
#[derive(Serialize, Deserialize)]
struct Token {
    k: String,
    f: String,
    o: String,
    v: json::Value,
    id: String,
}

impl<K: SortKey> BoundaryCursor<K> {
    /// Create a boundary.
    pub fn new(sort: SortSpec<K>, value: Value, id: impl Into<String>) -> Self {
        Self {
            sort,
            value,
            id: id.into(),
        }
    }

    /// Encode as an opaque token.
    #[must_use]
    pub fn encode(&self) -> String {
        let token = Token {
            k: K::ENTITY.as_str().to_string(),
            f: self.sort.field.name().to_string(),
            o: self.sort.order.as_str().to_string(),
            v: to_json(&self.value),
            id: self.id.clone(),
        };
        URL_SAFE_NO_PAD.encode(json::to_string(&token))
    }

    /// Decode a token and check it was minted for `expected`.
    ///
    /// A token minted for another entity, sort field or order is stale and
    /// rejected, as is a value the sort column cannot hold.
    pub fn decode(encoded: &str, expected: SortSpec<K>) -> Result<Self, CursorError> {
        if encoded.len() > MAX_CURSOR_SIZE {
            return Err(CursorError::TooLarge { len: encoded.len() });
        }
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| CursorError::InvalidBase64)?;
        let text = String::from_utf8(bytes).map_err(|_| CursorError::InvalidFormat)?;
        let token: Token = json::from_str(&text).map_err(|_| CursorError::InvalidFormat)?;

        if token.k != K::ENTITY.as_str() {
            return Err(CursorError::EntityMismatch {
                expected: K::ENTITY.as_str(),
                found: token.k,
            });
        }
        if token.f != expected.field.name() {
            return Err(CursorError::SortFieldMismatch {
                expected: expected.field.name(),
                found: token.f,
            });
        }
        if token.o != expected.order.as_str() {
            return Err(CursorError::OrderMismatch {
                expected: expected.order,
                found: token.o,
            });
        }
        if token.id.is_empty() {
            return Err(CursorError::InvalidFormat);
        }

        let value = from_json(&token.v)
            .filter(|v| expected.field.descriptor().accepts(v))
            .ok_or(CursorError::ValueType {
                field: expected.field.name(),
            })?;

        Ok(Self {
            sort: expected,
            value,
            id: token.id,
        })
    }
}

/// Why a cursor token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CursorError {
    /// Token longer than [`MAX_CURSOR_SIZE`].
    #[error("cursor of {len} bytes exceeds the {max} byte limit", max = MAX_CURSOR_SIZE)]
    TooLarge {
        /// Token length.
        len: usize,
    },

    /// Not base64url.
    #[error("invalid base64 encoding in cursor")]
    InvalidBase64,

    /// Not the expected JSON object.
    #[error("invalid cursor format")]
    InvalidFormat,

    /// Minted for another entity kind.
    #[error("cursor is for {found}, expected {expected}")]
    EntityMismatch {
        /// Requested entity.
        expected: &'static str,
        /// Entity in the token.
        found: String,
    },

    /// Minted under another sort field.
    #[error("cursor is sorted by '{found}', expected '{expected}'")]
    SortFieldMismatch {
        /// Requested sort field.
        expected: &'static str,
        /// Sort field in the token.
        found: String,
    },

    /// Minted under another sort order.
    #[error("cursor is ordered '{found}', expected '{}'", .expected.as_str())]
    OrderMismatch {
        /// Requested order.
        expected: SortDir,
        /// Order in the token.
        found: String,
    },

    /// Boundary value of the wrong type for the sort column.
    #[error("cursor value does not fit sort field '{field}'")]
    ValueType {
        /// Requested sort field.
        field: &'static str,
    },
}
