//! Identifier checks for names interpolated into generated SQL.

/// Postgres truncates identifiers beyond this length.
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Returns `true` if `s` can be spliced into SQL as a bare identifier.
///
/// Accepted: an ASCII letter or underscore followed by ASCII letters, digits
/// or underscores, 1 to 63 bytes long.
///
/// ```
/// use grow_feed::is_valid_sql_identifier;
///
/// assert!(is_valid_sql_identifier("capture_date"));
/// assert!(is_valid_sql_identifier("plant_images"));
/// assert!(!is_valid_sql_identifier("createdAt; --"));
/// assert!(!is_valid_sql_identifier("2fast"));
/// ```
#[inline]
#[must_use]
pub fn is_valid_sql_identifier(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_IDENTIFIER_LENGTH {
        return false;
    }

    let mut bytes = s.bytes();
    let head_ok = bytes
        .next()
        .is_some_and(|b| b.is_ascii_alphabetic() || b == b'_');
    head_ok && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Panic unless `s` is a valid identifier.
///
/// `context` names what is being checked (`"table"`, `"sort field"`, ...) and
/// appears in the panic message. Registry names are compile-time constants,
/// so a failure here is a bug, never bad user input.
///
/// # Panics
///
/// Panics if [`is_valid_sql_identifier`] rejects `s`.
#[inline]
pub fn assert_valid_sql_identifier(s: &str, context: &str) {
    assert!(
        is_valid_sql_identifier(s),
        "Invalid SQL {context} name '{s}': expected 1-63 ASCII letters, digits \
         or underscores, not starting with a digit"
    );
}
