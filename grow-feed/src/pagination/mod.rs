//! Cursor and offset pagination.
//!
//! | Mode       | Entered by                       | Next cursor      | Totals |
//! |------------|----------------------------------|------------------|--------|
//! | **Keyset** | no cursor, or a boundary token   | boundary token   | no     |
//! | **Offset** | `page`, or an integer `cursor`   | next page number | yes    |
//!
//! Keyset mode orders by `(sort column, id)` and continues strictly after the
//! last row seen, so rows inserted behind the boundary never shift later
//! pages. Offset mode lets a caller jump to a page but shifts under
//! concurrent deletes.

mod cursor;
mod keyset;
mod page;
mod value_conv;

pub use cursor::{BoundaryCursor, Cursor, CursorError, MAX_CURSOR_SIZE};
pub use keyset::KeysetCondition;
pub use page::{Page, assemble};
