//! Identifier validation for table, column and link names.
//!
//! Every name that reaches generated SQL comes from the static registry, so
//! an invalid one is a programming error and panics at construction time.

mod column;

pub use column::{assert_valid_sql_identifier, is_valid_sql_identifier};
