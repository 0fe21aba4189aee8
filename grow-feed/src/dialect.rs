//! Placeholder and pattern-match syntax for the two stores the feed runs on.

/// Where Postgres and `SQLite` disagree in the SQL the planner emits.
pub trait Dialect: Clone + Copy {
    /// Placeholder for the `idx`-th bound value (1-based).
    fn param(&self, idx: usize) -> String;

    /// Keyword for a case-insensitive pattern match.
    fn ilike(&self) -> &'static str;

    /// Short name used in log fields.
    fn name(&self) -> &'static str;
}

/// Postgres: `$n` placeholders, native `ILIKE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("${idx}")
    }

    #[inline]
    fn ilike(&self) -> &'static str {
        "ILIKE"
    }

    #[inline]
    fn name(&self) -> &'static str {
        "postgres"
    }
}

/// `SQLite`: `?n` placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Dialect for Sqlite {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("?{idx}")
    }

    #[inline]
    fn ilike(&self) -> &'static str {
        // LIKE already ignores ASCII case
        "LIKE"
    }

    #[inline]
    fn name(&self) -> &'static str {
        "sqlite"
    }
}
