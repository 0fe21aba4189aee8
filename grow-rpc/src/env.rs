//! Environment variable access.
//!
//! Variables are read once into an [`EnvCache`] so configuration can be
//! built from the process environment or from explicit pairs in tests.
//!
//! ```
//! # use grow_rpc::env::EnvCache;
//! let cache = EnvCache::new(vec![
//!     ("GROWFEED_MAX_PAGE_SIZE".to_string(), "50".to_string()),
//! ]);
//!
//! assert_eq!(cache.get("GROWFEED_MAX_PAGE_SIZE"), Some("50"));
//! assert_eq!(cache.get_or("GROWFEED_LOG", "info"), "info");
//! assert_eq!(cache.parse::<u32>("GROWFEED_MAX_PAGE_SIZE"), Some(Ok(50)));
//! ```

use std::collections::HashMap;
use std::str::FromStr;

/// Environment variable cache.
///
/// Later duplicates of a name win, as with repeated `export`s.
#[derive(Debug, Clone, Default)]
pub struct EnvCache {
    map: HashMap<String, String>,
}

impl EnvCache {
    /// Build a cache from name/value pairs.
    #[must_use]
    pub fn new(vars: Vec<(String, String)>) -> Self {
        Self {
            map: vars.into_iter().collect(),
        }
    }

    /// Snapshot the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            map: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Get a variable by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    /// Get a variable or a default.
    #[must_use]
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Parse a variable, surrounding whitespace trimmed.
    ///
    /// `None` when unset, `Some(Err(_))` when set but unparseable.
    pub fn parse<T: FromStr>(&self, name: &str) -> Option<Result<T, T::Err>> {
        self.get(name).map(|v| v.trim().parse())
    }

    /// Number of cached variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no variables are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
