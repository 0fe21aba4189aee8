//! Feed configuration from environment variables.
//!
//! | Variable                   | Default |
//! |----------------------------|---------|
//! | `GROWFEED_MAX_PAGE_SIZE`   | 100     |
//! | `GROWFEED_GROWS_PER_PAGE`  | 12      |
//! | `GROWFEED_PLANTS_PER_PAGE` | 12      |
//! | `GROWFEED_PHOTOS_PER_PAGE` | 4       |
//! | `GROWFEED_MAX_INPUT_SIZE`  | 65536   |
//! | `GROWFEED_LOG`             | info    |
//!
//! Unparseable or zero values fall back to the default with a warning.
//! Per-page defaults larger than the max page size are clamped to it.

use std::str::FromStr;

use grow_feed::EntityKind;
use tracing::warn;

use crate::env::EnvCache;

// ============================================================================
// VARIABLE NAMES
// ============================================================================

/// Largest `limit` a caller may request.
pub const ENV_MAX_PAGE_SIZE: &str = "GROWFEED_MAX_PAGE_SIZE";
/// Default page size for grow listings.
pub const ENV_GROWS_PER_PAGE: &str = "GROWFEED_GROWS_PER_PAGE";
/// Default page size for plant listings.
pub const ENV_PLANTS_PER_PAGE: &str = "GROWFEED_PLANTS_PER_PAGE";
/// Default page size for photo listings.
pub const ENV_PHOTOS_PER_PAGE: &str = "GROWFEED_PHOTOS_PER_PAGE";
/// Largest accepted procedure input, in bytes.
pub const ENV_MAX_INPUT_SIZE: &str = "GROWFEED_MAX_INPUT_SIZE";
/// `tracing` filter directive.
pub const ENV_LOG: &str = "GROWFEED_LOG";

// ============================================================================
// DEFAULTS
// ============================================================================

/// Default for [`ENV_MAX_PAGE_SIZE`].
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;
/// Default for [`ENV_GROWS_PER_PAGE`].
pub const DEFAULT_GROWS_PER_PAGE: u32 = 12;
/// Default for [`ENV_PLANTS_PER_PAGE`].
pub const DEFAULT_PLANTS_PER_PAGE: u32 = 12;
/// Default for [`ENV_PHOTOS_PER_PAGE`].
pub const DEFAULT_PHOTOS_PER_PAGE: u32 = 4;
/// Default for [`ENV_MAX_INPUT_SIZE`] (64KB).
pub const DEFAULT_MAX_INPUT_SIZE: usize = 64 * 1024;
/// Default for [`ENV_LOG`].
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Resolved feed settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    /// Largest `limit` a caller may request.
    pub max_page_size: u32,
    /// Default grow page size.
    pub grows_per_page: u32,
    /// Default plant page size.
    pub plants_per_page: u32,
    /// Default photo page size.
    pub photos_per_page: u32,
    /// Largest accepted input body, in bytes.
    pub max_input_size: usize,
    /// `tracing` filter directive.
    pub log_filter: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            grows_per_page: DEFAULT_GROWS_PER_PAGE,
            plants_per_page: DEFAULT_PLANTS_PER_PAGE,
            photos_per_page: DEFAULT_PHOTOS_PER_PAGE,
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl FeedConfig {
    /// Read the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_cache(&EnvCache::from_process())
    }

    /// Read explicit name/value pairs.
    #[must_use]
    pub fn from_pairs(vars: Vec<(String, String)>) -> Self {
        Self::from_cache(&EnvCache::new(vars))
    }

    /// Read a cached environment.
    #[must_use]
    pub fn from_cache(env: &EnvCache) -> Self {
        let max_page_size = positive(env, ENV_MAX_PAGE_SIZE, DEFAULT_MAX_PAGE_SIZE);
        let per_page = |name, default| page_size(env, name, default, max_page_size);

        Self {
            max_page_size,
            grows_per_page: per_page(ENV_GROWS_PER_PAGE, DEFAULT_GROWS_PER_PAGE),
            plants_per_page: per_page(ENV_PLANTS_PER_PAGE, DEFAULT_PLANTS_PER_PAGE),
            photos_per_page: per_page(ENV_PHOTOS_PER_PAGE, DEFAULT_PHOTOS_PER_PAGE),
            max_input_size: positive(env, ENV_MAX_INPUT_SIZE, DEFAULT_MAX_INPUT_SIZE),
            log_filter: env.get_or(ENV_LOG, DEFAULT_LOG_FILTER).to_string(),
        }
    }

    /// Default page size for an entity kind.
    #[must_use]
    pub const fn per_page(&self, kind: EntityKind) -> u32 {
        match kind {
            EntityKind::Grow => self.grows_per_page,
            EntityKind::Plant => self.plants_per_page,
            EntityKind::Photo => self.photos_per_page,
        }
    }
}

/// A default page size, clamped to `max_page_size` with a warning.
fn page_size(env: &EnvCache, name: &str, default: u32, max_page_size: u32) -> u32 {
    let value = positive(env, name, default);
    if value > max_page_size {
        warn!(
            variable = name,
            value,
            max_page_size,
            "default page size exceeds max page size, clamping"
        );
    }
    value.min(max_page_size)
}

/// A strictly positive number, or `default` with a warning.
fn positive<T>(env: &EnvCache, name: &str, default: T) -> T
where
    T: FromStr + PartialOrd + Default + Copy + std::fmt::Display,
{
    match env.parse::<T>(name) {
        None => default,
        Some(Ok(value)) if value > T::default() => value,
        Some(_) => {
            warn!(
                variable = name,
                value = env.get(name).unwrap_or_default(),
                default = %default,
                "invalid configuration value, using default"
            );
            default
        },
    }
}
