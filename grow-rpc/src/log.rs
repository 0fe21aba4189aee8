//! Structured JSON logging.
//!
//! Procedures emit `tracing` events; [`init`] installs a subscriber that
//! writes them as one JSON object per line:
//!
//! ```json
//! {"timestamp":"2025-01-16T10:30:00.000Z","level":"INFO","fields":{"message":"procedure served","procedure":"plants.getOwnPlants","items":12,"has_next_page":true,"elapsed_us":412},"target":"grow_rpc::router"}
//! {"timestamp":"2025-01-16T10:30:01.000Z","level":"WARN","fields":{"message":"discarding malformed cursor, restarting from first page","procedure":"photos.getOwnPhotos","error":"cursor is ordered 'asc', expected 'desc'"},"target":"grow_rpc::router"}
//! ```
//!
//! | Level   | Events                                   |
//! |---------|------------------------------------------|
//! | `error` | store failures                           |
//! | `warn`  | cursor resets, rejected input            |
//! | `info`  | served procedures                        |
//! | `debug` | planned SQL, response cache hits         |
//!
//! The filter uses [`EnvFilter`] directive syntax, e.g.
//! `GROWFEED_LOG=grow_rpc=debug`. Services pass
//! [`FeedConfig::log_filter`](crate::FeedConfig::log_filter) to
//! [`init_with_filter`]; [`init`] reads `GROWFEED_LOG` directly.

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{DEFAULT_LOG_FILTER, ENV_LOG};

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Install the JSON subscriber, filtered by `GROWFEED_LOG`.
///
/// Safe to call more than once; only the first call has an effect.
/// Returns whether this process now logs through the grow-rpc subscriber
/// (`false` when another global subscriber was installed first).
pub fn init() -> bool {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    install(filter)
}

/// Install the JSON subscriber with an explicit filter directive.
///
/// An unparseable directive falls back to `info`.
pub fn init_with_filter(directive: &str) -> bool {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    install(filter)
}

fn install(filter: EnvFilter) -> bool {
    *INSTALLED.get_or_init(|| {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .is_ok()
    })
}
