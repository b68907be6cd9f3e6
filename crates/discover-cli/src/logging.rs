// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for the discover CLI.
//!
//! Uses `tracing` with `tracing-subscriber` for structured logging on stderr,
//! so stdout stays clean for the report. Log level can be controlled via the
//! `RUST_LOG` environment variable.
//!
//! # Examples
//!
//! ```bash
//! # Default: warnings only
//! discover engagement --issues 1 --group-by users
//!
//! # Per-issue fetch and cache decisions
//! RUST_LOG=discover=debug discover engagement --issues 1 --group-by users
//!
//! # Every suppressed duplicate
//! RUST_LOG=discover=trace discover engagement --issues 1 --group-by users
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "discover=warn,discover_core=warn,octocrab=error";

/// Filter used with `-v`.
const VERBOSE_FILTER: &str = "discover=info,discover_core=info,octocrab=warn";

/// Initialize the logging subsystem.
///
/// `RUST_LOG` always wins; otherwise `verbose` raises the crate level to info.
pub fn init_logging(verbose: bool) {
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let default_filter = if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
