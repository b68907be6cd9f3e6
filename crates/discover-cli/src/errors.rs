// SPDX-License-Identifier: Apache-2.0

//! CLI-specific error formatting with user-friendly hints.
//!
//! Downcasts `anyhow::Error` to `DiscoverError` and appends a hint for the
//! variants a user can act on. The library keeps structured error data; the
//! presentation lives here.

use anyhow::Error;
use discover_core::error::DiscoverError;

/// Formats an error for CLI display with helpful hints.
///
/// If the error is not a `DiscoverError`, returns the original error chain.
pub fn format_error(error: &Error) -> String {
    let Some(err) = error.downcast_ref::<DiscoverError>() else {
        return format!("{error:#}");
    };

    match err {
        DiscoverError::NotAuthenticated => {
            format!("{err}\n\nTip: Run `gh auth login`, or export GH_TOKEN.")
        }
        DiscoverError::Config { .. } => {
            format!(
                "{err}\n\nTip: Check your config file at {}",
                discover_core::config::config_file_path().display()
            )
        }
        DiscoverError::GitHub { .. } => {
            format!(
                "{err}\n\nTip: Check your internet connection and that your token can read the repository."
            )
        }
        DiscoverError::GraphQl { .. } => {
            format!("{err}\n\nTip: Check that every number passed to --issues exists in the repository.")
        }
        DiscoverError::InvalidRepository { .. } => {
            format!("{err}\n\nTip: Pass --repo owner/name.")
        }
        DiscoverError::InvalidGroupBy { .. } | DiscoverError::Cancelled => err.to_string(),
    }
}
