// SPDX-License-Identifier: Apache-2.0

//! Error types for discover.
//!
//! Uses `thiserror` for deriving `std::error::Error` implementations.
//! Application code should use `anyhow::Result` for top-level error handling.

use thiserror::Error;

/// Errors that can occur while computing an engagement report.
#[derive(Error, Debug)]
pub enum DiscoverError {
    /// GitHub API error from octocrab.
    #[error("GitHub API error: {message}")]
    GitHub {
        /// Error message.
        message: String,
    },

    /// The GraphQL endpoint answered, but with errors or without usable data.
    #[error("GraphQL error: {message}")]
    GraphQl {
        /// Error message (usually the serialized `errors` array).
        message: String,
    },

    /// No GitHub token could be resolved.
    #[error(
        "Authentication required - set GH_TOKEN or GITHUB_TOKEN, or log in with `gh auth login`"
    )]
    NotAuthenticated,

    /// Configuration file error.
    #[error("Configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// Unknown report orientation.
    #[error("unknown {value} group by, allowed values: users, issues")]
    InvalidGroupBy {
        /// The rejected value.
        value: String,
    },

    /// Repository identifier is not in `owner/name` form.
    #[error("Invalid repository '{value}', expected owner/name")]
    InvalidRepository {
        /// The rejected value.
        value: String,
    },

    /// The run was interrupted before a full result was ready.
    #[error("Interrupted - no report was produced")]
    Cancelled,
}

impl From<octocrab::Error> for DiscoverError {
    fn from(err: octocrab::Error) -> Self {
        DiscoverError::GitHub {
            message: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for DiscoverError {
    fn from(err: config::ConfigError) -> Self {
        DiscoverError::Config {
            message: err.to_string(),
        }
    }
}
