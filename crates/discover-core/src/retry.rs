// SPDX-License-Identifier: Apache-2.0

//! Retry logic with exponential backoff for transient failures.
//!
//! Used by the GitHub data source only; the aggregator never retries.

use std::time::Duration;

use backon::ExponentialBuilder;

/// Determines if an HTTP status code is retryable.
///
/// Retryable status codes are 429 and the transient 5xx family
/// (500, 502, 503, 504).
#[must_use]
pub fn is_retryable_http(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Determines if a GitHub API error response is retryable.
///
/// A 403 is retried only when its message reports a rate limit; other 403s
/// are permission failures.
#[must_use]
pub fn is_retryable_github(status: u16, message: &str) -> bool {
    if status == 403 {
        return message.to_ascii_lowercase().contains("rate limit");
    }
    is_retryable_http(status)
}

/// Determines if an octocrab error is retryable.
///
/// Retryable octocrab errors include:
/// - GitHub API errors with retryable status codes, plus rate-limited 403s
/// - Service errors (transient)
/// - Hyper errors (network-related)
#[must_use]
pub fn is_retryable_octocrab(e: &octocrab::Error) -> bool {
    match e {
        octocrab::Error::GitHub { source, .. } => {
            is_retryable_github(source.status_code.as_u16(), &source.message)
        }
        octocrab::Error::Service { .. } | octocrab::Error::Hyper { .. } => true,
        _ => false,
    }
}

/// Creates a configured exponential backoff builder for retries.
///
/// - Factor: 2
/// - Min delay: 1 second
/// - Max times: 3
/// - Jitter: enabled
#[must_use]
pub fn retry_backoff() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_factor(2.0)
        .with_min_delay(Duration::from_secs(1))
        .with_max_times(3)
        .with_jitter()
}
