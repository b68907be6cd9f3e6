// SPDX-License-Identifier: Apache-2.0

//! Issue data source seam.
//!
//! The aggregator only sees [`IssueSource`]; the GitHub implementation lives
//! in [`crate::github::graphql`], and [`CachedIssueSource`] layers a TTL file
//! cache over any source.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Duration;
use tracing::{debug, instrument, warn};

use super::RawIssue;
use crate::cache::{self, CacheEntry};
use crate::github::RepoRef;

/// Fetches the raw engagement data of one issue.
///
/// Errors are returned to the aggregator unchanged and abort the run.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Fetches title, author, comment authors and reactions of `number` in `repo`.
    async fn fetch_issue(&self, repo: &RepoRef, number: u64) -> crate::Result<RawIssue>;
}

/// Wraps a source with a per-issue JSON file cache.
pub struct CachedIssueSource<S> {
    inner: S,
    dir: PathBuf,
    ttl: Duration,
}

impl<S> CachedIssueSource<S> {
    /// Caches `inner` under `dir` for `ttl`.
    pub fn new(inner: S, dir: PathBuf, ttl: Duration) -> Self {
        Self { inner, dir, ttl }
    }
}

#[async_trait]
impl<S: IssueSource> IssueSource for CachedIssueSource<S> {
    #[instrument(skip(self), fields(repo = %repo, number = number))]
    async fn fetch_issue(&self, repo: &RepoRef, number: u64) -> crate::Result<RawIssue> {
        let key = cache::cache_key_issue(&repo.owner, &repo.name, number);

        match cache::read_cache::<RawIssue>(&self.dir, &key) {
            Ok(Some(entry)) if entry.is_valid(self.ttl) => {
                debug!("Cache hit");
                return Ok(entry.data);
            }
            Ok(_) => debug!("Cache miss"),
            Err(e) => warn!(error = %e, "Ignoring unreadable cache entry"),
        }

        let issue = self.inner.fetch_issue(repo, number).await?;

        if let Err(e) = cache::write_cache(&self.dir, &key, &CacheEntry::new(issue.clone())) {
            debug!(error = %e, "Failed to write cache entry");
        }

        Ok(issue)
    }
}
