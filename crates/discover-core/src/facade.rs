// SPDX-License-Identifier: Apache-2.0

//! Platform-agnostic facade for front ends.
//!
//! Front ends implement [`TokenProvider`], describe the run with an
//! [`EngagementRequest`], and get back an [`EngagementReport`] ready to render.
//! Credential resolution, client construction and the optional issue cache
//! are handled here.

use std::path::PathBuf;
use std::time::Duration;

use bon::Builder;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, instrument};

use crate::auth::TokenProvider;
use crate::cache;
use crate::config::MAX_PAGE_SIZE;
use crate::engagement::{
    ByIssue, ByUser, CachedIssueSource, EngagementOptions, GroupBy, IssueSource, UniquenessScope,
    collect,
};
use crate::error::DiscoverError;
use crate::github::RepoRef;
use crate::github::auth::create_client_with_token;
use crate::github::graphql::GitHubIssueSource;

/// Parameters of one engagement run.
#[derive(Debug, Clone, Builder)]
pub struct EngagementRequest {
    /// Repository the issues belong to.
    pub repo: RepoRef,
    /// Issue or pull request numbers, in report order.
    pub issues: Vec<u64>,
    /// Report orientation, `users` or `issues`.
    #[builder(into)]
    pub group_by: String,
    /// Mention an actor once per issue regardless of category.
    #[builder(default = true)]
    pub unique_in_issue: bool,
    /// Mention an actor once across all requested issues.
    #[builder(default)]
    pub unique_across_issues: bool,
    /// Drop negative reactions.
    #[builder(default)]
    pub positive_reaction: bool,
    /// Logins never reported.
    #[builder(default)]
    pub ignored_users: Vec<String>,
    /// How long fetched issues stay cached. `None` or zero disables the cache.
    pub cache_ttl: Option<Duration>,
    /// Cache location, defaults to the platform cache directory.
    pub cache_dir: Option<PathBuf>,
    /// GraphQL page size for comments and reactions.
    #[builder(default = MAX_PAGE_SIZE)]
    pub page_size: u32,
}

impl EngagementRequest {
    /// Parses the requested orientation.
    ///
    /// # Errors
    ///
    /// Returns `DiscoverError::InvalidGroupBy` for anything but `users` or `issues`.
    pub fn orientation(&self) -> crate::Result<GroupBy> {
        self.group_by.parse()
    }

    fn options(&self) -> EngagementOptions {
        EngagementOptions {
            scope: UniquenessScope::new(
                self.unique_in_issue,
                self.unique_across_issues,
                self.ignored_users.iter().cloned(),
            ),
            only_positive_reaction: self.positive_reaction,
        }
    }
}

/// Aggregated engagement in the requested orientation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "group_by", rename_all = "snake_case")]
pub enum EngagementView {
    /// Grouped by user.
    Users(ByUser),
    /// Grouped by issue.
    Issues(ByIssue),
}

/// Result of an engagement run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngagementReport {
    /// Repository the issues belong to.
    pub repository: RepoRef,
    /// The aggregated data.
    #[serde(flatten)]
    pub view: EngagementView,
}

/// Runs an engagement aggregation against GitHub.
///
/// The orientation is validated before any credential lookup or network call.
///
/// # Errors
///
/// Returns an error if:
/// - `group_by` is not a known orientation
/// - no GitHub token is available from the provider
/// - a GitHub query fails
/// - `shutdown` is raised before the run completes
#[instrument(
    skip(provider, request, shutdown),
    fields(repo = %request.repo, issues = request.issues.len())
)]
pub async fn fetch_engagement(
    provider: &dyn TokenProvider,
    request: &EngagementRequest,
    shutdown: watch::Receiver<bool>,
) -> crate::Result<EngagementReport> {
    request.orientation()?;

    let token = provider
        .github_token()
        .ok_or(DiscoverError::NotAuthenticated)?;
    let client = create_client_with_token(&token)?;
    let github = GitHubIssueSource::new(client, request.page_size);

    let ttl = request.cache_ttl.filter(|ttl| !ttl.is_zero());
    let dir = request.cache_dir.clone().or_else(cache::cache_dir);
    let source: Box<dyn IssueSource> = match (ttl, dir) {
        (Some(ttl), Some(dir)) => {
            let ttl = chrono::Duration::from_std(ttl).map_err(|e| DiscoverError::Config {
                message: format!("Cache TTL out of range: {e}"),
            })?;
            debug!(dir = %dir.display(), ttl_seconds = ttl.num_seconds(), "Issue cache enabled");
            Box::new(CachedIssueSource::new(github, dir, ttl))
        }
        _ => Box::new(github),
    };

    engagement_from_source(source.as_ref(), request, shutdown).await
}

/// Runs an engagement aggregation against any issue source.
///
/// # Errors
///
/// Returns an error if `group_by` is invalid, the source fails, or
/// `shutdown` is raised before the run completes.
pub async fn engagement_from_source(
    source: &(impl IssueSource + ?Sized),
    request: &EngagementRequest,
    shutdown: watch::Receiver<bool>,
) -> crate::Result<EngagementReport> {
    let group_by = request.orientation()?;
    let options = request.options();

    let view = match group_by {
        GroupBy::Users => EngagementView::Users(
            collect(source, &request.repo, &request.issues, &options, shutdown).await?,
        ),
        GroupBy::Issues => EngagementView::Issues(
            collect(source, &request.repo, &request.issues, &options, shutdown).await?,
        ),
    };

    Ok(EngagementReport {
        repository: request.repo.clone(),
        view,
    })
}
