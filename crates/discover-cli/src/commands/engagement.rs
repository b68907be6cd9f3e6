// SPDX-License-Identifier: Apache-2.0

//! Engagement command handler.

use std::process::Command;
use std::time::Duration;

use anyhow::{Result, anyhow};
use discover_core::github::{parse_owner_repo, parse_remote_url};
use discover_core::{
    AppConfig, EngagementReport, EngagementRequest, GroupBy, RepoRef, fetch_engagement,
};
use tracing::{debug, instrument};

use crate::cli::EngagementArgs;
use crate::provider::CliTokenProvider;
use crate::shutdown;

/// Reads the `origin` remote of the repository in the working directory.
fn repo_from_git_remote() -> Option<RepoRef> {
    match Command::new("git")
        .args(["remote", "get-url", "origin"])
        .output()
    {
        Ok(output) if output.status.success() => {
            parse_remote_url(&String::from_utf8_lossy(&output.stdout))
        }
        Ok(output) => {
            debug!(status = ?output.status, "git remote get-url origin failed");
            None
        }
        Err(e) => {
            debug!(error = %e, "Failed to execute git");
            None
        }
    }
}

/// Resolves the target repository.
///
/// Priority: `--repo` flag > `origin` remote > `user.default_repo` config.
fn resolve_repo(flag: Option<&str>, config: &AppConfig) -> Result<RepoRef> {
    if let Some(repo) = flag {
        return Ok(parse_owner_repo(repo)?);
    }
    if let Some(repo) = repo_from_git_remote() {
        debug!(repo = %repo, "Using repository from git remote");
        return Ok(repo);
    }
    if let Some(repo) = config.user.default_repo.as_deref() {
        debug!(repo, "Using default repository from config");
        return Ok(parse_owner_repo(repo)?);
    }
    Err(anyhow!(
        "Could not determine the repository - run inside a GitHub clone or pass --repo owner/name"
    ))
}

/// Merges command-line flags over the configured defaults.
fn build_request(args: EngagementArgs, repo: RepoRef, config: &AppConfig) -> EngagementRequest {
    let defaults = &config.engagement;

    let mut ignored_users = defaults.ignored_users.clone();
    for user in args.ignore_users {
        if !ignored_users.contains(&user) {
            ignored_users.push(user);
        }
    }

    let cache_ttl = args
        .cache_ttl
        .unwrap_or(Duration::from_secs(config.cache.issue_ttl_seconds));

    EngagementRequest::builder()
        .repo(repo)
        .issues(args.issues)
        .group_by(args.group_by)
        .unique_in_issue(args.unique_in_issue.unwrap_or(defaults.unique_in_issue))
        .unique_across_issues(
            args.unique_across_issues
                .unwrap_or(defaults.unique_across_issues),
        )
        .positive_reaction(args.positive_reaction || defaults.positive_reaction)
        .ignored_users(ignored_users)
        .cache_ttl(cache_ttl)
        .page_size(config.github.effective_page_size())
        .build()
}

/// Fetches the engagement report for the requested issues.
#[instrument(skip_all, fields(issues = args.issues.len()))]
pub async fn run(args: EngagementArgs, config: &AppConfig) -> Result<EngagementReport> {
    // Reject a bad orientation before touching git or the network.
    args.group_by.parse::<GroupBy>()?;

    let repo = resolve_repo(args.repo.as_deref(), config)?;
    let request = build_request(args, repo, config);
    debug!(
        repo = %request.repo,
        group_by = %request.group_by,
        unique_in_issue = request.unique_in_issue,
        unique_across_issues = request.unique_across_issues,
        "Running engagement"
    );

    let report = fetch_engagement(&CliTokenProvider, &request, shutdown::watch_signals()).await?;
    Ok(report)
}
