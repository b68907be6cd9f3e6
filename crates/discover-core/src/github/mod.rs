// SPDX-License-Identifier: Apache-2.0

//! GitHub integration module.
//!
//! Provides token resolution, repository identification, and the GraphQL
//! issue data source.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DiscoverError;

pub mod auth;
pub mod graphql;

/// Repository identifier (`owner/name`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    /// Owning user or organization.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoRef {
    /// Creates a repository reference.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Web URL of an issue (GitHub redirects to the pull request when needed).
    #[must_use]
    pub fn issue_url(&self, number: u64) -> String {
        format!(
            "https://github.com/{}/{}/issues/{number}",
            self.owner, self.name
        )
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoRef {
    type Err = DiscoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_owner_repo(s)
    }
}

/// Parses an `owner/repo` string.
///
/// Validates format: exactly one `/`, non-empty parts.
///
/// # Errors
///
/// Returns `DiscoverError::InvalidRepository` if the format is invalid.
pub fn parse_owner_repo(s: &str) -> crate::Result<RepoRef> {
    let s = s.trim();
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(DiscoverError::InvalidRepository {
            value: s.to_string(),
        });
    }
    Ok(RepoRef::new(parts[0], parts[1]))
}

/// Extracts the repository from a GitHub git remote URL.
///
/// Supports:
/// - HTTPS: `https://github.com/owner/repo(.git)`
/// - SSH: `git@github.com:owner/repo(.git)`
/// - SSH URL: `ssh://git@github.com/owner/repo(.git)`
///
/// Returns `None` for remotes that do not point at github.com.
#[must_use]
pub fn parse_remote_url(url: &str) -> Option<RepoRef> {
    let url = url.trim();
    let path = url
        .strip_prefix("git@github.com:")
        .or_else(|| url.strip_prefix("ssh://git@github.com/"))
        .or_else(|| url.strip_prefix("https://github.com/"))
        .or_else(|| url.strip_prefix("http://github.com/"))?;

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let repo = parse_owner_repo(path).ok()?;
    debug!(repo = %repo, "Parsed repository from git remote");
    Some(repo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_owner_repo_valid() {
        let repo = parse_owner_repo("octocat/Hello-World").unwrap();
        assert_eq!(repo.owner, "octocat");
        assert_eq!(repo.name, "Hello-World");
        assert_eq!(repo.to_string(), "octocat/Hello-World");
    }

    #[test]
    fn test_parse_owner_repo_invalid_no_slash() {
        assert!(matches!(
            parse_owner_repo("octocat"),
            Err(DiscoverError::InvalidRepository { .. })
        ));
    }

    #[test]
    fn test_parse_owner_repo_invalid_empty_parts() {
        assert!(parse_owner_repo("/repo").is_err());
        assert!(parse_owner_repo("owner/").is_err());
        assert!(parse_owner_repo("a/b/c").is_err());
    }

    #[test]
    fn test_repo_from_str() {
        let repo: RepoRef = "mszostok/gh-discover".parse().unwrap();
        assert_eq!(repo, RepoRef::new("mszostok", "gh-discover"));
    }

    #[test]
    fn test_issue_url() {
        let repo = RepoRef::new("octocat", "Hello-World");
        assert_eq!(
            repo.issue_url(42),
            "https://github.com/octocat/Hello-World/issues/42"
        );
    }

    #[test]
    fn test_parse_remote_url_https() {
        assert_eq!(
            parse_remote_url("https://github.com/octocat/Hello-World.git"),
            Some(RepoRef::new("octocat", "Hello-World"))
        );
        assert_eq!(
            parse_remote_url("https://github.com/octocat/Hello-World/\n"),
            Some(RepoRef::new("octocat", "Hello-World"))
        );
    }

    #[test]
    fn test_parse_remote_url_ssh() {
        assert_eq!(
            parse_remote_url("git@github.com:octocat/Hello-World.git"),
            Some(RepoRef::new("octocat", "Hello-World"))
        );
        assert_eq!(
            parse_remote_url("ssh://git@github.com/octocat/Hello-World"),
            Some(RepoRef::new("octocat", "Hello-World"))
        );
    }

    #[test]
    fn test_parse_remote_url_other_host() {
        assert_eq!(parse_remote_url("https://gitlab.com/octocat/Hello-World"), None);
        assert_eq!(parse_remote_url("not a url"), None);
    }
}
