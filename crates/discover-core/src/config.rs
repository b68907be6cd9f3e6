// SPDX-License-Identifier: Apache-2.0

//! Configuration management for discover.
//!
//! Provides layered configuration from files and environment variables.
//! Uses XDG-compliant paths with environment variable support.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables (prefix: `DISCOVER_`)
//! 2. Config file: `~/.config/discover/config.toml`
//! 3. Built-in defaults
//!
//! Command-line flags are applied on top by the CLI.
//!
//! # Examples
//!
//! ```bash
//! # Cache issue responses for ten minutes
//! DISCOVER_CACHE__ISSUE_TTL_SECONDS=600 discover engagement --issues 1 --group-by users
//! ```

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::DiscoverError;

/// Largest page size the GitHub GraphQL API accepts for a connection.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// User preferences.
    pub user: UserConfig,
    /// GitHub API settings.
    pub github: GitHubConfig,
    /// Cache settings.
    pub cache: CacheConfig,
    /// Default engagement options.
    pub engagement: EngagementConfig,
}

/// User preferences.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct UserConfig {
    /// Repository used when neither `--repo` nor the git remote yields one.
    pub default_repo: Option<String>,
}

/// GitHub API settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Page size for comment and reaction connections.
    pub page_size: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
        }
    }
}

impl GitHubConfig {
    /// Page size clamped to what the API accepts.
    #[must_use]
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Cache settings.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CacheConfig {
    /// Per-issue response TTL in seconds. Zero disables caching.
    pub issue_ttl_seconds: u64,
}

/// Default engagement options, overridable from the command line.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EngagementConfig {
    /// Mention a user only once per issue, whatever their role.
    pub unique_in_issue: bool,
    /// Mention a user only once across all requested issues.
    pub unique_across_issues: bool,
    /// Count only positive reactions.
    pub positive_reaction: bool,
    /// Logins excluded from every report.
    pub ignored_users: Vec<String>,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            unique_in_issue: true,
            unique_across_issues: false,
            positive_reaction: false,
            ignored_users: Vec::new(),
        }
    }
}

/// Returns the discover configuration directory.
///
/// Respects the `XDG_CONFIG_HOME` environment variable if set,
/// otherwise defaults to `~/.config/discover`.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_config.is_empty() {
            return PathBuf::from(xdg_config).join("discover");
        }
    }
    dirs::home_dir()
        .unwrap_or_default()
        .join(".config")
        .join("discover")
}

/// Returns the path to the configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load application configuration.
///
/// Loads from config file (if exists) and environment variables.
/// Environment variables use the prefix `DISCOVER_` and double underscore
/// for nested keys (e.g., `DISCOVER_ENGAGEMENT__POSITIVE_REACTION`).
///
/// # Errors
///
/// Returns `DiscoverError::Config` if the config file exists but is invalid.
pub fn load_config() -> Result<AppConfig, DiscoverError> {
    let config_path = config_file_path();

    let config = Config::builder()
        .add_source(File::with_name(config_path.to_string_lossy().as_ref()).required(false))
        .add_source(
            Environment::with_prefix("DISCOVER")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("engagement.ignored_users")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn from_toml(s: &str) -> AppConfig {
        Config::builder()
            .add_source(config::File::from_str(s, config::FileFormat::Toml))
            .build()
            .expect("should build config")
            .try_deserialize()
            .expect("should deserialize")
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert!(config.user.default_repo.is_none());
        assert_eq!(config.github.page_size, 100);
        assert_eq!(config.cache.issue_ttl_seconds, 0);
        assert!(config.engagement.unique_in_issue);
        assert!(!config.engagement.unique_across_issues);
        assert!(!config.engagement.positive_reaction);
        assert!(config.engagement.ignored_users.is_empty());
    }

    #[test]
    #[serial]
    fn test_config_file_path() {
        let path = config_file_path();
        assert!(path.ends_with("config.toml"));
        assert!(config_dir().ends_with("discover"));
    }

    #[test]
    #[serial]
    fn test_config_dir_respects_xdg() {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", "/custom/config");
        }

        let dir = config_dir();

        unsafe {
            match original {
                Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }

        assert_eq!(dir, PathBuf::from("/custom/config/discover"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = from_toml(
            r#"
[engagement]
positive_reaction = true
ignored_users = ["dependabot[bot]", "k8s-ci-robot"]
"#,
        );

        assert!(config.engagement.positive_reaction);
        assert!(config.engagement.unique_in_issue);
        assert_eq!(
            config.engagement.ignored_users,
            vec!["dependabot[bot]".to_string(), "k8s-ci-robot".to_string()]
        );
        assert_eq!(config.github.page_size, 100);
    }

    #[test]
    fn test_user_and_cache_sections() {
        let config = from_toml(
            r#"
[user]
default_repo = "mszostok/codeowners-validator"

[cache]
issue_ttl_seconds = 3600
"#,
        );

        assert_eq!(
            config.user.default_repo.as_deref(),
            Some("mszostok/codeowners-validator")
        );
        assert_eq!(config.cache.issue_ttl_seconds, 3600);
    }

    #[test]
    fn test_page_size_is_clamped() {
        let config = from_toml("[github]\npage_size = 500\n");
        assert_eq!(config.github.effective_page_size(), 100);

        let config = from_toml("[github]\npage_size = 0\n");
        assert_eq!(config.github.effective_page_size(), 1);
    }

    #[test]
    #[serial]
    fn test_env_override() {
        unsafe {
            std::env::set_var("DISCOVER_ENGAGEMENT__UNIQUE_ACROSS_ISSUES", "true");
        }
        let config = load_config();
        unsafe {
            std::env::remove_var("DISCOVER_ENGAGEMENT__UNIQUE_ACROSS_ISSUES");
        }

        let config = config.expect("should load");
        assert!(config.engagement.unique_across_issues);
    }

    #[test]
    #[serial]
    fn test_env_override_ignored_users_list() {
        unsafe {
            std::env::set_var("DISCOVER_ENGAGEMENT__IGNORED_USERS", "dependabot,renovate");
        }
        let config = load_config();
        unsafe {
            std::env::remove_var("DISCOVER_ENGAGEMENT__IGNORED_USERS");
        }

        let config = config.expect("should load");
        assert_eq!(config.engagement.ignored_users, vec!["dependabot", "renovate"]);
    }
}
