// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! # Discover Core
//!
//! Core library for the `discover` CLI - who engaged with which GitHub issue.
//!
//! This crate provides reusable components for:
//! - Fetching issue engagement (author, commenters, reactions) over GraphQL
//! - Deduplicating engagement with configurable uniqueness scopes
//! - Aggregating it by user or by issue
//! - Configuration, token resolution and response caching
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use discover_core::{EngagementRequest, RepoRef, StaticTokenProvider, fetch_engagement};
//! use secrecy::SecretString;
//! use tokio::sync::watch;
//!
//! # async fn example() -> discover_core::Result<()> {
//! let provider = StaticTokenProvider::new(Some(SecretString::from("ghp_...".to_string())));
//! let request = EngagementRequest::builder()
//!     .repo(RepoRef::new("octocat", "Hello-World"))
//!     .issues(vec![1, 2])
//!     .group_by("users")
//!     .build();
//!
//! let (_shutdown_tx, shutdown_rx) = watch::channel(false);
//! let report = fetch_engagement(&provider, &request, shutdown_rx).await?;
//! println!("{}", report.repository);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration loading and paths
//! - [`engagement`] - Reaction classification, uniqueness and aggregation
//! - [`error`] - Error types
//! - [`github`] - GitHub API (auth, repository refs, GraphQL source)

// ============================================================================
// Authentication
// ============================================================================

pub use auth::{StaticTokenProvider, TokenProvider};

// ============================================================================
// Error Handling
// ============================================================================

pub use error::DiscoverError;

/// Convenience Result type for discover operations.
///
/// This is equivalent to `std::result::Result<T, DiscoverError>`.
pub type Result<T> = std::result::Result<T, DiscoverError>;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{
    AppConfig, CacheConfig, EngagementConfig, GitHubConfig, UserConfig, config_dir,
    config_file_path, load_config,
};

// ============================================================================
// Caching
// ============================================================================

pub use cache::CacheEntry;

// ============================================================================
// Engagement
// ============================================================================

pub use engagement::{
    Actor, ByIssue, ByUser, CommentTally, EngagementCategory, EngagementOptions, GroupBy,
    IssueEngagement, IssueRef, IssueSource, RawIssue, RawReaction, Reaction, ReactionGiven,
    ReactionKind, UniquenessScope, UserEngagement, classify,
};

// ============================================================================
// GitHub Integration
// ============================================================================

pub use github::RepoRef;
pub use github::auth::TokenSource;
pub use github::graphql::GitHubIssueSource;

// ============================================================================
// Platform-Agnostic Facade
// ============================================================================

pub use facade::{
    EngagementReport, EngagementRequest, EngagementView, engagement_from_source,
    fetch_engagement,
};

// ============================================================================
// Modules
// ============================================================================

pub mod auth;
pub mod cache;
pub mod config;
pub mod engagement;
pub mod error;
pub mod facade;
pub mod github;
pub mod retry;
