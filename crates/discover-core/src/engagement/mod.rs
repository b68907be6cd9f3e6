// SPDX-License-Identifier: Apache-2.0

//! Engagement aggregation.
//!
//! Turns the raw per-issue event lists (author, comments, reactions) into a
//! deduplicated record of who engaged with which issue, grouped either by
//! user or by issue.
//!
//! - [`reaction`] - reaction kinds, glyphs and sentiment
//! - [`collector`] - the uniqueness collector (seen-set and ignore list)
//! - [`aggregate`] - the per-issue pipeline and the two result shapes
//! - [`source`] - the issue data source seam and its cache decorator

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DiscoverError;

pub mod aggregate;
pub mod collector;
pub mod reaction;
pub mod source;

pub use aggregate::{
    ByIssue, ByUser, CommentTally, EngagementSink, IssueEngagement, ReactionGiven, UserEngagement,
    collect,
};
pub use collector::UniqueCollector;
pub use reaction::{Reaction, ReactionKind, classify};
pub use source::{CachedIssueSource, IssueSource};

/// A GitHub login.
pub type Actor = String;

/// An issue or pull request, by number, with its title for display.
///
/// The number is the identity; the title is metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRef {
    /// Repository-relative number.
    pub number: u64,
    /// Title, whitespace-trimmed.
    pub title: String,
}

/// The role in which an actor engaged with an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementCategory {
    /// Opened the issue.
    Author,
    /// Commented on the issue.
    Commenter,
    /// Reacted to the issue.
    ReactionGiver,
}

impl EngagementCategory {
    /// Categories in report order.
    pub const ALL: [EngagementCategory; 3] = [
        EngagementCategory::Author,
        EngagementCategory::Commenter,
        EngagementCategory::ReactionGiver,
    ];

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            EngagementCategory::Author => "author",
            EngagementCategory::Commenter => "commenter",
            EngagementCategory::ReactionGiver => "reaction giver",
        }
    }
}

impl fmt::Display for EngagementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Report orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// One section per user.
    Users,
    /// One section per issue.
    Issues,
}

impl FromStr for GroupBy {
    type Err = DiscoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "users" => Ok(GroupBy::Users),
            "issues" => Ok(GroupBy::Issues),
            other => Err(DiscoverError::InvalidGroupBy {
                value: other.to_string(),
            }),
        }
    }
}

/// Which engagement events count as duplicates of one another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniquenessScope {
    /// Treat all categories as one (an actor is mentioned once per issue).
    pub merge_categories: bool,
    /// Treat all issues as one (an actor is mentioned once per run).
    pub merge_issues: bool,
    /// Actors never reported.
    pub ignored_actors: HashSet<Actor>,
}

impl UniquenessScope {
    /// Builds a scope from the user-facing flags.
    pub fn new<I, S>(unique_in_issue: bool, unique_across_issues: bool, ignored: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Actor>,
    {
        Self {
            merge_categories: unique_in_issue,
            merge_issues: unique_across_issues,
            ignored_actors: ignored.into_iter().map(Into::into).collect(),
        }
    }
}

/// Options for one aggregation run.
#[derive(Debug, Clone, Default)]
pub struct EngagementOptions {
    /// Uniqueness configuration.
    pub scope: UniquenessScope,
    /// Drop negative reactions before they reach the collector.
    pub only_positive_reaction: bool,
}

/// One reaction event as returned by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReaction {
    /// Login of the reacting user.
    pub actor: Actor,
    /// Raw `ReactionContent` token.
    pub content: String,
}

/// Everything the aggregator needs to know about one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIssue {
    /// Issue number.
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// Author login.
    pub author: Actor,
    /// Comment authors, in thread order.
    pub comment_authors: Vec<Actor>,
    /// Reactions, in the order the API returned them.
    pub reactions: Vec<RawReaction>,
}
