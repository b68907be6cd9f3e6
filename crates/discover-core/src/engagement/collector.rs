// SPDX-License-Identifier: Apache-2.0

//! Uniqueness collector.
//!
//! Decides, for each `(issue, category, actor)` triple, whether an occurrence
//! should be recorded. The seen-set key collapses the issue and/or category to
//! a wildcard when the matching merge flag is set, so one seen-set covers every
//! scope combination.
//!
//! Callers check [`UniqueCollector::should_record`], accumulate, then call
//! [`UniqueCollector::mark_recorded`]. Authors always pass the check but must
//! still be marked so merged categories can suppress them elsewhere.

use std::collections::HashSet;

use tracing::trace;

use super::{Actor, EngagementCategory, UniquenessScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum IssueKey {
    Issue(u64),
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CategoryKey {
    Category(EngagementCategory),
    Any,
}

type SeenKey = (IssueKey, CategoryKey, Actor);

/// Stateful deduplication engine for one aggregation run.
#[derive(Debug)]
pub struct UniqueCollector {
    scope: UniquenessScope,
    seen: HashSet<SeenKey>,
}

impl UniqueCollector {
    /// Creates a collector with an empty seen-set.
    #[must_use]
    pub fn new(scope: UniquenessScope) -> Self {
        Self {
            scope,
            seen: HashSet::new(),
        }
    }

    /// Whether `actor` is on the ignore list.
    #[must_use]
    pub fn is_ignored(&self, actor: &str) -> bool {
        self.scope.ignored_actors.contains(actor)
    }

    /// Whether any uniqueness scope is in effect.
    ///
    /// With neither merge flag set, repeated engagement is recorded every time
    /// it occurs; only the ignore list filters.
    #[must_use]
    pub fn is_filtering(&self) -> bool {
        self.scope.merge_categories || self.scope.merge_issues
    }

    /// Returns whether this occurrence should be recorded.
    ///
    /// The per-category key is consulted only when a merge flag is set; with
    /// neither set, every non-ignored occurrence passes.
    #[must_use]
    pub fn should_record(&self, issue: u64, category: EngagementCategory, actor: &str) -> bool {
        if self.is_ignored(actor) {
            trace!(actor, "Skipping ignored actor");
            return false;
        }
        if category == EngagementCategory::Author || !self.is_filtering() {
            return true;
        }
        let unique = !self.seen.contains(&self.key(issue, category, actor));
        if !unique {
            trace!(issue, %category, actor, "Suppressing duplicate engagement");
        }
        unique
    }

    /// Inserts the occurrence into the seen-set.
    pub fn mark_recorded(&mut self, issue: u64, category: EngagementCategory, actor: &str) {
        let key = self.key(issue, category, actor);
        self.seen.insert(key);
    }

    fn key(&self, issue: u64, category: EngagementCategory, actor: &str) -> SeenKey {
        let issue = if self.scope.merge_issues {
            IssueKey::Any
        } else {
            IssueKey::Issue(issue)
        };
        let category = if self.scope.merge_categories {
            CategoryKey::Any
        } else {
            CategoryKey::Category(category)
        };
        (issue, category, actor.to_string())
    }
}
