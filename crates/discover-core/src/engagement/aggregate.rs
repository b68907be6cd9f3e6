// SPDX-License-Identifier: Apache-2.0

//! Engagement aggregation.
//!
//! [`collect`] fetches each requested issue in order, runs its events through
//! the reaction classifier and a fresh [`UniqueCollector`], and hands the
//! accepted events to an [`EngagementSink`]. [`ByUser`] and [`ByIssue`] are the
//! two sinks, one per report orientation.
//!
//! Per issue the author is recorded first, then reactions, then comments.
//! A fetch error or a shutdown request aborts the whole run; no partial
//! result is returned.

use std::collections::BTreeMap;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, instrument};

use super::collector::UniqueCollector;
use super::reaction::{Reaction, classify};
use super::source::IssueSource;
use super::{Actor, EngagementCategory, EngagementOptions, IssueRef, RawIssue};
use crate::error::DiscoverError;
use crate::github::RepoRef;

/// Receives the engagement events accepted by the collector.
pub trait EngagementSink {
    /// Called once per processed issue, before any of its events.
    fn begin_issue(&mut self, _issue: &IssueRef) {}

    /// The issue was opened by `actor`.
    fn record_author(&mut self, issue: &IssueRef, actor: &str);

    /// `actor` commented on the issue.
    fn record_comment(&mut self, issue: &IssueRef, actor: &str);

    /// `actor` reacted to the issue.
    fn record_reaction(&mut self, issue: &IssueRef, actor: &str, reaction: &Reaction);
}

/// Number of accepted comments by one user on one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentTally {
    /// The issue.
    pub issue: IssueRef,
    /// Accepted comments.
    pub count: u32,
}

/// The reaction one user left on one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReactionGiven {
    /// The issue.
    pub issue: IssueRef,
    /// Last accepted reaction.
    pub reaction: Reaction,
}

/// Everything one user did across the requested issues, keyed by issue number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserEngagement {
    /// Issues the user opened.
    pub authored: BTreeMap<u64, IssueRef>,
    /// Issues the user commented on.
    pub commented: BTreeMap<u64, CommentTally>,
    /// Issues the user reacted to.
    pub reacted: BTreeMap<u64, ReactionGiven>,
}

impl UserEngagement {
    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.authored.is_empty() && self.commented.is_empty() && self.reacted.is_empty()
    }
}

/// Engagement grouped by user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ByUser {
    /// Users in login order.
    pub users: BTreeMap<Actor, UserEngagement>,
}

impl ByUser {
    fn user(&mut self, actor: &str) -> &mut UserEngagement {
        self.users.entry(actor.to_string()).or_default()
    }
}

impl EngagementSink for ByUser {
    fn record_author(&mut self, issue: &IssueRef, actor: &str) {
        self.user(actor)
            .authored
            .insert(issue.number, issue.clone());
    }

    fn record_comment(&mut self, issue: &IssueRef, actor: &str) {
        self.user(actor)
            .commented
            .entry(issue.number)
            .or_insert_with(|| CommentTally {
                issue: issue.clone(),
                count: 0,
            })
            .count += 1;
    }

    fn record_reaction(&mut self, issue: &IssueRef, actor: &str, reaction: &Reaction) {
        self.user(actor).reacted.insert(
            issue.number,
            ReactionGiven {
                issue: issue.clone(),
                reaction: reaction.clone(),
            },
        );
    }
}

/// The engaged actors of one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueEngagement {
    /// The issue.
    pub issue: IssueRef,
    /// Actors per category, in the order they were accepted.
    pub actors: BTreeMap<EngagementCategory, Vec<Actor>>,
}

impl IssueEngagement {
    /// Actors recorded in `category`.
    #[must_use]
    pub fn actors(&self, category: EngagementCategory) -> &[Actor] {
        self.actors.get(&category).map_or(&[], Vec::as_slice)
    }

    fn push(&mut self, category: EngagementCategory, actor: &str) {
        self.actors
            .entry(category)
            .or_default()
            .push(actor.to_string());
    }
}

/// Engagement grouped by issue, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ByIssue {
    /// One record per requested issue.
    pub issues: Vec<IssueEngagement>,
}

impl ByIssue {
    fn current(&mut self, issue: &IssueRef) -> &mut IssueEngagement {
        let fresh = self
            .issues
            .last()
            .is_none_or(|last| last.issue.number != issue.number);
        if fresh {
            self.begin_issue(issue);
        }
        let last = self.issues.len() - 1;
        &mut self.issues[last]
    }
}

impl EngagementSink for ByIssue {
    fn begin_issue(&mut self, issue: &IssueRef) {
        self.issues.push(IssueEngagement {
            issue: issue.clone(),
            actors: BTreeMap::new(),
        });
    }

    fn record_author(&mut self, issue: &IssueRef, actor: &str) {
        self.current(issue).push(EngagementCategory::Author, actor);
    }

    fn record_comment(&mut self, issue: &IssueRef, actor: &str) {
        self.current(issue).push(EngagementCategory::Commenter, actor);
    }

    fn record_reaction(&mut self, issue: &IssueRef, actor: &str, _reaction: &Reaction) {
        let current = self.current(issue);
        // One reaction per actor and issue, even when nothing is deduplicated.
        if current
            .actors(EngagementCategory::ReactionGiver)
            .iter()
            .any(|seen| seen == actor)
        {
            return;
        }
        current.push(EngagementCategory::ReactionGiver, actor);
    }
}

/// Feeds one issue's events through the collector into `sink`.
pub fn apply_issue<K: EngagementSink + ?Sized>(
    raw: &RawIssue,
    collector: &mut UniqueCollector,
    sink: &mut K,
    only_positive_reaction: bool,
) {
    let issue = IssueRef {
        number: raw.number,
        title: raw.title.trim().to_string(),
    };
    let number = issue.number;
    sink.begin_issue(&issue);

    if collector.should_record(number, EngagementCategory::Author, &raw.author) {
        sink.record_author(&issue, &raw.author);
        collector.mark_recorded(number, EngagementCategory::Author, &raw.author);
    }

    for event in &raw.reactions {
        let reaction = classify(&event.content);
        // Filtered reactions never reach the collector, so they cannot
        // block a later positive reaction from the same actor.
        if only_positive_reaction && !reaction.is_positive() {
            continue;
        }
        if collector.should_record(number, EngagementCategory::ReactionGiver, &event.actor) {
            sink.record_reaction(&issue, &event.actor, &reaction);
            collector.mark_recorded(number, EngagementCategory::ReactionGiver, &event.actor);
        }
    }

    for actor in &raw.comment_authors {
        if collector.should_record(number, EngagementCategory::Commenter, actor) {
            sink.record_comment(&issue, actor);
            collector.mark_recorded(number, EngagementCategory::Commenter, actor);
        }
    }
}

/// Resolves once the shutdown flag is raised. Never resolves if the sender is gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Aggregates engagement for `numbers` in `repo` into a fresh sink.
///
/// Issues are fetched one at a time in the given order. The first fetch error
/// is returned unchanged; raising `shutdown` returns
/// [`DiscoverError::Cancelled`].
///
/// # Errors
///
/// Returns the data source's error, or `Cancelled`.
#[instrument(skip_all, fields(repo = %repo, issues = numbers.len()))]
pub async fn collect<K>(
    source: &(impl IssueSource + ?Sized),
    repo: &RepoRef,
    numbers: &[u64],
    options: &EngagementOptions,
    mut shutdown: watch::Receiver<bool>,
) -> crate::Result<K>
where
    K: EngagementSink + Default,
{
    let mut collector = UniqueCollector::new(options.scope.clone());
    let mut sink = K::default();

    for &number in numbers {
        if *shutdown.borrow() {
            info!(number, "Shutdown requested, abandoning run");
            return Err(DiscoverError::Cancelled);
        }

        debug!(number, "Fetching issue");
        let raw = tokio::select! {
            biased;
            () = shutdown_requested(&mut shutdown) => {
                info!(number, "Shutdown requested during fetch");
                return Err(DiscoverError::Cancelled);
            }
            fetched = source.fetch_issue(repo, number) => fetched?,
        };

        apply_issue(&raw, &mut collector, &mut sink, options.only_positive_reaction);
        debug!(
            number,
            comments = raw.comment_authors.len(),
            reactions = raw.reactions.len(),
            "Processed issue"
        );
    }

    Ok(sink)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::engagement::{RawReaction, ReactionKind, UniquenessScope};

    #[derive(Default)]
    struct StaticSource {
        issues: HashMap<u64, RawIssue>,
        calls: AtomicUsize,
    }

    impl StaticSource {
        fn with(mut self, issue: RawIssue) -> Self {
            self.issues.insert(issue.number, issue);
            self
        }
    }

    #[async_trait]
    impl IssueSource for StaticSource {
        async fn fetch_issue(&self, _repo: &RepoRef, number: u64) -> crate::Result<RawIssue> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.issues
                .get(&number)
                .cloned()
                .ok_or_else(|| DiscoverError::GraphQl {
                    message: format!("Could not resolve to an Issue with the number of {number}."),
                })
        }
    }

    struct PendingSource;

    #[async_trait]
    impl IssueSource for PendingSource {
        async fn fetch_issue(&self, _repo: &RepoRef, _number: u64) -> crate::Result<RawIssue> {
            std::future::pending().await
        }
    }

    fn raw(
        number: u64,
        author: &str,
        comments: &[&str],
        reactions: &[(&str, &str)],
    ) -> RawIssue {
        RawIssue {
            number,
            title: format!("  Issue {number}\n"),
            author: author.to_string(),
            comment_authors: comments.iter().map(ToString::to_string).collect(),
            reactions: reactions
                .iter()
                .map(|(actor, content)| RawReaction {
                    actor: (*actor).to_string(),
                    content: (*content).to_string(),
                })
                .collect(),
        }
    }

    fn options(
        unique_in_issue: bool,
        unique_across_issues: bool,
        only_positive_reaction: bool,
        ignored: &[&str],
    ) -> EngagementOptions {
        EngagementOptions {
            scope: UniquenessScope::new(
                unique_in_issue,
                unique_across_issues,
                ignored.iter().copied(),
            ),
            only_positive_reaction,
        }
    }

    fn repo() -> RepoRef {
        RepoRef::new("octocat", "Hello-World")
    }

    /// A shutdown flag that is never raised.
    fn idle() -> watch::Receiver<bool> {
        watch::channel(false).1
    }

    fn issue_42() -> RawIssue {
        raw(
            42,
            "alice",
            &["bob", "bob", "alice"],
            &[("carol", "THUMBS_UP"), ("bob", "CONFUSED")],
        )
    }

    #[tokio::test]
    async fn test_unique_in_issue_by_user() {
        let source = StaticSource::default().with(issue_42());
        let result: ByUser =
            collect(&source, &repo(), &[42], &options(true, false, true, &[]), idle())
                .await
                .unwrap();

        assert_eq!(result.users.len(), 3);

        let alice = &result.users["alice"];
        assert_eq!(alice.authored.keys().copied().collect::<Vec<_>>(), vec![42]);
        assert!(alice.commented.is_empty());
        assert!(alice.reacted.is_empty());

        let bob = &result.users["bob"];
        assert!(bob.authored.is_empty());
        assert_eq!(bob.commented[&42].count, 1);
        assert!(bob.reacted.is_empty());

        let carol = &result.users["carol"];
        assert_eq!(
            carol.reacted[&42].reaction.kind,
            Some(ReactionKind::ThumbsUp)
        );
        assert!(carol.commented.is_empty());
    }

    #[tokio::test]
    async fn test_without_uniqueness_every_comment_counts() {
        let source = StaticSource::default().with(issue_42());
        let result: ByUser =
            collect(&source, &repo(), &[42], &options(false, false, true, &[]), idle())
                .await
                .unwrap();

        let bob = &result.users["bob"];
        assert_eq!(bob.commented[&42].count, 2);
        assert!(bob.reacted.is_empty());

        let alice = &result.users["alice"];
        assert!(alice.authored.contains_key(&42));
        assert_eq!(alice.commented[&42].count, 1);
    }

    #[tokio::test]
    async fn test_unique_across_issues_suppresses_second_comment() {
        let source = StaticSource::default()
            .with(raw(1, "alice", &["dan"], &[]))
            .with(raw(2, "alice", &["dan"], &[]));
        let result: ByUser =
            collect(&source, &repo(), &[1, 2], &options(true, true, false, &[]), idle())
                .await
                .unwrap();

        let dan = &result.users["dan"];
        assert_eq!(dan.commented.keys().copied().collect::<Vec<_>>(), vec![1]);
        // authorship is never suppressed
        let alice = &result.users["alice"];
        assert_eq!(alice.authored.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_ignored_actor_never_appears() {
        let source = StaticSource::default()
            .with(raw(1, "bot", &["bot", "bob"], &[("bot", "HEART")]))
            .with(raw(2, "alice", &["bot"], &[("bot", "ROCKET")]));
        let opts = options(false, false, false, &["bot"]);

        let by_user: ByUser = collect(&source, &repo(), &[1, 2], &opts, idle())
            .await
            .unwrap();
        assert!(!by_user.users.contains_key("bot"));

        let by_issue: ByIssue = collect(&source, &repo(), &[1, 2], &opts, idle())
            .await
            .unwrap();
        for issue in &by_issue.issues {
            for actors in issue.actors.values() {
                assert!(!actors.iter().any(|a| a == "bot"));
            }
        }
        // the issue record still exists even though its author was ignored
        assert_eq!(by_issue.issues[0].issue.number, 1);
        assert!(by_issue.issues[0].actors(EngagementCategory::Author).is_empty());
    }

    #[tokio::test]
    async fn test_merged_categories_allow_one_role_per_issue() {
        let source = StaticSource::default().with(raw(
            5,
            "alice",
            &["erin", "frank"],
            &[("erin", "HEART"), ("alice", "ROCKET")],
        ));
        let result: ByIssue =
            collect(&source, &repo(), &[5], &options(true, false, false, &[]), idle())
                .await
                .unwrap();

        let issue = &result.issues[0];
        assert_eq!(issue.actors(EngagementCategory::Author), ["alice"]);
        assert_eq!(issue.actors(EngagementCategory::ReactionGiver), ["erin"]);
        assert_eq!(issue.actors(EngagementCategory::Commenter), ["frank"]);
    }

    #[tokio::test]
    async fn test_filtered_negative_reaction_does_not_block_positive_one() {
        let source = StaticSource::default().with(raw(
            9,
            "alice",
            &[],
            &[("gus", "THUMBS_DOWN"), ("gus", "HEART")],
        ));
        let result: ByUser =
            collect(&source, &repo(), &[9], &options(true, false, true, &[]), idle())
                .await
                .unwrap();

        assert_eq!(
            result.users["gus"].reacted[&9].reaction.kind,
            Some(ReactionKind::Heart)
        );
    }

    #[tokio::test]
    async fn test_positive_filter_drops_all_negative_kinds() {
        let source = StaticSource::default().with(raw(
            3,
            "alice",
            &[],
            &[("a", "CONFUSED"), ("b", "THUMBS_DOWN"), ("c", "LAUGH"), ("d", "EYES")],
        ));
        let result: ByUser =
            collect(&source, &repo(), &[3], &options(false, false, true, &[]), idle())
                .await
                .unwrap();

        for user in result.users.values() {
            for given in user.reacted.values() {
                assert!(given.reaction.is_positive());
            }
        }
        assert!(result.users.contains_key("d"));
        assert!(!result.users.contains_key("a"));
    }

    #[tokio::test]
    async fn test_last_reaction_wins_without_uniqueness() {
        let source = StaticSource::default().with(raw(
            4,
            "alice",
            &[],
            &[("hal", "EYES"), ("hal", "ROCKET")],
        ));
        let result: ByUser =
            collect(&source, &repo(), &[4], &options(false, false, false, &[]), idle())
                .await
                .unwrap();

        assert_eq!(
            result.users["hal"].reacted[&4].reaction.kind,
            Some(ReactionKind::Rocket)
        );
    }

    #[tokio::test]
    async fn test_by_issue_lists_reactor_once_without_uniqueness() {
        let source = StaticSource::default().with(raw(
            4,
            "alice",
            &["bob", "bob"],
            &[("hal", "EYES"), ("hal", "ROCKET")],
        ));
        let result: ByIssue =
            collect(&source, &repo(), &[4], &options(false, false, false, &[]), idle())
                .await
                .unwrap();

        let issue = &result.issues[0];
        assert_eq!(issue.actors(EngagementCategory::ReactionGiver), ["hal"]);
        assert_eq!(issue.actors(EngagementCategory::Commenter), ["bob", "bob"]);
    }

    #[tokio::test]
    async fn test_by_issue_follows_input_order_and_trims_titles() {
        let source = StaticSource::default()
            .with(raw(10, "alice", &[], &[]))
            .with(raw(2, "bob", &[], &[]));
        let result: ByIssue =
            collect(&source, &repo(), &[10, 2], &options(true, false, false, &[]), idle())
                .await
                .unwrap();

        let numbers: Vec<_> = result.issues.iter().map(|i| i.issue.number).collect();
        assert_eq!(numbers, vec![10, 2]);
        assert_eq!(result.issues[0].issue.title, "Issue 10");
    }

    #[tokio::test]
    async fn test_fetch_error_aborts_run() {
        let source = StaticSource::default().with(raw(1, "alice", &[], &[]));
        let opts = options(true, false, false, &[]);
        let err = collect::<ByUser>(&source, &repo(), &[1, 404, 1], &opts, idle())
            .await
            .unwrap_err();

        assert!(matches!(err, DiscoverError::GraphQl { .. }));
        // fail fast: nothing after the failing issue is fetched
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let source = StaticSource::default()
            .with(issue_42())
            .with(raw(43, "bob", &["alice", "carol"], &[("bob", "HOORAY")]));
        let opts = options(true, true, false, &[]);

        let first: ByUser = collect(&source, &repo(), &[42, 43], &opts, idle())
            .await
            .unwrap();
        let second: ByUser = collect(&source, &repo(), &[42, 43], &opts, idle())
            .await
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_shutdown_before_fetch_returns_cancelled() {
        let source = StaticSource::default().with(raw(1, "alice", &[], &[]));
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let opts = options(true, false, false, &[]);
        let err = collect::<ByIssue>(&source, &repo(), &[1], &opts, rx)
            .await
            .unwrap_err();

        assert!(matches!(err, DiscoverError::Cancelled));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_pending_fetch() {
        let (tx, rx) = watch::channel(false);
        let opts = options(true, false, false, &[]);
        let repo = repo();
        let run = collect::<ByUser>(&PendingSource, &repo, &[1], &opts, rx);

        let trigger = async {
            tokio::task::yield_now().await;
            tx.send(true).unwrap();
        };
        let (result, ()) = tokio::join!(run, trigger);

        assert!(matches!(result, Err(DiscoverError::Cancelled)));
    }

    #[test]
    fn test_apply_issue_records_author_before_comments() {
        let scope = UniquenessScope::new(true, false, Vec::<String>::new());
        let mut collector = UniqueCollector::new(scope);
        let mut sink = ByIssue::default();

        apply_issue(&raw(1, "alice", &["alice"], &[]), &mut collector, &mut sink, false);

        assert_eq!(sink.issues[0].actors(EngagementCategory::Author), ["alice"]);
        assert!(sink.issues[0].actors(EngagementCategory::Commenter).is_empty());
    }
}
