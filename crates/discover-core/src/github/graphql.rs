// SPDX-License-Identifier: Apache-2.0

//! GraphQL issue data source.
//!
//! Fetches one issue (or pull request) per query: title, author, comment
//! authors and reactions. Comments and reactions are paginated independently;
//! follow-up queries only include the connections that still have pages left.

use async_trait::async_trait;
use backon::Retryable;
use octocrab::Octocrab;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use crate::config::MAX_PAGE_SIZE;
use crate::engagement::{IssueSource, RawIssue, RawReaction};
use crate::error::DiscoverError;
use crate::github::RepoRef;
use crate::retry::{is_retryable_octocrab, retry_backoff};

/// Login reported for deleted accounts.
pub const GHOST_LOGIN: &str = "ghost";

const ENGAGEMENT_FIELDS: &str = r"
    title
    author {
        login
    }
    comments(first: $first, after: $commentsAfter) @include(if: $withComments) {
        nodes {
            author {
                login
            }
        }
        pageInfo {
            hasNextPage
            endCursor
        }
    }
    reactions(first: $first, after: $reactionsAfter) @include(if: $withReactions) {
        nodes {
            content
            user {
                login
            }
        }
        pageInfo {
            hasNextPage
            endCursor
        }
    }";

/// Builds the engagement query text.
///
/// Issues and pull requests share one number space, so the query goes through
/// `issueOrPullRequest` with the same selection on both types.
fn build_engagement_query() -> String {
    format!(
        r"query FetchIssueEngagement(
            $owner: String!,
            $name: String!,
            $number: Int!,
            $first: Int!,
            $withComments: Boolean!,
            $commentsAfter: String,
            $withReactions: Boolean!,
            $reactionsAfter: String
        ) {{
            repository(owner: $owner, name: $name) {{
                issueOrPullRequest(number: $number) {{
                    ... on Issue {{ {ENGAGEMENT_FIELDS} }}
                    ... on PullRequest {{ {ENGAGEMENT_FIELDS} }}
                }}
            }}
        }}"
    )
}

/// Cursor state of one paginated connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Cursor {
    done: bool,
    after: Option<String>,
}

impl Cursor {
    fn advance(&mut self, page_info: Option<&PageInfo>) {
        match page_info {
            Some(PageInfo {
                has_next_page: true,
                end_cursor: Some(end),
            }) => self.after = Some(end.clone()),
            _ => self.done = true,
        }
    }
}

/// Builds the request payload for one page.
fn build_request(
    repo: &RepoRef,
    number: u64,
    page_size: u32,
    comments: &Cursor,
    reactions: &Cursor,
) -> Value {
    json!({
        "query": build_engagement_query(),
        "variables": {
            "owner": repo.owner,
            "name": repo.name,
            "number": number,
            "first": page_size,
            "withComments": !comments.done,
            "commentsAfter": comments.after,
            "withReactions": !reactions.done,
            "reactionsAfter": reactions.after,
        }
    })
}

/// Actor reference; `null` for deleted accounts.
#[derive(Debug, Clone, Deserialize)]
struct Login {
    login: String,
}

fn login_or_ghost(login: Option<Login>) -> String {
    login.map_or_else(|| GHOST_LOGIN.to_string(), |l| l.login)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Connection<T> {
    #[serde(default = "Vec::new")]
    nodes: Vec<Option<T>>,
    page_info: Option<PageInfo>,
}

#[derive(Debug, Clone, Deserialize)]
struct CommentNode {
    author: Option<Login>,
}

#[derive(Debug, Clone, Deserialize)]
struct ReactionNode {
    content: String,
    user: Option<Login>,
}

/// One page of an issue's engagement data.
#[derive(Debug, Clone, Deserialize)]
struct IssuePage {
    title: String,
    author: Option<Login>,
    comments: Option<Connection<CommentNode>>,
    reactions: Option<Connection<ReactionNode>>,
}

/// Extracts the issue page from a GraphQL response.
fn parse_issue_page(response: &Value, repo: &RepoRef, number: u64) -> crate::Result<IssuePage> {
    if let Some(errors) = response.get("errors") {
        let message = serde_json::to_string_pretty(errors).unwrap_or_default();
        return Err(DiscoverError::GraphQl { message });
    }

    let data = response.get("data").ok_or_else(|| DiscoverError::GraphQl {
        message: "Missing 'data' field in GraphQL response".to_string(),
    })?;

    let repository = data
        .get("repository")
        .filter(|v| !v.is_null())
        .ok_or_else(|| DiscoverError::GraphQl {
            message: format!("Repository {repo} not found"),
        })?;

    let issue = repository
        .get("issueOrPullRequest")
        .filter(|v| !v.is_null())
        .ok_or_else(|| DiscoverError::GraphQl {
            message: format!("Issue #{number} not found in {repo}"),
        })?;

    serde_json::from_value(issue.clone()).map_err(|e| DiscoverError::GraphQl {
        message: format!("Failed to parse issue #{number}: {e}"),
    })
}

/// Accumulates pages into a [`RawIssue`].
#[derive(Debug)]
struct PageAccumulator {
    issue: Option<RawIssue>,
    comments: Cursor,
    reactions: Cursor,
}

impl PageAccumulator {
    fn new() -> Self {
        Self {
            issue: None,
            comments: Cursor::default(),
            reactions: Cursor::default(),
        }
    }

    fn is_complete(&self) -> bool {
        self.issue.is_some() && self.comments.done && self.reactions.done
    }

    fn push(&mut self, number: u64, page: IssuePage) {
        let issue = self.issue.get_or_insert_with(|| RawIssue {
            number,
            title: page.title.trim().to_string(),
            author: login_or_ghost(page.author),
            comment_authors: Vec::new(),
            reactions: Vec::new(),
        });

        if !self.comments.done {
            let page_info = page.comments.as_ref().and_then(|c| c.page_info.clone());
            if let Some(comments) = page.comments {
                issue.comment_authors.extend(
                    comments
                        .nodes
                        .into_iter()
                        .flatten()
                        .map(|node| login_or_ghost(node.author)),
                );
            }
            self.comments.advance(page_info.as_ref());
        }

        if !self.reactions.done {
            let page_info = page.reactions.as_ref().and_then(|r| r.page_info.clone());
            if let Some(reactions) = page.reactions {
                issue
                    .reactions
                    .extend(reactions.nodes.into_iter().flatten().map(|node| RawReaction {
                        actor: login_or_ghost(node.user),
                        content: node.content,
                    }));
            }
            self.reactions.advance(page_info.as_ref());
        }
    }
}

/// [`IssueSource`] backed by the GitHub GraphQL API.
pub struct GitHubIssueSource {
    client: Octocrab,
    page_size: u32,
}

impl GitHubIssueSource {
    /// Creates a source using `client`. `page_size` is clamped to `1..=100`.
    #[must_use]
    pub fn new(client: Octocrab, page_size: u32) -> Self {
        Self {
            client,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    async fn query(&self, request: &Value) -> crate::Result<Value> {
        let response: Value = (|| async { self.client.graphql::<Value>(request).await })
            .retry(retry_backoff())
            .when(is_retryable_octocrab)
            .notify(|err, dur| {
                warn!(
                    error = %err,
                    retry_after = ?dur,
                    "Retrying GraphQL engagement query"
                );
            })
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl IssueSource for GitHubIssueSource {
    #[instrument(skip(self), fields(repo = %repo, number = number))]
    async fn fetch_issue(&self, repo: &RepoRef, number: u64) -> crate::Result<RawIssue> {
        let mut acc = PageAccumulator::new();
        let mut pages = 0u32;

        while !acc.is_complete() {
            let request =
                build_request(repo, number, self.page_size, &acc.comments, &acc.reactions);
            let response = self.query(&request).await?;
            let page = parse_issue_page(&response, repo, number)?;
            acc.push(number, page);
            pages += 1;
        }

        let issue = acc.issue.ok_or_else(|| DiscoverError::GraphQl {
            message: format!("Issue #{number} returned no data"),
        })?;

        debug!(
            pages,
            comments = issue.comment_authors.len(),
            reactions = issue.reactions.len(),
            "Fetched issue engagement"
        );
        Ok(issue)
    }
}
