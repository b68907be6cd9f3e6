// SPDX-License-Identifier: Apache-2.0

//! Engagement report rendering.
//!
//! Markdown is meant to be pasted into a GitHub comment: one section per user
//! or per issue under a single heading. Text is the same structure styled for
//! a terminal, with titles truncated to fit.

use std::io::{self, Write};

use console::style;
use discover_core::{
    ByIssue, ByUser, EngagementCategory, EngagementReport, EngagementView, IssueRef, Reaction,
    RepoRef,
};

use super::Renderable;
use crate::cli::OutputContext;

const HEADING: &str = "List of interested users to update on progress";

/// Width used when stdout is not a terminal, e.g. when piped to a file.
const UNBOUNDED_WIDTH: usize = 10_000;

/// Per-issue heading of a category in the by-issue view.
fn category_heading(category: EngagementCategory) -> &'static str {
    match category {
        EngagementCategory::Author => "You are the author",
        EngagementCategory::Commenter => "You added a comment",
        EngagementCategory::ReactionGiver => "You added a reaction",
    }
}

/// `"title" ([#n](url))`
fn issue_link(repo: &RepoRef, issue: &IssueRef) -> String {
    format!(
        "{:?} ([#{}]({}))",
        issue.title,
        issue.number,
        repo.issue_url(issue.number)
    )
}

/// Markdown shortcode, or the raw token for kinds without one.
fn reaction_shortcode(reaction: &Reaction) -> &str {
    match reaction.shortcode() {
        "" => &reaction.content,
        code => code,
    }
}

/// Unicode emoji, or the raw token for kinds without one.
fn reaction_emoji(reaction: &Reaction) -> &str {
    match reaction.emoji() {
        "" => &reaction.content,
        emoji => emoji,
    }
}

/// Truncates `s` to `max` characters, marking the cut with `...`.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}

fn terminal_width(ctx: &OutputContext) -> usize {
    if ctx.is_tty {
        usize::from(console::Term::stdout().size().1)
    } else {
        UNBOUNDED_WIDTH
    }
}

fn markdown_by_user(w: &mut dyn Write, repo: &RepoRef, by_user: &ByUser) -> io::Result<()> {
    for (login, user) in &by_user.users {
        write!(w, "\n### User [{login}](https://github.com/{login})\n")?;

        if !user.authored.is_empty() {
            write!(w, "\n\n- created:\n\n")?;
            for issue in user.authored.values() {
                write!(w, "\n  - {}.\n", issue_link(repo, issue))?;
            }
        }
        if !user.commented.is_empty() {
            write!(w, "\n\n- commented on:\n\n")?;
            for tally in user.commented.values() {
                write!(
                    w,
                    "\n  - {} - {} time(s).\n",
                    issue_link(repo, &tally.issue),
                    tally.count
                )?;
            }
        }
        if !user.reacted.is_empty() {
            write!(w, "\n\n- reacted to:\n\n")?;
            for given in user.reacted.values() {
                write!(
                    w,
                    "\n  - {} - added {} reaction.\n",
                    issue_link(repo, &given.issue),
                    reaction_shortcode(&given.reaction)
                )?;
            }
        }
    }
    Ok(())
}

fn markdown_by_issue(w: &mut dyn Write, repo: &RepoRef, by_issue: &ByIssue) -> io::Result<()> {
    for engagement in &by_issue.issues {
        write!(w, "\n### Issue {}\n", issue_link(repo, &engagement.issue))?;
        for category in EngagementCategory::ALL {
            let actors = engagement.actors(category);
            if actors.is_empty() {
                continue;
            }
            write!(w, "\n\n- {}:\n\n", category_heading(category))?;
            for actor in actors {
                writeln!(w, "  - @{actor}")?;
            }
        }
    }
    Ok(())
}

fn text_issue_line(issue: &IssueRef, suffix: &str, width: usize, indent: usize) -> String {
    let number = format!("#{}", issue.number);
    let budget = width.saturating_sub(indent + number.len() + 1 + suffix.chars().count());
    format!(
        "{} {}{}",
        style(number).green(),
        truncate(&issue.title, budget.max(10)),
        suffix
    )
}

fn text_by_user(w: &mut dyn Write, by_user: &ByUser, width: usize) -> io::Result<()> {
    if by_user.users.is_empty() {
        writeln!(w, "{}", style("No engagement found.").yellow())?;
        return Ok(());
    }

    for (login, user) in &by_user.users {
        writeln!(
            w,
            "{}  {}",
            style(login).cyan().bold(),
            style(format!("https://github.com/{login}")).dim()
        )?;

        if !user.authored.is_empty() {
            writeln!(w, "  {}", style("created:").dim())?;
            for issue in user.authored.values() {
                writeln!(w, "    {}", text_issue_line(issue, "", width, 4))?;
            }
        }
        if !user.commented.is_empty() {
            writeln!(w, "  {}", style("commented on:").dim())?;
            for tally in user.commented.values() {
                let suffix = format!(" - {} time(s)", tally.count);
                writeln!(w, "    {}", text_issue_line(&tally.issue, &suffix, width, 4))?;
            }
        }
        if !user.reacted.is_empty() {
            writeln!(w, "  {}", style("reacted to:").dim())?;
            for given in user.reacted.values() {
                let suffix = format!(" {}", reaction_emoji(&given.reaction));
                writeln!(w, "    {}", text_issue_line(&given.issue, &suffix, width, 4))?;
            }
        }
        writeln!(w)?;
    }
    Ok(())
}

fn text_by_issue(
    w: &mut dyn Write,
    repo: &RepoRef,
    by_issue: &ByIssue,
    width: usize,
) -> io::Result<()> {
    for engagement in &by_issue.issues {
        let issue = &engagement.issue;
        writeln!(w, "{}", text_issue_line(issue, "", width, 0))?;
        writeln!(w, "  {}", style(repo.issue_url(issue.number)).dim())?;

        for category in EngagementCategory::ALL {
            let actors = engagement.actors(category);
            if actors.is_empty() {
                continue;
            }
            let mentions: Vec<String> = actors.iter().map(|a| format!("@{a}")).collect();
            writeln!(
                w,
                "  {} {}",
                style(format!("{}:", category_heading(category))).dim(),
                style(mentions.join(", ")).cyan()
            )?;
        }
        writeln!(w)?;
    }
    Ok(())
}

impl Renderable for EngagementReport {
    fn render_text(&self, w: &mut dyn Write, ctx: &OutputContext) -> io::Result<()> {
        let width = terminal_width(ctx);

        writeln!(w)?;
        writeln!(w, "{}", style(HEADING).bold())?;
        writeln!(w)?;

        match &self.view {
            EngagementView::Users(by_user) => {
                text_by_user(w, by_user, width)?;
                if ctx.verbose {
                    writeln!(
                        w,
                        "{}",
                        style(format!(
                            "{} user(s) engaged in {}",
                            by_user.users.len(),
                            self.repository
                        ))
                        .dim()
                    )?;
                }
            }
            EngagementView::Issues(by_issue) => {
                text_by_issue(w, &self.repository, by_issue, width)?;
                if ctx.verbose {
                    writeln!(
                        w,
                        "{}",
                        style(format!(
                            "{} issue(s) in {}",
                            by_issue.issues.len(),
                            self.repository
                        ))
                        .dim()
                    )?;
                }
            }
        }
        Ok(())
    }

    fn render_markdown(&self, w: &mut dyn Write, _ctx: &OutputContext) -> io::Result<()> {
        write!(w, "\n## {HEADING}\n")?;
        match &self.view {
            EngagementView::Users(by_user) => markdown_by_user(w, &self.repository, by_user)?,
            EngagementView::Issues(by_issue) => markdown_by_issue(w, &self.repository, by_issue)?,
        }
        writeln!(w)
    }
}
