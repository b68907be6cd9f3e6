// SPDX-License-Identifier: Apache-2.0

//! Command-line interface definition for discover.
//!
//! Uses clap's derive API for declarative CLI parsing.

use std::io::IsTerminal;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Extended help text for the generate subcommand with shell-specific examples.
const COMPLETION_GENERATE_HELP: &str = r#"EXAMPLES

  bash
    Add to ~/.bashrc or ~/.bash_profile:
      eval "$(discover completion generate bash)"

  zsh
    Generate completion file:
      mkdir -p ~/.zsh/completions
      discover completion generate zsh > ~/.zsh/completions/_discover

    Add to ~/.zshrc (before compinit):
      fpath=(~/.zsh/completions $fpath)
      autoload -U compinit && compinit -i

  fish
    Generate completion file:
      discover completion generate fish > ~/.config/fish/completions/discover.fish
"#;

/// Extended help text for the engagement subcommand.
const ENGAGEMENT_HELP: &str = r"EXAMPLES

  Who should be pinged about progress on issues 12, 15 and 31?
    discover engagement --issues 12,15,31 --group-by users

  Paste-ready markdown, one section per issue, bots ignored:
    discover -o markdown engagement --issues 12,15 --group-by issues \
      --ignore-users dependabot,renovate

  Mention everybody only once across all issues:
    discover engagement --issues 12,15 --group-by users --unique-across-issues
";

/// Output format for CLI results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with colors (default)
    #[default]
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// YAML output for programmatic consumption
    Yaml,
    /// Raw markdown, ready to paste into a GitHub comment
    Markdown,
}

/// Global output configuration passed to commands.
#[derive(Clone)]
pub struct OutputContext {
    /// Output format (text, json, yaml, markdown)
    pub format: OutputFormat,
    /// Suppress non-essential output (spinners, progress)
    pub quiet: bool,
    /// Enable verbose output
    pub verbose: bool,
    /// Whether stdout is a terminal (TTY)
    pub is_tty: bool,
}

impl OutputContext {
    /// Creates an `OutputContext` from CLI arguments.
    pub fn from_cli(format: OutputFormat, quiet: bool, verbose: bool) -> Self {
        Self {
            format,
            quiet,
            verbose,
            is_tty: std::io::stdout().is_terminal(),
        }
    }

    /// Returns true if interactive elements (spinners, colors) should be shown.
    pub fn is_interactive(&self) -> bool {
        self.is_tty && !self.quiet && matches!(self.format, OutputFormat::Text)
    }
}

/// Parses a cache TTL such as `90s`, `15m`, `1h30m`, `500ms` or `0`.
///
/// A bare number is read as seconds.
///
/// # Errors
///
/// Returns an error for empty input, unknown units or numeric overflow.
pub fn parse_cache_ttl(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty duration".to_string());
    }
    if let Ok(secs) = input.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    let mut rest = input;
    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits == 0 {
            return Err(format!("invalid duration '{input}'"));
        }
        let value: u64 = rest[..digits]
            .parse()
            .map_err(|_| format!("invalid duration '{input}'"))?;
        rest = &rest[digits..];

        let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        let part = match &rest[..unit_len] {
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value.saturating_mul(60)),
            "h" => Duration::from_secs(value.saturating_mul(3600)),
            unit => {
                return Err(format!(
                    "unknown unit '{unit}' in duration '{input}', valid units are ms, s, m, h"
                ));
            }
        };
        rest = &rest[unit_len..];
        total = total
            .checked_add(part)
            .ok_or_else(|| format!("duration '{input}' is too large"))?;
    }
    Ok(total)
}

/// discover - insights about a GitHub repository.
///
/// Lists who engaged with a set of issues and pull requests, so the right
/// people can be updated on progress.
#[derive(Parser)]
#[command(name = "discover")]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Output format (text, json, yaml, markdown)
    #[arg(long, short = 'o', global = true, default_value = "text", value_enum)]
    pub output: OutputFormat,

    /// Suppress non-essential output (spinners, progress)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Check who engaged with issues and pull requests
    #[command(after_long_help = ENGAGEMENT_HELP)]
    Engagement(EngagementArgs),

    /// Generate shell completion scripts
    #[command(subcommand)]
    Completion(CompletionCommand),
}

/// Arguments of the engagement command.
#[derive(Args, Debug, Clone)]
pub struct EngagementArgs {
    /// Comma separated list of issue or pull request numbers
    #[arg(long, required = true, value_delimiter = ',', num_args = 1..)]
    pub issues: Vec<u64>,

    /// Group output by users or issues
    #[arg(long, value_name = "users|issues")]
    pub group_by: String,

    /// Repository in owner/name format (defaults to the origin remote, then config)
    #[arg(long, short = 'r')]
    pub repo: Option<String>,

    /// Mention a user only once per issue, e.g. not again as a commenter of their own issue
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub unique_in_issue: Option<bool>,

    /// Mention a user only once across all requested issues
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub unique_across_issues: Option<bool>,

    /// Count a user only for positive reactions
    #[arg(long)]
    pub positive_reaction: bool,

    /// Comma separated list of users whose engagement is ignored
    #[arg(long, value_delimiter = ',')]
    pub ignore_users: Vec<String>,

    /// Cache fetched issues, e.g. "3600s", "60m", "1h" (0 disables)
    #[arg(long, value_parser = parse_cache_ttl)]
    pub cache_ttl: Option<Duration>,
}

/// Completion subcommands
#[derive(Subcommand)]
pub enum CompletionCommand {
    /// Generate completion script for a shell (output to stdout)
    #[command(after_long_help = COMPLETION_GENERATE_HELP)]
    Generate {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
