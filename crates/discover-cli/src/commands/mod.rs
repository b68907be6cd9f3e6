// SPDX-License-Identifier: Apache-2.0

//! Command handlers for the discover CLI.

pub mod completion;
pub mod engagement;

use std::time::Duration;

use anyhow::Result;
use discover_core::AppConfig;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::{Commands, CompletionCommand, OutputContext};
use crate::output;

/// Creates a styled spinner (only if interactive).
fn maybe_spinner(ctx: &OutputContext, message: &str) -> Option<ProgressBar> {
    if ctx.is_interactive() {
        let s = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            s.set_style(style);
        }
        s.set_message(message.to_string());
        s.enable_steady_tick(Duration::from_millis(100));
        Some(s)
    } else {
        None
    }
}

/// Dispatch to the appropriate command handler.
pub async fn run(command: Commands, ctx: OutputContext, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Engagement(args) => {
            let spinner = maybe_spinner(&ctx, "Fetching engagement...");
            let result = engagement::run(args, config).await;
            if let Some(s) = spinner {
                s.finish_and_clear();
            }
            output::render(&result?, &ctx)
        }

        Commands::Completion(CompletionCommand::Generate { shell }) => {
            completion::run_generate(shell)
        }
    }
}
