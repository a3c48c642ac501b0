// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "memo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Operator tool for the memo approval service")]
pub struct Cli {
    /// Config file shared with memod (defaults to $MEMOD_CONFIG or the state directory)
    #[arg(long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default config (if missing) and create the database
    Init,

    /// List the groups known to the configured directory
    Groups {
        #[arg(long = "output", short = 'o', value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Show a memo and its approval hierarchy
    Show {
        /// Memo ID
        memo_id: i64,

        #[arg(long = "output", short = 'o', value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// List approvals that are actionable right now for the given groups
    Pending {
        /// Group to act as (repeatable)
        #[arg(long = "group", short = 'g')]
        groups: Vec<String>,

        /// Resolve groups for this e-mail through the configured directory
        #[arg(long, value_name = "email")]
        user: Option<String>,

        #[arg(long = "output", short = 'o', value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Inspect and retry decline notifications
    Outbox {
        #[command(subcommand)]
        command: OutboxCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum OutboxCommand {
    /// List outbox rows, oldest first
    List {
        /// Only rows with this delivery status (pending, sent, failed)
        #[arg(long)]
        status: Option<String>,

        /// Maximum number of rows
        #[arg(long, short = 'n')]
        limit: Option<usize>,

        #[arg(long = "output", short = 'o', value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Attempt delivery of failed notifications once more
    Retry {
        /// Maximum number of rows to retry
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
