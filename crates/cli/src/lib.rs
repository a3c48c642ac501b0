// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! memo_cli - Operator commands for the memo approval service.
//!
//! The `memo` binary reads the same configuration file as `memod` to find
//! the database, document store, group directory and notifier. It never
//! approves or declines; those actions belong to the HTTP service.
//!
//! # Commands
//!
//! - `init` writes a starter config and creates the database
//! - `groups` lists the directory's groups in priority order
//! - `show` prints a memo and its approval hierarchy
//! - `pending` lists approvals actionable for a set of groups
//! - `outbox list` / `outbox retry` inspect and redeliver decline notifications

mod cli;
mod commands;
mod display;
pub mod error;

pub use cli::{Cli, Command, OutboxCommand, OutputFormat};
pub use error::{Error, Result};

use memod::Config;

/// Install a stderr subscriber when `RUST_LOG` is set; stay silent otherwise.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    if let Ok(filter) = EnvFilter::try_from_env(memod::env::names::RUST_LOG) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Execute a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    let load = || Config::load_or_default(config_path);
    match cli.command {
        Command::Init => commands::init::run(config_path),
        Command::Groups { output } => commands::groups::run(&load()?, output),
        Command::Show { memo_id, output } => commands::show::run(&load()?, memo_id, output),
        Command::Pending {
            groups,
            user,
            output,
        } => commands::pending::run(&load()?, groups, user, output),
        Command::Outbox { command } => match command {
            OutboxCommand::List {
                status,
                limit,
                output,
            } => commands::outbox::list(&load()?, status.as_deref(), limit, output),
            OutboxCommand::Retry { limit } => commands::outbox::retry(&load()?, limit),
        },
    }
}
