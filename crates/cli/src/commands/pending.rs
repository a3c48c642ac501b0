// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use memo_core::directory::GroupDirectory;
use memo_core::{Actor, Database};
use memod::Config;

use crate::cli::OutputFormat;
use crate::display::format_actionable;
use crate::error::{Error, Result};

use super::{open_db, write_items};

pub fn run(
    config: &Config,
    groups: Vec<String>,
    user: Option<String>,
    output: OutputFormat,
) -> Result<()> {
    let groups = match user {
        Some(email) => {
            let directory = config.group_directory()?;
            resolve_groups(directory.as_ref(), groups, &email)?
        }
        None => groups,
    };
    let db = open_db(config)?;
    run_impl(&db, &groups, output, &mut std::io::stdout())
}

/// Explicit groups plus the directory's groups for `email`, without repeats.
pub(crate) fn resolve_groups(
    directory: &dyn GroupDirectory,
    mut groups: Vec<String>,
    email: &str,
) -> Result<Vec<String>> {
    let actor = Actor::from_session(None, Some(email))?;
    for group in directory.groups_for(&actor)? {
        if !groups.contains(&group) {
            groups.push(group);
        }
    }
    Ok(groups)
}

pub(crate) fn run_impl(
    db: &Database,
    groups: &[String],
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    if groups.is_empty() {
        return Err(Error::NoGroups);
    }
    let items = db.list_actionable(groups)?;
    write_items(out, &items, output, format_actionable, "No actionable approvals")
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
