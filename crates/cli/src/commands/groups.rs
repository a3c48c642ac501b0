// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use memo_core::directory::GroupDirectory;
use memod::Config;

use crate::cli::OutputFormat;
use crate::display::format_group;
use crate::error::Result;

use super::write_items;

pub fn run(config: &Config, output: OutputFormat) -> Result<()> {
    let directory = config.group_directory()?;
    run_impl(directory.as_ref(), output, &mut std::io::stdout())
}

pub(crate) fn run_impl(
    directory: &dyn GroupDirectory,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let groups = directory.list_groups()?;
    write_items(out, &groups, output, format_group, "No groups configured")
}

#[cfg(test)]
#[path = "groups_tests.rs"]
mod tests;
