// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use memo_core::Database;
use memod::Config;

use crate::cli::OutputFormat;
use crate::display::format_memo;
use crate::error::Result;

use super::open_db;

pub fn run(config: &Config, memo_id: i64, output: OutputFormat) -> Result<()> {
    let db = open_db(config)?;
    run_impl(&db, memo_id, output, &mut std::io::stdout())
}

pub(crate) fn run_impl(
    db: &Database,
    memo_id: i64,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let details = db.memo_with_approvals(memo_id)?;
    match output {
        OutputFormat::Text => writeln!(out, "{}", format_memo(&details))?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&details)?)?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "show_tests.rs"]
mod tests;
