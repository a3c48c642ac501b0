// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod groups;
pub mod init;
pub mod outbox;
pub mod pending;
pub mod show;

use serde::Serialize;
use std::io::Write;

use memo_core::Database;
use memod::Config;

use crate::cli::OutputFormat;
use crate::error::Result;

/// Open the database the configured service uses.
pub fn open_db(config: &Config) -> Result<Database> {
    Ok(Database::open(&config.database)?)
}

/// Print `items` as a JSON array or one formatted line per item.
pub(crate) fn write_items<T: Serialize>(
    out: &mut impl Write,
    items: &[T],
    output: OutputFormat,
    format: impl Fn(&T) -> String,
    empty: &str,
) -> Result<()> {
    match output {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(items)?)?,
        OutputFormat::Text if items.is_empty() => writeln!(out, "{empty}")?,
        OutputFormat::Text => {
            for item in items {
                writeln!(out, "{}", format(item))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
