// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use memo_core::Database;
use memod::config::{default_config_path, DB_FILE_NAME, DOCUMENTS_DIR_NAME};
use memod::Config;

use crate::error::Result;

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);
    run_impl(&path, &mut std::io::stdout())
}

/// Config written by `memo init`; paths are relative to the config file.
fn starter_config() -> Config {
    Config {
        database: PathBuf::from(DB_FILE_NAME),
        documents_dir: PathBuf::from(DOCUMENTS_DIR_NAME),
        ..Config::default()
    }
}

pub(crate) fn run_impl(path: &Path, out: &mut impl Write) -> Result<()> {
    if path.exists() {
        writeln!(out, "Using existing config at {}", path.display())?;
    } else {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml::to_string_pretty(&starter_config())?)?;
        writeln!(out, "Wrote default config to {}", path.display())?;
    }

    let config = Config::load(path)?;
    Database::open(&config.database)?;
    fs::create_dir_all(&config.documents_dir)?;
    tracing::info!(database = %config.database.display(), "database initialized");

    writeln!(out, "Database: {}", config.database.display())?;
    writeln!(out, "Documents: {}", config.documents_dir.display())?;
    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
