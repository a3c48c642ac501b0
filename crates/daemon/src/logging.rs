// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs;
use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::env::names;

/// Filter from `RUST_LOG`, defaulting to `info` when unset or unparsable.
pub(crate) fn log_filter() -> EnvFilter {
    EnvFilter::try_from_env(names::RUST_LOG).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// `RUST_LOG` selects the filter (default `info`). Output goes to `log_file`
/// when it can be opened for appending, else to stderr.
pub fn setup_logging(log_file: Option<&Path>) {
    let filter = log_filter();

    let file = log_file.and_then(|path| {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        fs::OpenOptions::new().create(true).append(true).open(path).ok()
    });

    if let Some(file) = file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
