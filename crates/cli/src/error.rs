// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors from `memo` commands.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Core(#[from] memo_core::Error),

    #[error("{0}")]
    Config(#[from] memod::ConfigError),

    #[error("cannot write config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("no groups given\n  hint: pass --group <name> or --user <email>")]
    NoGroups,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for `memo` commands.
pub type Result<T> = std::result::Result<T, Error>;
