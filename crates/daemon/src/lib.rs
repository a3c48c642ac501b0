// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! memod: HTTP service for the memo approval workflow.
//!
//! The binary wires [`config::Config`] into an [`state::AppState`] and serves
//! [`routes::build_router`]. The library half is shared with the `memo`
//! operator CLI, which reads the same configuration.

pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod routes;
pub mod session;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ConfigError};
pub use routes::build_router;
pub use state::AppState;
