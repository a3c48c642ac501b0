// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! memod - The memo approval service.
//!
//! Serves the submission and approval endpoints over HTTP, backed by a
//! SQLite database under `~/.local/state/memod/` by default.
//!
//! Usage:
//!   memod [--config <path>] [--listen <addr>]

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use memod::config::Config;
use memod::logging::setup_logging;
use memod::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "memod", version, about = "Memo approval HTTP service")]
struct Args {
    /// Config file (defaults to $MEMOD_CONFIG or the state directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured listen address
    #[arg(long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = match Config::load_or_default(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    if let Some(listen) = args.listen {
        config.listen = listen;
    }

    setup_logging(config.log_file.as_deref());
    tracing::info!(
        database = %config.database.display(),
        documents = %config.documents_dir.display(),
        "memod starting"
    );

    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("failed to initialise service: {}", e);
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(config.listen).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("failed to bind {}: {}", config.listen, e);
            std::process::exit(1);
        }
    };
    tracing::info!("listening on {}", config.listen);

    if let Err(e) = axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("server error: {}", e);
        std::process::exit(1);
    }
    tracing::info!("memod stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
