// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use memo_core::document::FsDocumentStore;
use memo_core::notify::DeliveryStatus;
use memo_core::{Database, Workflow};
use memod::Config;

use crate::cli::OutputFormat;
use crate::display::format_notification;
use crate::error::Result;

use super::{open_db, write_items};

pub fn list(
    config: &Config,
    status: Option<&str>,
    limit: Option<usize>,
    output: OutputFormat,
) -> Result<()> {
    let db = open_db(config)?;
    list_impl(&db, status, limit, output, &mut std::io::stdout())
}

pub(crate) fn list_impl(
    db: &Database,
    status: Option<&str>,
    limit: Option<usize>,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let status = status.map(str::parse::<DeliveryStatus>).transpose()?;
    let rows = db.list_notifications(status, limit)?;
    write_items(out, &rows, output, format_notification, "Outbox is empty")
}

pub fn retry(config: &Config, limit: Option<usize>) -> Result<()> {
    let mut workflow = Workflow::new(
        open_db(config)?,
        Box::new(FsDocumentStore::open(&config.documents_dir)?),
        config.notification_sink()?,
        config.workflow_config(),
    );
    retry_impl(&mut workflow, limit, &mut std::io::stdout())
}

pub(crate) fn retry_impl(
    workflow: &mut Workflow,
    limit: Option<usize>,
    out: &mut impl Write,
) -> Result<()> {
    let results = workflow.redeliver_failed(limit)?;
    for n in &results {
        writeln!(out, "{}", format_notification(n))?;
    }
    let sent = results
        .iter()
        .filter(|n| n.status == DeliveryStatus::Sent)
        .count();
    writeln!(
        out,
        "Retried {} notification(s): {} sent, {} failed",
        results.len(),
        sent,
        results.len() - sent
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "outbox_tests.rs"]
mod tests;
