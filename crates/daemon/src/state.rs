// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared service state.
//!
//! The workflow is synchronous (SQLite, blocking HTTP to Graph), so every
//! call runs on the blocking pool while holding the workflow mutex. Mail
//! goes out through a separate handle to the sink, after the mutex is
//! released.

use std::sync::Arc;
use tokio::sync::Mutex;

use memo_core::directory::{GroupDirectory, GroupInfo};
use memo_core::document::FsDocumentStore;
use memo_core::identity::Actor;
use memo_core::notify::NotificationSink;
use memo_core::workflow::{CommittedDecline, DeclineOutcome};
use memo_core::{Database, Workflow};

use crate::config::{Config, IdentityConfig};
use crate::error::{ApiError, ConfigError};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// The workflow engine (one connection, serialized by the mutex).
    workflow: Mutex<Workflow>,
    sink: Arc<dyn NotificationSink>,
    directory: Arc<dyn GroupDirectory>,
    identity: IdentityConfig,
    max_document_bytes: usize,
}

impl AppState {
    pub fn new(
        workflow: Workflow,
        directory: Arc<dyn GroupDirectory>,
        identity: IdentityConfig,
    ) -> Self {
        let max_document_bytes = workflow.config().max_document_bytes;
        let sink = workflow.sink();
        AppState {
            inner: Arc::new(AppStateInner {
                workflow: Mutex::new(workflow),
                sink,
                directory,
                identity,
                max_document_bytes,
            }),
        }
    }

    /// Open the database and document store and build the configured
    /// directory and sink.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let db = Database::open(&config.database)?;
        let documents = FsDocumentStore::open(&config.documents_dir)?;
        let workflow = Workflow::new(
            db,
            Box::new(documents),
            config.notification_sink()?,
            config.workflow_config(),
        );
        Ok(Self::new(
            workflow,
            config.group_directory()?,
            config.identity.clone(),
        ))
    }

    pub fn identity(&self) -> &IdentityConfig {
        &self.inner.identity
    }

    pub fn max_document_bytes(&self) -> usize {
        self.inner.max_document_bytes
    }

    /// Run `f` against the workflow on the blocking pool.
    pub async fn with_workflow<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Workflow) -> memo_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let result = tokio::task::spawn_blocking(move || {
            let mut workflow = inner.workflow.blocking_lock();
            f(&mut workflow)
        })
        .await
        .map_err(|e| ApiError::internal(format!("workflow task failed: {e}")))?;
        Ok(result?)
    }

    /// Send the notification for a committed decline, then record the
    /// outcome. Only the recording step takes the workflow mutex.
    pub async fn deliver_decline(&self, committed: CommittedDecline) -> Result<DeclineOutcome, ApiError> {
        let sink = Arc::clone(&self.inner.sink);
        let (committed, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = sink.send(&committed.delivery.message);
            (committed, outcome)
        })
        .await
        .map_err(|e| ApiError::internal(format!("notification task failed: {e}")))?;
        self.with_workflow(move |wf| Ok(wf.finish_decline(committed, outcome)))
            .await
    }

    /// Groups the actor belongs to, per the directory.
    pub async fn groups_for(&self, actor: &Actor) -> Result<Vec<String>, ApiError> {
        let directory = Arc::clone(&self.inner.directory);
        let actor = actor.clone();
        let result = tokio::task::spawn_blocking(move || directory.groups_for(&actor))
            .await
            .map_err(|e| ApiError::internal(format!("directory task failed: {e}")))?;
        Ok(result?)
    }

    /// All known groups, for the submission form.
    pub async fn list_groups(&self) -> Result<Vec<GroupInfo>, ApiError> {
        let directory = Arc::clone(&self.inner.directory);
        let result = tokio::task::spawn_blocking(move || directory.list_groups())
            .await
            .map_err(|e| ApiError::internal(format!("directory task failed: {e}")))?;
        Ok(result?)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
