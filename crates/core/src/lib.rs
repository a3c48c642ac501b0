// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! memo-core: Shared library for the memo approval service
//!
//! This crate provides the data model, database operations, approval
//! workflow and external capabilities (group directory, document store,
//! notification sink) used by both the `memod` service and the `memo` CLI.

pub mod approval;
pub mod db;
pub mod directory;
pub mod document;
pub mod error;
pub mod graph;
pub mod identity;
pub mod memo;
pub mod notify;
pub mod validate;
pub mod workflow;

pub use approval::{ActionableApproval, Approval, ApprovalStatus, Decision, GroupPriority};
pub use db::Database;
pub use directory::{GraphDirectory, GroupDirectory, GroupInfo, StaticDirectory, StaticGroup};
pub use document::{DocumentStore, FsDocumentStore, MemoryDocumentStore, Upload};
pub use error::{Error, Result};
pub use graph::{GraphClient, StaticToken, TokenSource};
pub use identity::Actor;
pub use memo::{Memo, MemoSummary, MemoWithApprovals, SubmitOutcome, Submission};
pub use notify::{
    DeliveryStatus, DisabledSink, GraphMailSink, Notification, NotificationSink, RecordingSink,
};
pub use workflow::{CommittedDecline, DeclineOutcome, PendingDelivery, Workflow, WorkflowConfig};
