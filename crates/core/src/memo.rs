// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Memo records.
//!
//! A memo is immutable once submitted. It never carries an aggregate
//! "approved"/"declined" status; only its per-group approvals do.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::approval::{Approval, GroupPriority};
use crate::document::Upload;
use crate::identity::Actor;

/// A submitted memo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memo {
    /// Database-assigned identifier.
    pub id: i64,
    /// Free-text description (at most 1000 characters).
    pub description: String,
    /// Opaque document-store reference for the attachment.
    pub document_ref: String,
    /// Original (sanitized) file name of the attachment.
    pub document_name: String,
    /// MIME type reported at upload.
    pub content_type: String,
    /// Who raised the memo.
    pub submitter: Actor,
    /// Calendar date the memo is issued on.
    pub issued_on: NaiveDate,
    /// When the memo was stored.
    pub created_at: DateTime<Utc>,
}

/// The fields of a memo shown alongside an actionable approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoSummary {
    pub id: i64,
    pub description: String,
    pub issued_on: NaiveDate,
    pub document_ref: String,
    pub submitter: Actor,
}

impl From<&Memo> for MemoSummary {
    fn from(memo: &Memo) -> Self {
        MemoSummary {
            id: memo.id,
            description: memo.description.clone(),
            issued_on: memo.issued_on,
            document_ref: memo.document_ref.clone(),
            submitter: memo.submitter.clone(),
        }
    }
}

/// A memo with all of its approval rows, ordered by priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoWithApprovals {
    #[serde(flatten)]
    pub memo: Memo,
    pub approvals: Vec<Approval>,
}

/// Caller input for a new memo.
#[derive(Debug, Clone)]
pub struct Submission {
    pub description: String,
    pub document: Upload,
    /// Approver groups in the order the submitter chose.
    pub approvers: Vec<String>,
    /// Defaults to the submission day when absent.
    pub issued_on: Option<NaiveDate>,
}

/// Validated memo fields ready to be written, with the stored document ref.
#[derive(Debug, Clone)]
pub(crate) struct NewMemo {
    pub description: String,
    pub document_ref: String,
    pub document_name: String,
    pub content_type: String,
    pub submitter: Actor,
    pub issued_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub memo_id: i64,
    pub hierarchy: Vec<GroupPriority>,
}

impl SubmitOutcome {
    /// Number of approval rows created (one per distinct group).
    pub fn approvals_created(&self) -> usize {
        self.hierarchy.len()
    }
}
