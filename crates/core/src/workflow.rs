// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The memo approval workflow.
//!
//! [`Workflow`] ties the database to the document store and the notification
//! sink. Callers pass the acting principal and its groups explicitly; the
//! workflow never consults a session or directory on its own.
//!
//! Approval rows move `pending -> approved` or `pending -> declined` exactly
//! once. A row may only move while no higher-priority row of the same memo is
//! pending. A decline records an outbox row in the same transaction, then
//! makes one delivery attempt after commit.
//!
//! Callers that share a workflow behind a lock use [`Workflow::commit_decline`]
//! and [`Workflow::finish_decline`] so the send itself runs without the lock.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::approval::{assign_priorities, ActionableApproval, Approval, Decision};
use crate::db::{Database, Transition};
use crate::document::{DocumentStore, Upload};
use crate::error::{Error, Result};
use crate::identity::Actor;
use crate::memo::{Memo, MemoWithApprovals, NewMemo, SubmitOutcome, Submission};
use crate::notify::{
    decline_body, decline_subject, with_attachment_note, Attachment, DeliveryStatus,
    NewNotification, Notification, NotificationSink, OutgoingMessage,
};
use crate::validate::{
    sanitize_file_name, validate_comment, validate_description, validate_document_size,
    DEFAULT_MAX_DOCUMENT_BYTES,
};

/// Tunables for the workflow.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Largest accepted document, in bytes.
    pub max_document_bytes: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        WorkflowConfig {
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

/// Result of a decline: the resolved row plus how the notification fared.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclineOutcome {
    pub approval: Approval,
    pub notification: Notification,
    pub notification_sent: bool,
}

/// An outbox row together with the message rendered for it.
#[derive(Debug, Clone)]
pub struct PendingDelivery {
    pub notification: Notification,
    pub message: OutgoingMessage,
}

/// A committed decline whose notification has not been attempted yet.
#[derive(Debug, Clone)]
pub struct CommittedDecline {
    pub approval: Approval,
    pub delivery: PendingDelivery,
}

/// The approval state machine over a database, document store and sink.
pub struct Workflow {
    db: Database,
    documents: Box<dyn DocumentStore>,
    sink: Arc<dyn NotificationSink>,
    config: WorkflowConfig,
}

impl Workflow {
    pub fn new(
        db: Database,
        documents: Box<dyn DocumentStore>,
        sink: Box<dyn NotificationSink>,
        config: WorkflowConfig,
    ) -> Self {
        Workflow {
            db,
            documents,
            sink: Arc::from(sink),
            config,
        }
    }

    /// Shared handle to the sink, for sending outside the workflow.
    pub fn sink(&self) -> Arc<dyn NotificationSink> {
        Arc::clone(&self.sink)
    }

    /// Underlying database, for read-only inspection.
    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Submit a memo for approval by the listed groups, in order.
    ///
    /// Nothing is persisted if validation or document storage fails. If the
    /// database insert fails the stored document is removed again.
    pub fn submit_memo(&mut self, submission: Submission, submitter: &Actor) -> Result<SubmitOutcome> {
        if submitter.email.trim().is_empty() {
            return Err(Error::AuthenticationRequired);
        }
        let description = validate_description(&submission.description)?;
        validate_document_size(
            submission.document.bytes.len(),
            self.config.max_document_bytes,
        )?;
        let hierarchy = assign_priorities(&submission.approvers)?;

        let now = Utc::now();
        let document_ref = self.documents.put(&submission.document)?;
        let memo = NewMemo {
            description,
            document_ref,
            document_name: sanitize_file_name(&submission.document.file_name),
            content_type: content_type_or_default(&submission.document),
            submitter: submitter.clone(),
            issued_on: submission.issued_on.unwrap_or_else(|| now.date_naive()),
            created_at: now,
        };

        let memo_id = match self.db.create_memo(&memo, &hierarchy) {
            Ok(id) => id,
            Err(err) => {
                if let Err(cleanup) = self.documents.remove(&memo.document_ref) {
                    tracing::warn!(
                        document = %memo.document_ref,
                        error = %cleanup,
                        "failed to remove document after rejected submission"
                    );
                }
                return Err(err);
            }
        };

        tracing::info!(
            memo_id,
            submitter = %submitter.email,
            approvals = hierarchy.len(),
            "memo submitted"
        );
        Ok(SubmitOutcome { memo_id, hierarchy })
    }

    /// Pending approvals the holder of `actor_groups` may act on right now.
    pub fn list_actionable(&self, actor_groups: &[String]) -> Result<Vec<ActionableApproval>> {
        self.db.list_actionable(actor_groups)
    }

    /// Approve a pending, unblocked approval on behalf of one of its group's members.
    pub fn approve(
        &mut self,
        approval_id: i64,
        actor: &Actor,
        actor_groups: &[String],
    ) -> Result<Approval> {
        let transition = Transition {
            approval_id,
            actor,
            actor_groups,
            decision: Decision::Approve,
            comment: None,
            at: Utc::now(),
        };
        let (approval, _) = self.db.resolve_approval(&transition, &outbox_row)?;
        tracing::info!(
            approval_id,
            memo_id = approval.memo_id,
            group = %approval.required_group,
            actor = %actor.email,
            "approval approved"
        );
        Ok(approval)
    }

    /// Decline a pending, unblocked approval and notify the submitter.
    ///
    /// The decline stands even when delivery fails; the outcome reports
    /// whether the notification went out.
    pub fn decline(
        &mut self,
        approval_id: i64,
        actor: &Actor,
        actor_groups: &[String],
        comment: &str,
    ) -> Result<DeclineOutcome> {
        let committed = self.commit_decline(approval_id, actor, actor_groups, comment)?;
        let outcome = self.sink.send(&committed.delivery.message);
        Ok(self.finish_decline(committed, outcome))
    }

    /// Decline an approval and commit its outbox row without sending.
    ///
    /// The returned message still has to go through [`Workflow::sink`]; hand
    /// the result to [`Workflow::finish_decline`] afterwards.
    pub fn commit_decline(
        &mut self,
        approval_id: i64,
        actor: &Actor,
        actor_groups: &[String],
        comment: &str,
    ) -> Result<CommittedDecline> {
        let comment = validate_comment(comment)?;
        let transition = Transition {
            approval_id,
            actor,
            actor_groups,
            decision: Decision::Decline,
            comment: Some(&comment),
            at: Utc::now(),
        };
        let (approval, notification) = self.db.resolve_approval(&transition, &outbox_row)?;
        tracing::info!(
            approval_id,
            memo_id = approval.memo_id,
            group = %approval.required_group,
            actor = %actor.email,
            "approval declined"
        );

        let notification = notification.ok_or_else(|| {
            Error::CorruptedData(format!("decline of approval {approval_id} wrote no outbox row"))
        })?;
        Ok(CommittedDecline {
            approval,
            delivery: self.prepare_delivery(notification),
        })
    }

    /// Record how the decline notification fared. A failure to record is
    /// logged and leaves the outbox row `pending`.
    pub fn finish_decline(&self, committed: CommittedDecline, outcome: Result<()>) -> DeclineOutcome {
        let CommittedDecline { approval, delivery } = committed;
        let notification = match self.record_attempt(&delivery.notification, outcome) {
            Ok(recorded) => recorded,
            Err(err) => {
                tracing::warn!(
                    notification_id = delivery.notification.id,
                    error = %err,
                    "failed to record notification delivery"
                );
                delivery.notification
            }
        };
        let notification_sent = notification.status == DeliveryStatus::Sent;
        DeclineOutcome {
            approval,
            notification,
            notification_sent,
        }
    }

    /// A memo and all of its approvals.
    pub fn memo_with_approvals(&self, memo_id: i64) -> Result<MemoWithApprovals> {
        self.db.memo_with_approvals(memo_id)
    }

    /// Memos raised by `email`, newest first, each with its approvals.
    pub fn submitted_by(&self, email: &str) -> Result<Vec<MemoWithApprovals>> {
        self.db
            .memos_by_submitter(email)?
            .into_iter()
            .map(|memo| {
                let approvals = self.db.approvals_for_memo(memo.id)?;
                Ok(MemoWithApprovals { memo, approvals })
            })
            .collect()
    }

    /// Retry delivery of failed notifications, oldest first, once each.
    pub fn redeliver_failed(&mut self, limit: Option<usize>) -> Result<Vec<Notification>> {
        let failed = self
            .db
            .list_notifications(Some(DeliveryStatus::Failed), limit)?;
        let mut results = Vec::with_capacity(failed.len());
        for notification in failed {
            results.push(self.deliver(notification)?);
        }
        Ok(results)
    }

    /// Make one delivery attempt and record its outcome on the outbox row.
    fn deliver(&self, notification: Notification) -> Result<Notification> {
        let delivery = self.prepare_delivery(notification);
        let outcome = self.sink.send(&delivery.message);
        self.record_attempt(&delivery.notification, outcome)
    }

    /// Render the outgoing message for an outbox row. The attachment note is
    /// only added when the document could be fetched.
    fn prepare_delivery(&self, notification: Notification) -> PendingDelivery {
        let attachment = self.attachment_for(&notification);
        let html_body = if attachment.is_some() {
            with_attachment_note(&notification.html_body)
        } else {
            notification.html_body.clone()
        };
        let message = OutgoingMessage {
            recipient: notification.recipient.clone(),
            subject: notification.subject.clone(),
            html_body,
            attachment,
        };
        PendingDelivery {
            notification,
            message,
        }
    }

    fn record_attempt(&self, notification: &Notification, outcome: Result<()>) -> Result<Notification> {
        let outcome = outcome.map_err(|e| e.to_string());
        match &outcome {
            Ok(()) => tracing::info!(
                notification_id = notification.id,
                recipient = %notification.recipient.email,
                "decline notification sent"
            ),
            Err(reason) => tracing::warn!(
                notification_id = notification.id,
                recipient = %notification.recipient.email,
                error = %reason,
                "decline notification failed"
            ),
        }
        self.db.record_delivery(notification.id, outcome, Utc::now())
    }

    /// The memo document as an attachment, when it can still be fetched.
    fn attachment_for(&self, notification: &Notification) -> Option<Attachment> {
        let reference = notification.document_ref.as_deref()?;
        let memo = self.db.get_memo(notification.memo_id).ok()?;
        match self.documents.get(reference) {
            Ok(bytes) => Some(Attachment {
                name: attachment_name(&memo),
                content_type: memo.content_type,
                bytes,
            }),
            Err(err) => {
                tracing::warn!(
                    notification_id = notification.id,
                    document = reference,
                    error = %err,
                    "sending decline notification without attachment"
                );
                None
            }
        }
    }
}

/// Outbox row for a freshly declined approval.
fn outbox_row(memo: &Memo, approval: &Approval) -> NewNotification {
    let decliner = Actor {
        name: approval.declined_by_name.clone().unwrap_or_default(),
        email: approval.declined_by_email.clone().unwrap_or_default(),
    };
    let reason = approval.comment.as_deref().unwrap_or_default();
    NewNotification {
        approval_id: approval.id,
        memo_id: memo.id,
        recipient: memo.submitter.clone(),
        subject: decline_subject(memo),
        html_body: decline_body(memo, &approval.required_group, &decliner, reason),
        document_ref: Some(memo.document_ref.clone()),
        created_at: approval.acted_at.unwrap_or_else(Utc::now),
    }
}

fn attachment_name(memo: &Memo) -> String {
    if memo.document_name.is_empty() {
        sanitize_file_name(&memo.document_ref)
    } else {
        memo.document_name.clone()
    }
}

fn content_type_or_default(upload: &Upload) -> String {
    let content_type = upload.content_type.trim();
    if content_type.is_empty() {
        "application/octet-stream".to_string()
    } else {
        content_type.to_string()
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
