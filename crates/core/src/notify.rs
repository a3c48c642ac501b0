// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Decline notifications: message rendering, delivery sinks and the outbox
//! record kept for every notification.
//!
//! Delivery is attempted once, after the decline has committed. A failed
//! attempt leaves the outbox row `failed` so an operator can retry it; it
//! never affects the approval itself.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::graph::GraphClient;
use crate::identity::Actor;
use crate::memo::Memo;

/// A file attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A fully rendered message ready for a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub recipient: Actor,
    pub subject: String,
    pub html_body: String,
    pub attachment: Option<Attachment>,
}

/// Capability for delivering messages to a memo's submitter.
pub trait NotificationSink: Send + Sync {
    fn send(&self, message: &OutgoingMessage) -> Result<()>;
}

/// Sink used when no transport is configured. Every send fails, so declines
/// still record a `failed` outbox row that can be redelivered later.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSink;

impl NotificationSink for DisabledSink {
    fn send(&self, _message: &OutgoingMessage) -> Result<()> {
        Err(Error::Notification("notifications disabled".to_string()))
    }
}

/// In-memory sink that records every message. Clones share state.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    sent: Arc<Mutex<Vec<OutgoingMessage>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle whether subsequent sends fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Messages delivered so far.
    pub fn sent(&self) -> Vec<OutgoingMessage> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl NotificationSink for RecordingSink {
    fn send(&self, message: &OutgoingMessage) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Notification("sink configured to fail".to_string()));
        }
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| Error::Notification("recording sink poisoned".to_string()))?;
        sent.push(message.clone());
        Ok(())
    }
}

/// Sends mail through Graph `POST /users/{sender}/sendMail`.
pub struct GraphMailSink {
    client: GraphClient,
    sender_address: String,
    sender_name: String,
}

impl GraphMailSink {
    pub fn new(
        client: GraphClient,
        sender_address: impl Into<String>,
        sender_name: impl Into<String>,
    ) -> Self {
        GraphMailSink {
            client,
            sender_address: sender_address.into(),
            sender_name: sender_name.into(),
        }
    }
}

/// Build the Graph `sendMail` request body.
pub fn send_mail_payload(message: &OutgoingMessage, sender_address: &str, sender_name: &str) -> Value {
    let mut payload = json!({
        "message": {
            "subject": message.subject,
            "body": {
                "contentType": "HTML",
                "content": message.html_body,
            },
            "from": {
                "emailAddress": {"address": sender_address, "name": sender_name}
            },
            "toRecipients": [{
                "emailAddress": {
                    "address": message.recipient.email,
                    "name": message.recipient.name,
                }
            }],
        },
        "saveToSentItems": false,
    });
    if let Some(attachment) = &message.attachment {
        payload["message"]["attachments"] = json!([{
            "@odata.type": "#microsoft.graph.fileAttachment",
            "name": attachment.name,
            "contentType": attachment.content_type,
            "contentBytes": BASE64.encode(&attachment.bytes),
        }]);
    }
    payload
}

impl NotificationSink for GraphMailSink {
    fn send(&self, message: &OutgoingMessage) -> Result<()> {
        let payload = send_mail_payload(message, &self.sender_address, &self.sender_name);
        self.client
            .post(&["users", &self.sender_address, "sendMail"], &payload)
            .map_err(|e| Error::Notification(e.to_string()))
    }
}

/// Escape text for inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a multi-line reason and turn line breaks into `<br>`.
fn reason_html(reason: &str) -> String {
    escape_html(reason)
        .replace("\r\n", "\n")
        .replace('\n', "<br>\n")
}

/// Subject line for a decline notification.
pub fn decline_subject(memo: &Memo) -> String {
    format!("Memo Declined: {}", memo.description)
}

const ATTACHMENT_NOTE: &str =
    "<p><strong>Your original document is attached to this email.</strong></p>\n";
const FOOTER_START: &str = "<p style=\"font-size: 12px;\">";

/// Insert the attachment note into a rendered decline body, ahead of the
/// footer.
pub fn with_attachment_note(html_body: &str) -> String {
    match html_body
        .find(FOOTER_START)
        .or_else(|| html_body.find("</body>"))
    {
        Some(at) => format!("{}{ATTACHMENT_NOTE}{}", &html_body[..at], &html_body[at..]),
        None => format!("{html_body}{ATTACHMENT_NOTE}"),
    }
}

/// HTML body for a decline notification, without the attachment note.
pub fn decline_body(memo: &Memo, group: &str, decliner: &Actor, reason: &str) -> String {
    let submitted = memo.created_at.format("%B %-d, %Y at %-I:%M %p");
    let group = escape_html(group);
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
<h2>Memo Declined</h2>
<p>Dear {submitter},</p>
<p>Your memo submission has been <strong>declined</strong> by the {group} team.</p>
<p><strong>Memo Description:</strong> {description}</p>
<p><strong>Submitted Date:</strong> {submitted}</p>
<p><strong>Declined by:</strong> {decliner} ({group})</p>
<div style="border-left: 4px solid #dc3545; padding: 15px;">
<strong>Decline Reason:</strong><br>
{reason}
</div>
<p>Please review the feedback and feel free to resubmit your memo with the necessary adjustments.</p>
<p style="font-size: 12px;">This is an automated notification from the Memo Approval System. Please do not reply to this email.</p>
</body>
</html>
"#,
        submitter = escape_html(&memo.submitter.name),
        description = escape_html(&memo.description),
        decliner = escape_html(&decliner.name),
        reason = reason_html(reason),
    )
}

/// Delivery state of an outbox row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// Recorded, no attempt finished yet.
    Pending,
    Sent,
    /// Last attempt failed; eligible for operator redelivery.
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(DeliveryStatus::Pending),
            "sent" => Ok(DeliveryStatus::Sent),
            "failed" => Ok(DeliveryStatus::Failed),
            _ => Err(Error::InvalidDeliveryStatus(s.to_string())),
        }
    }
}

/// A notification outbox row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub approval_id: i64,
    pub memo_id: i64,
    pub recipient: Actor,
    pub subject: String,
    pub html_body: String,
    /// Document to attach, if the memo has one.
    pub document_ref: Option<String>,
    pub status: DeliveryStatus,
    pub attempts: u32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}

/// Outbox fields written inside the decline transaction.
#[derive(Debug, Clone)]
pub(crate) struct NewNotification {
    pub approval_id: i64,
    pub memo_id: i64,
    pub recipient: Actor,
    pub subject: String,
    pub html_body: String,
    pub document_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
