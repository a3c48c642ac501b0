// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::{NaiveDate, TimeZone};
use yare::parameterized;

fn memo() -> Memo {
    Memo {
        id: 7,
        description: "Office <move> & budget".to_string(),
        document_ref: "memos/abc-move.pdf".to_string(),
        document_name: "move.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        submitter: Actor::new("Sam Submitter", "sam@corp.example"),
        issued_on: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        created_at: Utc.with_ymd_and_hms(2026, 3, 1, 14, 5, 0).unwrap(),
    }
}

fn message(attachment: Option<Attachment>) -> OutgoingMessage {
    OutgoingMessage {
        recipient: Actor::new("Sam", "sam@corp.example"),
        subject: "Memo Declined: x".to_string(),
        html_body: "<p>x</p>".to_string(),
        attachment,
    }
}

#[test]
fn subject_uses_raw_description() {
    assert_eq!(decline_subject(&memo()), "Memo Declined: Office <move> & budget");
}

#[test]
fn body_names_group_decliner_and_submitter() {
    let body = decline_body(&memo(), "Legal", &Actor::new("Lee", "lee@corp.example"), "No");
    assert!(body.contains("Dear Sam Submitter,"));
    assert!(body.contains("declined</strong> by the Legal team"));
    assert!(body.contains("Declined by:</strong> Lee (Legal)"));
    assert!(body.contains("Office &lt;move&gt; &amp; budget"));
    assert!(body.contains("March 1, 2026 at 2:05 PM"));
    assert!(!body.contains("attached to this email"));
}

#[test]
fn attachment_note_goes_before_footer() {
    let body = decline_body(&memo(), "Legal", &Actor::new("Lee", "lee@corp.example"), "No");
    let noted = with_attachment_note(&body);
    let note = noted.find("attached to this email").unwrap();
    let footer = noted.find("Please do not reply").unwrap();
    assert!(note < footer);
    assert_eq!(noted.len(), body.len() + ATTACHMENT_NOTE.len());

    assert_eq!(
        with_attachment_note("<p>x</p>"),
        format!("<p>x</p>{ATTACHMENT_NOTE}")
    );
}

#[test]
fn reason_is_escaped_and_line_broken() {
    let body = decline_body(
        &memo(),
        "Legal",
        &Actor::new("Lee", "lee@corp.example"),
        "Missing <b>totals</b>\nFix page 2",
    );
    assert!(body.contains("Missing &lt;b&gt;totals&lt;/b&gt;<br>\nFix page 2"));
    assert!(!body.contains("<b>totals"));
}

#[parameterized(
    amp = { "a&b", "a&amp;b" },
    quotes = { "\"q\" 'r'", "&quot;q&quot; &#039;r&#039;" },
    plain = { "plain", "plain" },
)]
fn html_escaping(input: &str, expected: &str) {
    assert_eq!(escape_html(input), expected);
}

#[test]
fn payload_without_attachment() {
    let payload = send_mail_payload(&message(None), "noreply@corp.example", "Portal");
    assert_eq!(payload["saveToSentItems"], false);
    assert_eq!(payload["message"]["body"]["contentType"], "HTML");
    assert_eq!(
        payload["message"]["toRecipients"][0]["emailAddress"]["address"],
        "sam@corp.example"
    );
    assert_eq!(
        payload["message"]["from"]["emailAddress"]["address"],
        "noreply@corp.example"
    );
    assert!(payload["message"].get("attachments").is_none());
}

#[test]
fn payload_with_attachment_is_base64() {
    let attachment = Attachment {
        name: "move.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        bytes: b"hello".to_vec(),
    };
    let payload = send_mail_payload(&message(Some(attachment)), "n@corp.example", "Portal");
    let first = &payload["message"]["attachments"][0];
    assert_eq!(first["@odata.type"], "#microsoft.graph.fileAttachment");
    assert_eq!(first["name"], "move.pdf");
    assert_eq!(first["contentBytes"], "aGVsbG8=");
}

#[test]
fn recording_sink_records_and_can_fail() {
    let sink = RecordingSink::new();
    let handle = sink.clone();
    sink.send(&message(None)).unwrap();
    assert_eq!(handle.sent().len(), 1);

    handle.set_failing(true);
    assert!(matches!(
        sink.send(&message(None)).unwrap_err(),
        Error::Notification(_)
    ));
    assert_eq!(handle.sent().len(), 1);
}

#[test]
fn disabled_sink_always_fails() {
    assert!(DisabledSink.send(&message(None)).is_err());
}

#[parameterized(
    pending = { "pending", DeliveryStatus::Pending },
    sent = { "sent", DeliveryStatus::Sent },
    failed = { "FAILED", DeliveryStatus::Failed },
)]
fn delivery_status_from_str(input: &str, expected: DeliveryStatus) {
    assert_eq!(input.parse::<DeliveryStatus>().unwrap(), expected);
}

#[test]
fn delivery_status_rejects_unknown() {
    assert!(matches!(
        "bounced".parse::<DeliveryStatus>().unwrap_err(),
        Error::InvalidDeliveryStatus(_)
    ));
}
