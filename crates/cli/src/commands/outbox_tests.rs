// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::{approval_id, finance_member, submit, text, workflow};
use crate::error::Error;
use memo_core::notify::RecordingSink;

/// Decline the Finance approval while the sink is failing.
fn failed_decline(sink: &RecordingSink) -> Workflow {
    let mut wf = workflow(sink);
    let memo_id = submit(&mut wf, "Budget", &["Finance", "Legal"]);
    let finance = approval_id(&wf, memo_id, "Finance");
    sink.set_failing(true);
    let outcome = wf
        .decline(finance, &finance_member(), &["Finance".to_string()], "Over budget")
        .unwrap();
    assert!(!outcome.notification_sent);
    wf
}

#[test]
fn list_filters_by_status() {
    let sink = RecordingSink::new();
    let wf = failed_decline(&sink);

    let mut buf = Vec::new();
    list_impl(wf.database(), Some("failed"), None, OutputFormat::Text, &mut buf).unwrap();
    let out = text(buf);
    assert!(out.contains("[failed]"));
    assert!(out.contains("to sam@corp.example (attempts: 1)"));

    let mut buf = Vec::new();
    list_impl(wf.database(), Some("sent"), None, OutputFormat::Text, &mut buf).unwrap();
    assert_eq!(text(buf), "Outbox is empty\n");
}

#[test]
fn list_rejects_unknown_status() {
    let sink = RecordingSink::new();
    let wf = workflow(&sink);
    let err = list_impl(wf.database(), Some("lost"), None, OutputFormat::Text, &mut Vec::new())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Core(memo_core::Error::InvalidDeliveryStatus(_))
    ));
}

#[test]
fn retry_delivers_failed_rows() {
    let sink = RecordingSink::new();
    let mut wf = failed_decline(&sink);
    sink.set_failing(false);

    let mut buf = Vec::new();
    retry_impl(&mut wf, None, &mut buf).unwrap();
    let out = text(buf);
    assert!(out.contains("[sent]"));
    assert!(out.ends_with("Retried 1 notification(s): 1 sent, 0 failed\n"));
    assert_eq!(sink.sent().len(), 1);

    let mut buf = Vec::new();
    retry_impl(&mut wf, None, &mut buf).unwrap();
    assert_eq!(text(buf), "Retried 0 notification(s): 0 sent, 0 failed\n");
}

#[test]
fn retry_that_fails_again_stays_failed() {
    let sink = RecordingSink::new();
    let mut wf = failed_decline(&sink);

    let mut buf = Vec::new();
    retry_impl(&mut wf, Some(10), &mut buf).unwrap();
    let out = text(buf);
    assert!(out.contains("(attempts: 2)"));
    assert!(out.ends_with("0 sent, 1 failed\n"));
}
