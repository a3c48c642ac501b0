// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::{NaiveDate, TimeZone, Utc};
use memo_core::notify::DeliveryStatus;
use memo_core::{Actor, ApprovalStatus, Memo, MemoSummary};

fn memo() -> Memo {
    Memo {
        id: 7,
        description: "Office move".to_string(),
        document_ref: "memos/0123456789ab-move.pdf".to_string(),
        document_name: "move.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        submitter: Actor::new("Sam", "sam@corp.example"),
        issued_on: NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(),
        created_at: Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap(),
    }
}

fn approval(priority: u32, group: &str, status: ApprovalStatus) -> Approval {
    Approval {
        id: i64::from(priority),
        memo_id: 7,
        required_group: group.to_string(),
        priority,
        status,
        comment: None,
        approved_by_name: None,
        approved_by_email: None,
        declined_by_name: None,
        declined_by_email: None,
        acted_at: None,
        created_at: Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap(),
    }
}

#[test]
fn memo_lists_hierarchy_in_order() {
    let mut finance = approval(1, "Finance", ApprovalStatus::Approved);
    finance.approved_by_name = Some("Fran".to_string());
    finance.acted_at = Some(Utc.with_ymd_and_hms(2026, 5, 5, 14, 0, 0).unwrap());
    let mut legal = approval(2, "Legal", ApprovalStatus::Declined);
    legal.declined_by_name = Some("Lee".to_string());
    legal.comment = Some("Missing clause".to_string());

    let text = format_memo(&MemoWithApprovals {
        memo: memo(),
        approvals: vec![finance, legal],
    });
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Memo #7: Office move");
    assert_eq!(lines[1], "Submitted by: Sam <sam@corp.example>");
    assert_eq!(lines[2], "Issued: 2026-05-04");
    assert_eq!(lines[7], "  1. Finance [approved] by Fran on 2026-05-05 14:00");
    assert_eq!(lines[8], "  2. Legal [declined] by Lee: \"Missing clause\"");
}

#[test]
fn pending_approval_has_no_actor() {
    let line = format_approval(&approval(3, "Board", ApprovalStatus::Pending));
    assert_eq!(line, "  3. Board [pending]");
}

#[test]
fn actionable_line() {
    let item = ActionableApproval {
        approval_id: 12,
        status: ApprovalStatus::Pending,
        required_group: "Finance".to_string(),
        priority: 1,
        memo: MemoSummary::from(&memo()),
    };
    assert_eq!(
        format_actionable(&item),
        "#12 Finance (p1) memo #7: Office move <sam@corp.example>"
    );
}

#[test]
fn group_line_right_aligns_priority() {
    let group = GroupInfo {
        name: "Legal".to_string(),
        priority: 2,
    };
    assert_eq!(format_group(&group), "   2  Legal");
}

#[test]
fn failed_notification_shows_error() {
    let n = Notification {
        id: 3,
        approval_id: 12,
        memo_id: 7,
        recipient: Actor::new("Sam", "sam@corp.example"),
        subject: "Memo Declined: Office move".to_string(),
        html_body: String::new(),
        document_ref: None,
        status: DeliveryStatus::Failed,
        attempts: 2,
        last_error: Some("notifications disabled".to_string()),
        created_at: Utc.with_ymd_and_hms(2026, 5, 5, 14, 0, 0).unwrap(),
        delivered_at: None,
    };
    let text = format_notification(&n);
    assert!(text.starts_with("#3 [failed] approval #12 to sam@corp.example (attempts: 2)"));
    assert!(text.ends_with("last error: notifications disabled"));
}
