// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use memo_core::{ActionableApproval, Approval, GroupInfo, MemoWithApprovals, Notification};

/// Timestamp format for terminal output.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format a memo and its hierarchy for `memo show`.
pub fn format_memo(details: &MemoWithApprovals) -> String {
    let memo = &details.memo;
    let mut lines = vec![
        format!("Memo #{}: {}", memo.id, memo.description),
        format!(
            "Submitted by: {} <{}>",
            memo.submitter.name, memo.submitter.email
        ),
        format!("Issued: {}", memo.issued_on),
        format!("Created: {}", memo.created_at.format(TIME_FORMAT)),
        format!("Document: {} ({})", memo.document_ref, memo.content_type),
        String::new(),
        "Approvals:".to_string(),
    ];
    lines.extend(details.approvals.iter().map(format_approval));
    lines.join("\n")
}

/// One hierarchy line, e.g. `  2. Legal [declined] by Lee: "Missing clause"`.
pub fn format_approval(approval: &Approval) -> String {
    let mut line = format!(
        "  {}. {} [{}]",
        approval.priority, approval.required_group, approval.status
    );
    if let Some(actor) = approval.acted_by_name() {
        line.push_str(&format!(" by {actor}"));
    }
    if let Some(at) = approval.acted_at {
        line.push_str(&format!(" on {}", at.format(TIME_FORMAT)));
    }
    if let Some(comment) = &approval.comment {
        line.push_str(&format!(": \"{comment}\""));
    }
    line
}

pub fn format_actionable(item: &ActionableApproval) -> String {
    format!(
        "#{} {} (p{}) memo #{}: {} <{}>",
        item.approval_id,
        item.required_group,
        item.priority,
        item.memo.id,
        item.memo.description,
        item.memo.submitter.email
    )
}

pub fn format_group(group: &GroupInfo) -> String {
    format!("{:>4}  {}", group.priority, group.name)
}

pub fn format_notification(n: &Notification) -> String {
    let mut line = format!(
        "#{} [{}] approval #{} to {} (attempts: {}) {}",
        n.id, n.status, n.approval_id, n.recipient.email, n.attempts, n.subject
    );
    if let Some(err) = &n.last_error {
        line.push_str(&format!("\n    last error: {err}"));
    }
    line
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
