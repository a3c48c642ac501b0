// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Approval rows and the group hierarchy attached to each memo.
//!
//! Every memo carries one [`Approval`] per required group. Each row has a
//! priority (1 = decided first) taken from the order the submitter listed the
//! groups in. A row becomes actionable once no strictly-higher-priority row
//! of the same memo is still pending; equal priorities never block each other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::memo::MemoSummary;
use crate::validate::validate_group_name;

/// Workflow status of a single group's approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Waiting for a member of the required group. Initial state.
    Pending,
    /// A group member approved.
    Approved,
    /// A group member declined (with a comment).
    Declined,
}

impl ApprovalStatus {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Declined => "declined",
        }
    }

    /// Returns true once a group has acted. Terminal rows never change again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ApprovalStatus::Pending)
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "declined" => Ok(ApprovalStatus::Declined),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// A terminal decision an actor can record on a pending approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Decline,
}

impl Decision {
    /// Status the approval moves to.
    pub fn target(&self) -> ApprovalStatus {
        match self {
            Decision::Approve => ApprovalStatus::Approved,
            Decision::Decline => ApprovalStatus::Declined,
        }
    }
}

/// One required group's sign-off on a memo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Approval {
    /// Database-assigned identifier.
    pub id: i64,
    /// The memo this approval belongs to.
    pub memo_id: i64,
    /// Name of the group whose members may act on this row.
    pub required_group: String,
    /// Position in the memo's hierarchy (1 = decided first).
    pub priority: u32,
    /// Current workflow state.
    pub status: ApprovalStatus,
    /// Decline reason (always set for declined rows).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declined_by_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declined_by_email: Option<String>,
    /// When the terminal action happened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acted_at: Option<DateTime<Utc>>,
    /// When the row was created (same instant as its memo).
    pub created_at: DateTime<Utc>,
}

impl Approval {
    /// Name of whoever resolved this row, if anyone has.
    pub fn acted_by_name(&self) -> Option<&str> {
        match self.status {
            ApprovalStatus::Pending => None,
            ApprovalStatus::Approved => self.approved_by_name.as_deref(),
            ApprovalStatus::Declined => self.declined_by_name.as_deref(),
        }
    }
}

/// A (group, priority) pair in a memo's approval hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPriority {
    pub group: String,
    pub priority: u32,
}

/// Derive the approval hierarchy from the submitter's ordered group list.
///
/// Names are trimmed; repeated names keep their first position only. The
/// first remaining group gets priority 1, the next 2, and so on.
pub fn assign_priorities<S: AsRef<str>>(groups: &[S]) -> Result<Vec<GroupPriority>> {
    let mut seen = HashSet::new();
    let mut hierarchy = Vec::with_capacity(groups.len());

    for group in groups {
        let name = validate_group_name(group.as_ref())?;
        if !seen.insert(name.clone()) {
            continue;
        }
        let priority = u32::try_from(hierarchy.len() + 1).unwrap_or(u32::MAX);
        hierarchy.push(GroupPriority {
            group: name,
            priority,
        });
    }

    if hierarchy.is_empty() {
        return Err(Error::FieldRequired {
            field: "At least one approver group",
        });
    }
    Ok(hierarchy)
}

/// Groups of `siblings` that currently keep `target` from being actioned.
///
/// A sibling blocks when it belongs to the same memo, has a strictly lower
/// priority number, and is still pending.
pub fn blocking_groups(siblings: &[Approval], target: &Approval) -> Vec<String> {
    siblings
        .iter()
        .filter(|s| {
            s.id != target.id
                && s.memo_id == target.memo_id
                && s.priority < target.priority
                && s.status == ApprovalStatus::Pending
        })
        .map(|s| s.required_group.clone())
        .collect()
}

/// A pending approval the requesting actor may act on right now, joined with
/// the memo it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionableApproval {
    pub approval_id: i64,
    pub status: ApprovalStatus,
    pub required_group: String,
    pub priority: u32,
    pub memo: MemoSummary,
}

#[cfg(test)]
#[path = "approval_tests.rs"]
mod tests;
