// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for memo-core operations.

use thiserror::Error;

use crate::approval::ApprovalStatus;

/// All possible errors that can occur in memo-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{field} is required")]
    FieldRequired { field: &'static str },

    #[error("{field} too long ({actual} chars, max {max})")]
    FieldTooLong {
        field: &'static str,
        actual: usize,
        max: usize,
    },

    #[error("document too large ({actual} bytes, max {max})\n  hint: attach a smaller document")]
    DocumentTooLarge { actual: usize, max: usize },

    #[error("invalid issue date: '{0}'\n  hint: dates use the YYYY-MM-DD format")]
    InvalidDate(String),

    #[error("authentication required\n  hint: sign in through the portal before calling this endpoint")]
    AuthenticationRequired,

    #[error("not authorized to act for group '{group}'\n  hint: only members of '{group}' can approve or decline approval {approval_id}")]
    NotAuthorized { approval_id: i64, group: String },

    #[error("approval {approval_id} for '{group}' is not yet actionable\n  hint: waiting on higher-priority groups: {}", blocking.join(", "))]
    HierarchyBlocked {
        approval_id: i64,
        group: String,
        blocking: Vec<String>,
    },

    #[error("approval {approval_id} for '{group}' was already {status}")]
    AlreadyResolved {
        approval_id: i64,
        group: String,
        status: ApprovalStatus,
    },

    #[error("approval not found: {0}")]
    ApprovalNotFound(i64),

    #[error("memo not found: {0}")]
    MemoNotFound(i64),

    #[error("notification not found: {0}")]
    NotificationNotFound(i64),

    #[error("document not found: {0}")]
    DocumentNotFound(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("notification error: {0}")]
    Notification(String),

    #[error("directory error: {0}")]
    Directory(String),

    #[error("invalid status: '{0}'\n  hint: valid statuses are: pending, approved, declined")]
    InvalidStatus(String),

    #[error("invalid delivery status: '{0}'\n  hint: valid statuses are: pending, sent, failed")]
    InvalidDeliveryStatus(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl Error {
    /// Returns true for errors caused by malformed or missing caller input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::FieldRequired { .. }
                | Error::FieldTooLong { .. }
                | Error::DocumentTooLarge { .. }
                | Error::InvalidDate(_)
        )
    }

    /// Returns true when the referenced memo, approval or notification does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::ApprovalNotFound(_) | Error::MemoNotFound(_) | Error::NotificationNotFound(_)
        )
    }
}

/// A specialized Result type for memo-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
