// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed storage for memos, approvals and the notification outbox.
//!
//! Approval state changes happen through [`Database::resolve_approval`],
//! which applies the hierarchy rule and the pending check in a single
//! conditional `UPDATE` inside an `IMMEDIATE` transaction. Two concurrent
//! actions on the same row cannot both succeed.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;

use crate::approval::{
    blocking_groups, ActionableApproval, Approval, ApprovalStatus, Decision, GroupPriority,
};
use crate::error::{Error, Result};
use crate::identity::Actor;
use crate::memo::{Memo, MemoSummary, MemoWithApprovals, NewMemo};
use crate::notify::{DeliveryStatus, NewNotification, Notification};

/// SQL schema for the memo approval database.
pub const SCHEMA: &str = r#"
-- Submitted memos (immutable)
CREATE TABLE IF NOT EXISTS memos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    description TEXT NOT NULL,
    document_ref TEXT NOT NULL,
    document_name TEXT NOT NULL DEFAULT '',
    content_type TEXT NOT NULL DEFAULT 'application/octet-stream',
    submitter_name TEXT NOT NULL,
    submitter_email TEXT NOT NULL,
    issued_on TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- One approval per (memo, required group)
CREATE TABLE IF NOT EXISTS approvals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    memo_id INTEGER NOT NULL,
    required_group_name TEXT NOT NULL,
    group_priority INTEGER NOT NULL CHECK (group_priority > 0),
    status TEXT NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'approved', 'declined')),
    comment TEXT,
    approved_by_name TEXT,
    approved_by_email TEXT,
    declined_by_name TEXT,
    declined_by_email TEXT,
    acted_at TEXT,
    created_at TEXT NOT NULL,
    UNIQUE (memo_id, required_group_name),
    FOREIGN KEY (memo_id) REFERENCES memos(id) ON DELETE CASCADE
);

-- Decline notification outbox
CREATE TABLE IF NOT EXISTS notifications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    approval_id INTEGER NOT NULL,
    memo_id INTEGER NOT NULL,
    recipient_name TEXT NOT NULL,
    recipient_email TEXT NOT NULL,
    subject TEXT NOT NULL,
    html_body TEXT NOT NULL,
    document_ref TEXT,
    status TEXT NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'sent', 'failed')),
    attempts INTEGER NOT NULL DEFAULT 0,
    last_error TEXT,
    created_at TEXT NOT NULL,
    delivered_at TEXT,
    FOREIGN KEY (approval_id) REFERENCES approvals(id),
    FOREIGN KEY (memo_id) REFERENCES memos(id) ON DELETE CASCADE
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_memos_submitter ON memos(submitter_email);
CREATE INDEX IF NOT EXISTS idx_approvals_memo ON approvals(memo_id, group_priority);
CREATE INDEX IF NOT EXISTS idx_approvals_group_status ON approvals(required_group_name, status);
CREATE INDEX IF NOT EXISTS idx_notifications_status ON notifications(status);
"#;

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

fn parse_timestamp_opt(
    value: Option<String>,
    column: &str,
) -> std::result::Result<Option<DateTime<Utc>>, rusqlite::Error> {
    value.map(|v| parse_timestamp(&v, column)).transpose()
}

/// Create the schema on a database connection. Safe to run on every open.
///
/// Both binaries go through this, so a database created by either one can be
/// opened by the other.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

const MEMO_COLUMNS: &str = "id, description, document_ref, document_name, content_type,
    submitter_name, submitter_email, issued_on, created_at";

const APPROVAL_COLUMNS: &str = "id, memo_id, required_group_name, group_priority, status,
    comment, approved_by_name, approved_by_email, declined_by_name, declined_by_email,
    acted_at, created_at";

const NOTIFICATION_COLUMNS: &str = "id, approval_id, memo_id, recipient_name,
    recipient_email, subject, html_body, document_ref, status, attempts, last_error,
    created_at, delivered_at";

fn memo_from_row(row: &Row<'_>) -> rusqlite::Result<Memo> {
    let issued_str: String = row.get(7)?;
    let created_str: String = row.get(8)?;
    Ok(Memo {
        id: row.get(0)?,
        description: row.get(1)?,
        document_ref: row.get(2)?,
        document_name: row.get(3)?,
        content_type: row.get(4)?,
        submitter: Actor {
            name: row.get(5)?,
            email: row.get(6)?,
        },
        issued_on: parse_db::<NaiveDate>(&issued_str, "issued_on")?,
        created_at: parse_timestamp(&created_str, "created_at")?,
    })
}

fn approval_from_row(row: &Row<'_>) -> rusqlite::Result<Approval> {
    let status_str: String = row.get(4)?;
    let acted_str: Option<String> = row.get(10)?;
    let created_str: String = row.get(11)?;
    Ok(Approval {
        id: row.get(0)?,
        memo_id: row.get(1)?,
        required_group: row.get(2)?,
        priority: row.get(3)?,
        status: parse_db(&status_str, "status")?,
        comment: row.get(5)?,
        approved_by_name: row.get(6)?,
        approved_by_email: row.get(7)?,
        declined_by_name: row.get(8)?,
        declined_by_email: row.get(9)?,
        acted_at: parse_timestamp_opt(acted_str, "acted_at")?,
        created_at: parse_timestamp(&created_str, "created_at")?,
    })
}

fn notification_from_row(row: &Row<'_>) -> rusqlite::Result<Notification> {
    let status_str: String = row.get(8)?;
    let created_str: String = row.get(11)?;
    let delivered_str: Option<String> = row.get(12)?;
    Ok(Notification {
        id: row.get(0)?,
        approval_id: row.get(1)?,
        memo_id: row.get(2)?,
        recipient: Actor {
            name: row.get(3)?,
            email: row.get(4)?,
        },
        subject: row.get(5)?,
        html_body: row.get(6)?,
        document_ref: row.get(7)?,
        status: parse_db(&status_str, "status")?,
        attempts: row.get(9)?,
        last_error: row.get(10)?,
        created_at: parse_timestamp(&created_str, "created_at")?,
        delivered_at: parse_timestamp_opt(delivered_str, "delivered_at")?,
    })
}

fn select_memo(conn: &Connection, id: i64) -> Result<Memo> {
    let sql = format!("SELECT {MEMO_COLUMNS} FROM memos WHERE id = ?1");
    conn.query_row(&sql, params![id], memo_from_row)
        .optional()?
        .ok_or(Error::MemoNotFound(id))
}

fn select_approval(conn: &Connection, id: i64) -> Result<Approval> {
    let sql = format!("SELECT {APPROVAL_COLUMNS} FROM approvals WHERE id = ?1");
    conn.query_row(&sql, params![id], approval_from_row)
        .optional()?
        .ok_or(Error::ApprovalNotFound(id))
}

fn select_approvals_for_memo(conn: &Connection, memo_id: i64) -> Result<Vec<Approval>> {
    let sql = format!(
        "SELECT {APPROVAL_COLUMNS} FROM approvals WHERE memo_id = ?1
         ORDER BY group_priority, id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let approvals = stmt
        .query_map(params![memo_id], approval_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(approvals)
}

fn insert_notification(conn: &Connection, notification: &NewNotification) -> Result<i64> {
    conn.execute(
        "INSERT INTO notifications (approval_id, memo_id, recipient_name, recipient_email,
         subject, html_body, document_ref, status, attempts, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'pending', 0, ?8)",
        params![
            notification.approval_id,
            notification.memo_id,
            notification.recipient.name,
            notification.recipient.email,
            notification.subject,
            notification.html_body,
            notification.document_ref,
            notification.created_at.to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// A requested terminal action on one approval.
pub(crate) struct Transition<'a> {
    pub approval_id: i64,
    pub actor: &'a Actor,
    pub actor_groups: &'a [String],
    pub decision: Decision,
    /// Validated decline comment; ignored for approvals.
    pub comment: Option<&'a str>,
    pub at: DateTime<Utc>,
}

/// Builds the outbox row for a decline from the updated approval and its memo.
pub(crate) type OutboxBuilder<'a> = dyn Fn(&Memo, &Approval) -> NewNotification + 'a;

/// SQLite database connection with memo workflow operations.
pub struct Database {
    /// The underlying SQLite connection.
    pub conn: Connection,
}

impl Database {
    /// Open a database connection at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Enable foreign keys and WAL mode for concurrency
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Insert a memo and one pending approval per hierarchy entry, atomically.
    pub(crate) fn create_memo(&mut self, memo: &NewMemo, hierarchy: &[GroupPriority]) -> Result<i64> {
        let tx = self.conn.transaction()?;
        let created_at = memo.created_at.to_rfc3339();
        tx.execute(
            "INSERT INTO memos (description, document_ref, document_name, content_type,
             submitter_name, submitter_email, issued_on, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                memo.description,
                memo.document_ref,
                memo.document_name,
                memo.content_type,
                memo.submitter.name,
                memo.submitter.email,
                memo.issued_on.to_string(),
                created_at,
            ],
        )?;
        let memo_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO approvals (memo_id, required_group_name, group_priority, status, created_at)
                 VALUES (?1, ?2, ?3, 'pending', ?4)",
            )?;
            for entry in hierarchy {
                stmt.execute(params![memo_id, entry.group, entry.priority, created_at])?;
            }
        }

        tx.commit()?;
        Ok(memo_id)
    }

    /// Get a memo by ID.
    pub fn get_memo(&self, id: i64) -> Result<Memo> {
        select_memo(&self.conn, id)
    }

    /// Get an approval by ID.
    pub fn get_approval(&self, id: i64) -> Result<Approval> {
        select_approval(&self.conn, id)
    }

    /// All approvals of a memo, ordered by priority.
    pub fn approvals_for_memo(&self, memo_id: i64) -> Result<Vec<Approval>> {
        select_approvals_for_memo(&self.conn, memo_id)
    }

    /// A memo and all of its approvals, ordered by priority.
    pub fn memo_with_approvals(&self, memo_id: i64) -> Result<MemoWithApprovals> {
        let memo = self.get_memo(memo_id)?;
        let approvals = self.approvals_for_memo(memo_id)?;
        Ok(MemoWithApprovals { memo, approvals })
    }

    /// Memos raised by the given e-mail (case-insensitive), newest first.
    pub fn memos_by_submitter(&self, email: &str) -> Result<Vec<Memo>> {
        let sql = format!(
            "SELECT {MEMO_COLUMNS} FROM memos
             WHERE lower(submitter_email) = lower(?1)
             ORDER BY id DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let memos = stmt
            .query_map(params![email.trim()], memo_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(memos)
    }

    /// Pending approvals for any of `groups` with no pending higher-priority
    /// sibling, ordered by memo then priority.
    pub fn list_actionable(&self, groups: &[String]) -> Result<Vec<ActionableApproval>> {
        if groups.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; groups.len()].join(", ");
        let sql = format!(
            "SELECT a.id, a.status, a.required_group_name, a.group_priority,
                    m.id, m.description, m.issued_on, m.document_ref,
                    m.submitter_name, m.submitter_email
             FROM approvals a JOIN memos m ON m.id = a.memo_id
             WHERE a.status = 'pending'
               AND a.required_group_name IN ({placeholders})
               AND NOT EXISTS (
                   SELECT 1 FROM approvals h
                   WHERE h.memo_id = a.memo_id
                     AND h.group_priority < a.group_priority
                     AND h.status = 'pending'
               )
             ORDER BY m.id, a.group_priority, a.id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(groups.iter()), |row| {
                let status_str: String = row.get(1)?;
                let issued_str: String = row.get(6)?;
                Ok(ActionableApproval {
                    approval_id: row.get(0)?,
                    status: parse_db(&status_str, "status")?,
                    required_group: row.get(2)?,
                    priority: row.get(3)?,
                    memo: MemoSummary {
                        id: row.get(4)?,
                        description: row.get(5)?,
                        issued_on: parse_db(&issued_str, "issued_on")?,
                        document_ref: row.get(7)?,
                        submitter: Actor {
                            name: row.get(8)?,
                            email: row.get(9)?,
                        },
                    },
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Apply a terminal action to a pending approval.
    ///
    /// Checks run in this order: the row must exist, the actor must belong to
    /// its group, then the guarded update either succeeds or is classified as
    /// already resolved or blocked by the hierarchy. For declines, `outbox`
    /// builds the notification row written in the same transaction.
    pub(crate) fn resolve_approval(
        &mut self,
        transition: &Transition<'_>,
        outbox: &OutboxBuilder<'_>,
    ) -> Result<(Approval, Option<Notification>)> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current = select_approval(&tx, transition.approval_id)?;
        if !transition
            .actor_groups
            .iter()
            .any(|g| g == &current.required_group)
        {
            return Err(Error::NotAuthorized {
                approval_id: current.id,
                group: current.required_group,
            });
        }

        let (status_set, actor_columns) = match transition.decision {
            Decision::Approve => ("approved", "approved_by_name = ?1, approved_by_email = ?2"),
            Decision::Decline => ("declined", "declined_by_name = ?1, declined_by_email = ?2"),
        };
        let sql = format!(
            "UPDATE approvals
             SET status = '{status_set}', {actor_columns}, comment = ?3, acted_at = ?4
             WHERE id = ?5
               AND status = 'pending'
               AND NOT EXISTS (
                   SELECT 1 FROM approvals h
                   WHERE h.memo_id = approvals.memo_id
                     AND h.group_priority < approvals.group_priority
                     AND h.status = 'pending'
               )"
        );
        let comment = match transition.decision {
            Decision::Approve => None,
            Decision::Decline => transition.comment,
        };
        let changed = tx.execute(
            &sql,
            params![
                transition.actor.name,
                transition.actor.email,
                comment,
                transition.at.to_rfc3339(),
                transition.approval_id,
            ],
        )?;

        if changed == 0 {
            let row = select_approval(&tx, transition.approval_id)?;
            if row.status.is_terminal() {
                return Err(Error::AlreadyResolved {
                    approval_id: row.id,
                    group: row.required_group,
                    status: row.status,
                });
            }
            let siblings = select_approvals_for_memo(&tx, row.memo_id)?;
            return Err(Error::HierarchyBlocked {
                approval_id: row.id,
                blocking: blocking_groups(&siblings, &row),
                group: row.required_group,
            });
        }

        let updated = select_approval(&tx, transition.approval_id)?;
        let notification = match transition.decision {
            Decision::Approve => None,
            Decision::Decline => {
                let memo = select_memo(&tx, updated.memo_id)?;
                let id = insert_notification(&tx, &outbox(&memo, &updated))?;
                Some(select_notification(&tx, id)?)
            }
        };

        tx.commit()?;
        Ok((updated, notification))
    }

    /// Get an outbox row by ID.
    pub fn get_notification(&self, id: i64) -> Result<Notification> {
        select_notification(&self.conn, id)
    }

    /// Record the outcome of one delivery attempt.
    pub fn record_delivery(
        &self,
        id: i64,
        outcome: std::result::Result<(), String>,
        at: DateTime<Utc>,
    ) -> Result<Notification> {
        let changed = match &outcome {
            Ok(()) => self.conn.execute(
                "UPDATE notifications
                 SET status = 'sent', attempts = attempts + 1, last_error = NULL, delivered_at = ?1
                 WHERE id = ?2",
                params![at.to_rfc3339(), id],
            )?,
            Err(reason) => self.conn.execute(
                "UPDATE notifications
                 SET status = 'failed', attempts = attempts + 1, last_error = ?1
                 WHERE id = ?2",
                params![reason, id],
            )?,
        };
        if changed == 0 {
            return Err(Error::NotificationNotFound(id));
        }
        self.get_notification(id)
    }

    /// Outbox rows, optionally filtered by status, oldest first.
    pub fn list_notifications(
        &self,
        status: Option<DeliveryStatus>,
        limit: Option<usize>,
    ) -> Result<Vec<Notification>> {
        let limit = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
        let sql = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications
             WHERE (?1 IS NULL OR status = ?1)
             ORDER BY id
             LIMIT ?2"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![status.map(|s| s.as_str()), limit],
                notification_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn select_notification(conn: &Connection, id: i64) -> Result<Notification> {
    let sql = format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = ?1");
    conn.query_row(&sql, params![id], notification_from_row)
        .optional()?
        .ok_or(Error::NotificationNotFound(id))
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
