// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Input validation for memo submissions and decline comments.

use chrono::NaiveDate;

use crate::error::{Error, Result};

// Input length limits
pub const MAX_DESCRIPTION_LENGTH: usize = 1_000;
pub const MAX_COMMENT_LENGTH: usize = 1_000;
pub const MAX_GROUP_NAME_LENGTH: usize = 255;
pub const MAX_DOCUMENT_NAME_LENGTH: usize = 255;
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

/// Trim a required text field and enforce its length limit (in characters).
fn required_text(value: &str, field: &'static str, max: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::FieldRequired { field });
    }
    let actual = trimmed.chars().count();
    if actual > max {
        return Err(Error::FieldTooLong { field, actual, max });
    }
    Ok(trimmed.to_string())
}

/// Validate and trim a memo description.
pub fn validate_description(description: &str) -> Result<String> {
    required_text(description, "Description", MAX_DESCRIPTION_LENGTH)
}

/// Validate and trim a decline comment.
pub fn validate_comment(comment: &str) -> Result<String> {
    required_text(comment, "Comment", MAX_COMMENT_LENGTH)
}

/// Validate and trim an approver group name.
pub fn validate_group_name(group: &str) -> Result<String> {
    required_text(group, "Approver group", MAX_GROUP_NAME_LENGTH)
}

/// Validate an uploaded document's size against the configured ceiling.
pub fn validate_document_size(len: usize, max: usize) -> Result<()> {
    if len == 0 {
        return Err(Error::FieldRequired { field: "Document" });
    }
    if len > max {
        return Err(Error::DocumentTooLarge { actual: len, max });
    }
    Ok(())
}

/// Reduce a client-supplied file name to a safe final path component.
///
/// Directory parts are dropped and anything outside `[A-Za-z0-9._-]` becomes
/// `_`. An empty result falls back to `document`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_DOCUMENT_NAME_LENGTH)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Parse an optional `YYYY-MM-DD` issue date.
pub fn parse_issue_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(value.to_string()))
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
