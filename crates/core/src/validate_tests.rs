// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[test]
fn description_is_trimmed() {
    assert_eq!(validate_description("  Budget memo \n").unwrap(), "Budget memo");
}

#[test]
fn description_at_limit_is_accepted() {
    let text = "a".repeat(MAX_DESCRIPTION_LENGTH);
    assert_eq!(validate_description(&text).unwrap().len(), MAX_DESCRIPTION_LENGTH);
}

#[test]
fn description_over_limit_is_rejected() {
    let text = "a".repeat(MAX_DESCRIPTION_LENGTH + 1);
    let err = validate_description(&text).unwrap_err();
    assert!(matches!(
        err,
        Error::FieldTooLong {
            field: "Description",
            actual: 1001,
            max: 1000
        }
    ));
}

#[test]
fn description_limit_counts_characters_not_bytes() {
    let text = "é".repeat(MAX_DESCRIPTION_LENGTH);
    assert!(validate_description(&text).is_ok());
}

#[parameterized(
    empty = { "" },
    spaces = { "   " },
    newlines = { "\n\t" },
)]
fn blank_comment_is_rejected(comment: &str) {
    let err = validate_comment(comment).unwrap_err();
    assert!(matches!(err, Error::FieldRequired { field: "Comment" }));
}

#[test]
fn document_size_bounds() {
    assert!(matches!(
        validate_document_size(0, 10).unwrap_err(),
        Error::FieldRequired { field: "Document" }
    ));
    assert!(validate_document_size(10, 10).is_ok());
    assert!(matches!(
        validate_document_size(11, 10).unwrap_err(),
        Error::DocumentTooLarge { actual: 11, max: 10 }
    ));
}

#[parameterized(
    plain = { "budget.pdf", "budget.pdf" },
    spaces = { "Q3 budget.pdf", "Q3_budget.pdf" },
    unix_path = { "../../etc/passwd", "passwd" },
    windows_path = { "C:\\Users\\ada\\memo.docx", "memo.docx" },
    hidden = { ".env", "env" },
    empty = { "", "document" },
    only_dots = { "..", "document" },
)]
fn file_names_are_sanitized(input: &str, expected: &str) {
    assert_eq!(sanitize_file_name(input), expected);
}

#[test]
fn issue_date_parsing() {
    let date = parse_issue_date("2026-03-01").unwrap();
    assert_eq!(date.to_string(), "2026-03-01");
    assert!(matches!(
        parse_issue_date("03/01/2026").unwrap_err(),
        Error::InvalidDate(_)
    ));
}
