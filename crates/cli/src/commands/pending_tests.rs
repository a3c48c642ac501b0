// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::{approval_id, finance_member, submit, text, workflow};
use memo_core::notify::RecordingSink;
use memo_core::{StaticDirectory, StaticGroup};

fn groups(names: &[&str]) -> Vec<String> {
    names.iter().map(|g| g.to_string()).collect()
}

#[test]
fn requires_some_group() {
    let sink = RecordingSink::new();
    let wf = workflow(&sink);
    let err = run_impl(wf.database(), &[], OutputFormat::Text, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, Error::NoGroups));
}

#[test]
fn lower_priority_group_waits() {
    let sink = RecordingSink::new();
    let mut wf = workflow(&sink);
    let memo_id = submit(&mut wf, "Budget", &["Finance", "Legal"]);

    let mut buf = Vec::new();
    run_impl(wf.database(), &groups(&["Legal"]), OutputFormat::Text, &mut buf).unwrap();
    assert_eq!(text(buf), "No actionable approvals\n");

    let finance = approval_id(&wf, memo_id, "Finance");
    let mut buf = Vec::new();
    run_impl(wf.database(), &groups(&["Finance"]), OutputFormat::Text, &mut buf).unwrap();
    assert!(text(buf).starts_with(&format!("#{finance} Finance (p1) memo #{memo_id}: Budget")));

    wf.approve(finance, &finance_member(), &groups(&["Finance"]))
        .unwrap();
    let mut buf = Vec::new();
    run_impl(wf.database(), &groups(&["Legal"]), OutputFormat::Json, &mut buf).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text(buf)).unwrap();
    assert_eq!(value[0]["required_group"], "Legal");
}

#[test]
fn resolve_groups_merges_directory_membership() {
    let directory = StaticDirectory::new(vec![
        StaticGroup::new("Finance", Some(1), &["fran@corp.example"]),
        StaticGroup::new("Legal", Some(2), &["fran@corp.example"]),
    ]);
    let resolved = resolve_groups(&directory, groups(&["Legal", "Board"]), "FRAN@corp.example").unwrap();
    assert_eq!(resolved, ["Legal", "Board", "Finance"]);
}
