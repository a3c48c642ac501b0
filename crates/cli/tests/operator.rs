// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end checks for the `memo` operator binary.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use memo_core::document::{FsDocumentStore, Upload};
use memo_core::notify::RecordingSink;
use memo_core::workflow::WorkflowConfig;
use memo_core::{Actor, Database, Submission, Workflow};

const CONFIG: &str = r#"
database = "memo.db"
documents_dir = "documents"

[[directory.groups]]
name = "Finance"
priority = 1
members = ["fran@corp.example"]

[[directory.groups]]
name = "Legal"
priority = 2
members = ["lee@corp.example"]
"#;

fn memo(temp: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("memo");
    cmd.env("XDG_STATE_HOME", temp.path().join("state"))
        .env_remove("MEMOD_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config_path(temp));
    cmd
}

fn config_path(temp: &TempDir) -> PathBuf {
    temp.path().join("config.toml")
}

fn write_config(temp: &TempDir) {
    fs::write(config_path(temp), CONFIG).unwrap();
}

/// Submit a Finance → Legal memo and decline Finance while delivery fails.
fn seed_declined_memo(temp: &TempDir) -> i64 {
    let sink = RecordingSink::new();
    let mut workflow = Workflow::new(
        Database::open(&temp.path().join("memo.db")).unwrap(),
        Box::new(FsDocumentStore::open(temp.path().join("documents")).unwrap()),
        Box::new(sink.clone()),
        WorkflowConfig::default(),
    );
    let submission = Submission {
        description: "Quarterly budget".to_string(),
        document: Upload::new("budget.pdf", "application/pdf", b"%PDF-1.4".to_vec()),
        approvers: vec!["Finance".to_string(), "Legal".to_string()],
        issued_on: None,
    };
    let submitter = Actor::new("Sam", "sam@corp.example");
    let memo_id = workflow.submit_memo(submission, &submitter).unwrap().memo_id;

    let finance = workflow.list_actionable(&["Finance".to_string()]).unwrap()[0].approval_id;
    sink.set_failing(true);
    workflow
        .decline(
            finance,
            &Actor::new("Fran", "fran@corp.example"),
            &["Finance".to_string()],
            "Figures do not add up",
        )
        .unwrap();
    memo_id
}

#[test]
fn init_writes_config_and_database() {
    let temp = TempDir::new().unwrap();
    memo(&temp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));
    assert!(temp.path().join("memo.db").exists());

    memo(&temp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Using existing config"));
}

#[test]
fn groups_lists_configured_directory() {
    let temp = TempDir::new().unwrap();
    write_config(&temp);
    memo(&temp)
        .arg("groups")
        .assert()
        .success()
        .stdout(predicate::str::diff("   1  Finance\n   2  Legal\n"));
}

#[test]
fn show_unknown_memo_fails() {
    let temp = TempDir::new().unwrap();
    write_config(&temp);
    memo(&temp)
        .args(["show", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: memo not found: 1"));
}

#[test]
fn show_prints_hierarchy() {
    let temp = TempDir::new().unwrap();
    write_config(&temp);
    let memo_id = seed_declined_memo(&temp);

    memo(&temp)
        .args(["show", &memo_id.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Memo #1: Quarterly budget"))
        .stdout(predicate::str::contains(
            "1. Finance [declined] by Fran",
        ))
        .stdout(predicate::str::contains("\"Figures do not add up\""))
        .stdout(predicate::str::contains("2. Legal [pending]"));
}

#[test]
fn pending_for_user_after_decline() {
    let temp = TempDir::new().unwrap();
    write_config(&temp);
    seed_declined_memo(&temp);

    memo(&temp)
        .args(["pending", "--user", "lee@corp.example"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Legal (p2) memo #1: Quarterly budget"));

    memo(&temp)
        .args(["pending", "-g", "Finance"])
        .assert()
        .success()
        .stdout(predicate::str::diff("No actionable approvals\n"));
}

#[test]
fn pending_without_groups_fails() {
    let temp = TempDir::new().unwrap();
    write_config(&temp);
    memo(&temp)
        .arg("pending")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no groups given"));
}

#[test]
fn outbox_list_and_retry() {
    let temp = TempDir::new().unwrap();
    write_config(&temp);
    seed_declined_memo(&temp);

    memo(&temp)
        .args(["outbox", "list", "--status", "failed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[failed] approval #1 to sam@corp.example"));

    // The default notifier is disabled, so redelivery fails again.
    memo(&temp)
        .args(["outbox", "retry"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(attempts: 2)"))
        .stdout(predicate::str::contains("0 sent, 1 failed"));

    memo(&temp)
        .args(["outbox", "list", "--status", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid delivery status"));
}
