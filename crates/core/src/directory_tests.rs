// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::graph::StaticToken;
use serde_json::json;

fn directory() -> StaticDirectory {
    StaticDirectory::new(vec![
        StaticGroup::new("Legal", Some(2), &["lee@corp.example"]),
        StaticGroup::new("Finance", Some(1), &["fay@corp.example", "Lee@Corp.Example"]),
        StaticGroup::new("Facilities", None, &[]),
    ])
}

#[test]
fn membership_matches_email_case_insensitively() {
    let groups = directory()
        .groups_for(&Actor::new("Lee", "LEE@corp.example"))
        .unwrap();
    assert_eq!(groups, vec!["Legal".to_string(), "Finance".to_string()]);
}

#[test]
fn unknown_actor_has_no_groups() {
    let groups = directory()
        .groups_for(&Actor::new("Zed", "zed@corp.example"))
        .unwrap();
    assert!(groups.is_empty());
}

#[test]
fn priority_lookup() {
    let dir = directory();
    assert_eq!(dir.priority_of("Finance").unwrap(), Some(1));
    assert_eq!(dir.priority_of("Facilities").unwrap(), None);
    assert_eq!(dir.priority_of("Nope").unwrap(), None);
}

#[test]
fn listing_is_sorted_with_default_priority_last() {
    let listed = directory().list_groups().unwrap();
    let pairs: Vec<(&str, u32)> = listed.iter().map(|g| (g.name.as_str(), g.priority)).collect();
    assert_eq!(
        pairs,
        vec![("Finance", 1), ("Legal", 2), ("Facilities", DEFAULT_GROUP_PRIORITY)]
    );
}

#[test]
fn static_groups_deserialize_from_toml_shape() {
    let group: StaticGroup =
        serde_json::from_value(json!({"name": "HR", "members": ["h@corp.example"]})).unwrap();
    assert_eq!(group.priority, None);
    assert_eq!(group.members.len(), 1);
}

#[test]
fn member_of_page_parsing() {
    let page = json!({
        "value": [
            {"@odata.type": "#microsoft.graph.group", "displayName": "Finance"},
            {"@odata.type": "#microsoft.graph.directoryRole"},
            {"displayName": "Legal"}
        ],
        "@odata.nextLink": "https://graph.example/next"
    });
    let (names, next) = parse_member_of_page(&page).unwrap();
    assert_eq!(names, vec!["Finance".to_string(), "Legal".to_string()]);
    assert_eq!(next.as_deref(), Some("https://graph.example/next"));
}

#[test]
fn malformed_member_of_page_is_a_directory_error() {
    let err = parse_member_of_page(&json!({"error": "nope"})).unwrap_err();
    assert!(matches!(err, Error::Directory(_)));
}

#[test]
fn graph_directory_reports_configured_ranks() {
    let client = GraphClient::new("http://127.0.0.1:1", Box::new(StaticToken::new("t"))).unwrap();
    let mut ranks = HashMap::new();
    ranks.insert("Legal".to_string(), 2);
    ranks.insert("Finance".to_string(), 1);
    let dir = GraphDirectory::new(client, ranks);

    assert_eq!(dir.priority_of("Legal").unwrap(), Some(2));
    assert_eq!(dir.priority_of("HR").unwrap(), None);
    let names: Vec<String> = dir.list_groups().unwrap().into_iter().map(|g| g.name).collect();
    assert_eq!(names, vec!["Finance".to_string(), "Legal".to_string()]);
}

#[test]
fn graph_directory_surfaces_transport_failures() {
    let client = GraphClient::new("http://127.0.0.1:1", Box::new(StaticToken::new("t"))).unwrap();
    let dir = GraphDirectory::new(client, HashMap::new());
    let err = dir.groups_for(&Actor::new("A", "a@corp.example")).unwrap_err();
    assert!(matches!(err, Error::Directory(_)));
}
