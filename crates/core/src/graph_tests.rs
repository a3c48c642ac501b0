// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

fn client(endpoint: &str, token: &str) -> GraphClient {
    GraphClient::new(endpoint, Box::new(StaticToken::new(token))).unwrap()
}

#[parameterized(
    trailing_slash = { "https://graph.example/v1.0/" },
    bare = { "https://graph.example/v1.0" },
)]
fn url_joins_endpoint_and_segments(endpoint: &str) {
    let client = client(endpoint, "t");
    assert_eq!(
        client.url(&["users", "a", "memberOf"]).as_str(),
        "https://graph.example/v1.0/users/a/memberOf"
    );
    assert_eq!(client.url(&["me"]).as_str(), "https://graph.example/v1.0/me");
}

#[test]
fn host_only_endpoint_gets_a_single_slash() {
    let client = client("http://127.0.0.1:8080", "t");
    assert_eq!(client.url(&["me"]).as_str(), "http://127.0.0.1:8080/me");
}

#[parameterized(
    plain = { "ada@corp.example", "ada@corp.example" },
    plus = { "ada+memo@corp.example", "ada+memo@corp.example" },
    space = { "a b", "a%20b" },
    slash = { "a/b", "a%2Fb" },
    query = { "a?b#c", "a%3Fb%23c" },
    percent = { "100%", "100%25" },
)]
fn user_segment_is_percent_encoded(user: &str, expected: &str) {
    let url = client("https://graph.example/v1.0", "t").url(&["users", user, "sendMail"]);
    assert_eq!(
        url.as_str(),
        format!("https://graph.example/v1.0/users/{expected}/sendMail")
    );
    assert_eq!(url.path_segments().unwrap().count(), 4);
}

#[parameterized(
    relative = { "graph.example/v1.0" },
    not_a_base = { "mailto:graph@corp.example" },
    empty = { "" },
)]
fn invalid_endpoint_is_rejected(endpoint: &str) {
    let err = GraphClient::new(endpoint, Box::new(StaticToken::new("t")))
        .err()
        .unwrap();
    assert!(matches!(err, GraphError::Endpoint { .. }));
}

#[test]
fn empty_static_token_is_rejected() {
    assert!(matches!(
        StaticToken::new("  ").token().unwrap_err(),
        GraphError::Token(_)
    ));
    assert_eq!(StaticToken::new("abc").token().unwrap(), "abc");
}

#[test]
fn missing_token_fails_before_any_request() {
    let client = client("http://127.0.0.1:1", "");
    assert!(matches!(client.get(&["me"]).unwrap_err(), GraphError::Token(_)));
}

#[test]
fn unreachable_endpoint_is_a_transport_error() {
    let client = client("http://127.0.0.1:1", "t");
    assert!(matches!(
        client
            .post(&["users", "x", "sendMail"], &serde_json::json!({}))
            .unwrap_err(),
        GraphError::Transport(_)
    ));
}
