// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use axum::http::{HeaderValue, StatusCode};
use memo_core::identity::UNKNOWN_USER;

fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in pairs {
        map.insert(*name, HeaderValue::from_str(value).unwrap());
    }
    map
}

#[test]
fn reads_default_headers() {
    let map = headers(&[
        ("x-portal-user-email", "ada@corp.example"),
        ("x-portal-user-name", "Ada"),
    ]);
    let actor = actor_from_headers(&map, &IdentityConfig::default()).unwrap();
    assert_eq!(actor, Actor::new("Ada", "ada@corp.example"));
}

#[test]
fn missing_name_falls_back() {
    let map = headers(&[("x-portal-user-email", "ada@corp.example")]);
    let actor = actor_from_headers(&map, &IdentityConfig::default()).unwrap();
    assert_eq!(actor.name, UNKNOWN_USER);
}

#[test]
fn missing_email_is_unauthorized() {
    let map = headers(&[("x-portal-user-name", "Ada")]);
    let err = actor_from_headers(&map, &IdentityConfig::default()).unwrap_err();
    assert_eq!(err.status_and_code().0, StatusCode::UNAUTHORIZED);
}

#[test]
fn custom_header_names() {
    let identity = IdentityConfig {
        email_header: "x-user".to_string(),
        name_header: "x-display".to_string(),
    };
    let map = headers(&[("x-user", "lee@corp.example"), ("x-display", "Lee")]);
    let actor = actor_from_headers(&map, &identity).unwrap();
    assert_eq!(actor.email, "lee@corp.example");
}
