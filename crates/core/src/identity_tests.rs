// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[test]
fn from_session_trims_values() {
    let actor = Actor::from_session(Some("  Ada Lovelace "), Some(" ada@corp.test ")).unwrap();
    assert_eq!(actor.name, "Ada Lovelace");
    assert_eq!(actor.email, "ada@corp.test");
}

#[parameterized(
    missing = { None },
    empty = { Some("") },
    whitespace = { Some("   ") },
)]
fn from_session_without_email_requires_authentication(email: Option<&str>) {
    let err = Actor::from_session(Some("Ada"), email).unwrap_err();
    assert!(matches!(err, Error::AuthenticationRequired));
}

#[parameterized(
    missing = { None },
    blank = { Some("  ") },
)]
fn from_session_defaults_unknown_name(name: Option<&str>) {
    let actor = Actor::from_session(name, Some("ada@corp.test")).unwrap();
    assert_eq!(actor.name, UNKNOWN_USER);
}
