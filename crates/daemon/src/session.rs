// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Principal extraction from gateway-provided headers.
//!
//! memod sits behind an authenticating gateway that sets the signed-in
//! user's e-mail and display name on every request. Requests without an
//! e-mail are rejected before reaching the workflow.

use axum::http::HeaderMap;

use memo_core::identity::Actor;

use crate::config::IdentityConfig;
use crate::error::ApiError;

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Resolve the requesting principal.
pub fn actor_from_headers(headers: &HeaderMap, identity: &IdentityConfig) -> Result<Actor, ApiError> {
    let email = header_value(headers, &identity.email_header);
    let name = header_value(headers, &identity.name_header);
    Ok(Actor::from_session(name, email)?)
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
