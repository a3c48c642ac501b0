// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Verified principal identity.
//!
//! An [`Actor`] is whoever the upstream session says is making the request:
//! the submitter of a memo, or the group member approving or declining one.
//! The workflow never looks identities up on its own; callers pass them in.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Display name used when the session carries no name for the principal.
pub const UNKNOWN_USER: &str = "Unknown User";

/// An authenticated principal (display name + e-mail).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Display name shown in notifications and audit fields.
    pub name: String,
    /// E-mail address; the principal's stable identifier.
    pub email: String,
}

impl Actor {
    /// Build an actor from session-provided values.
    ///
    /// A blank e-mail means there is no verified principal and yields
    /// [`Error::AuthenticationRequired`]. A blank name falls back to
    /// [`UNKNOWN_USER`].
    pub fn from_session(name: Option<&str>, email: Option<&str>) -> Result<Self> {
        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(Error::AuthenticationRequired)?;
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(UNKNOWN_USER);
        Ok(Actor {
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    /// Construct an actor directly (tests and trusted callers).
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Actor {
            name: name.into(),
            email: email.into(),
        }
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
