// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Group directory: who belongs to which approver group.
//!
//! The directory answers membership questions for the workflow and lists
//! the known groups for display. Priorities reported here only order that
//! listing; a memo's hierarchy always comes from submission order.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

use crate::error::{Error, Result};
use crate::graph::{GraphClient, GraphError};
use crate::identity::Actor;

/// Priority reported for groups with no configured rank.
pub const DEFAULT_GROUP_PRIORITY: u32 = 999;

/// A group as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub name: String,
    pub priority: u32,
}

/// Capability for resolving group membership.
pub trait GroupDirectory: Send + Sync {
    /// Names of the groups `actor` belongs to.
    fn groups_for(&self, actor: &Actor) -> Result<Vec<String>>;

    /// Configured rank for a group, if any.
    fn priority_of(&self, group: &str) -> Result<Option<u32>>;

    /// All known groups ordered by priority, then name.
    fn list_groups(&self) -> Result<Vec<GroupInfo>>;
}

fn sort_groups(groups: &mut [GroupInfo]) {
    groups.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.name.cmp(&b.name)));
}

/// A group entry in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticGroup {
    pub name: String,
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(default)]
    pub members: Vec<String>,
}

impl StaticGroup {
    pub fn new(name: impl Into<String>, priority: Option<u32>, members: &[&str]) -> Self {
        StaticGroup {
            name: name.into(),
            priority,
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Directory backed by a fixed table of groups and member e-mails.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    groups: Vec<StaticGroup>,
}

impl StaticDirectory {
    pub fn new(groups: Vec<StaticGroup>) -> Self {
        StaticDirectory { groups }
    }
}

impl GroupDirectory for StaticDirectory {
    fn groups_for(&self, actor: &Actor) -> Result<Vec<String>> {
        let email = actor.email.trim();
        Ok(self
            .groups
            .iter()
            .filter(|g| g.members.iter().any(|m| m.trim().eq_ignore_ascii_case(email)))
            .map(|g| g.name.clone())
            .collect())
    }

    fn priority_of(&self, group: &str) -> Result<Option<u32>> {
        Ok(self
            .groups
            .iter()
            .find(|g| g.name == group)
            .and_then(|g| g.priority))
    }

    fn list_groups(&self) -> Result<Vec<GroupInfo>> {
        let mut groups: Vec<GroupInfo> = self
            .groups
            .iter()
            .map(|g| GroupInfo {
                name: g.name.clone(),
                priority: g.priority.unwrap_or(DEFAULT_GROUP_PRIORITY),
            })
            .collect();
        sort_groups(&mut groups);
        Ok(groups)
    }
}

/// Directory backed by Microsoft Graph `memberOf`.
pub struct GraphDirectory {
    client: GraphClient,
    priorities: HashMap<String, u32>,
}

impl GraphDirectory {
    /// `priorities` is the configured ranking table; unranked groups report
    /// [`DEFAULT_GROUP_PRIORITY`].
    pub fn new(client: GraphClient, priorities: HashMap<String, u32>) -> Self {
        GraphDirectory { client, priorities }
    }
}

fn directory_error(err: GraphError) -> Error {
    Error::Directory(err.to_string())
}

/// Extract group display names and the next page link from a `memberOf` page.
pub(crate) fn parse_member_of_page(page: &Value) -> Result<(Vec<String>, Option<String>)> {
    let entries = page
        .get("value")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Directory("memberOf response has no 'value' array".to_string()))?;
    let names = entries
        .iter()
        .filter_map(|entry| entry.get("displayName").and_then(Value::as_str))
        .map(str::to_string)
        .collect();
    let next = page
        .get("@odata.nextLink")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok((names, next))
}

impl GroupDirectory for GraphDirectory {
    fn groups_for(&self, actor: &Actor) -> Result<Vec<String>> {
        let mut page = self
            .client
            .get(&["users", actor.email.trim(), "memberOf"])
            .map_err(directory_error)?;
        let mut names = BTreeSet::new();
        loop {
            let (batch, next) = parse_member_of_page(&page)?;
            names.extend(batch);
            match next {
                Some(url) => page = self.client.get_url(&url).map_err(directory_error)?,
                None => break,
            }
        }
        tracing::debug!(email = %actor.email, groups = names.len(), "resolved graph membership");
        Ok(names.into_iter().collect())
    }

    fn priority_of(&self, group: &str) -> Result<Option<u32>> {
        Ok(self.priorities.get(group).copied())
    }

    fn list_groups(&self) -> Result<Vec<GroupInfo>> {
        let mut groups: Vec<GroupInfo> = self
            .priorities
            .iter()
            .map(|(name, priority)| GroupInfo {
                name: name.clone(),
                priority: *priority,
            })
            .collect();
        sort_groups(&mut groups);
        Ok(groups)
    }
}

#[cfg(test)]
#[path = "directory_tests.rs"]
mod tests;
