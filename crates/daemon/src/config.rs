// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Service configuration.
//!
//! Configuration is read from a TOML file (default
//! `$XDG_STATE_HOME/memod/config.toml`, overridable with `--config` or
//! `MEMOD_CONFIG`). Every field has a default, so an absent default file is
//! not an error. Relative paths are resolved against the file's directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use memo_core::directory::{GraphDirectory, GroupDirectory, StaticDirectory, StaticGroup};
use memo_core::graph::{GraphClient, StaticToken, DEFAULT_GRAPH_ENDPOINT};
use memo_core::notify::{DisabledSink, GraphMailSink, NotificationSink};
use memo_core::validate::DEFAULT_MAX_DOCUMENT_BYTES;
use memo_core::workflow::WorkflowConfig;

use crate::env;
use crate::error::ConfigError;

const STATE_DIR_NAME: &str = "memod";
const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "memo.db";
pub const DOCUMENTS_DIR_NAME: &str = "documents";

/// Directory holding the default config, database and documents.
pub fn state_dir() -> PathBuf {
    if let Some(dir) = env::xdg_state_home() {
        return dir.join(STATE_DIR_NAME);
    }
    if let Some(dir) = dirs::state_dir() {
        return dir.join(STATE_DIR_NAME);
    }
    dirs::home_dir()
        .map(|h| h.join(".local/state").join(STATE_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".memod"))
}

/// Config path from `MEMOD_CONFIG`, else the state directory default.
pub fn default_config_path() -> PathBuf {
    env::config_path().unwrap_or_else(|| state_dir().join(CONFIG_FILE_NAME))
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_database() -> PathBuf {
    state_dir().join(DB_FILE_NAME)
}

fn default_documents_dir() -> PathBuf {
    state_dir().join(DOCUMENTS_DIR_NAME)
}

fn default_max_document_bytes() -> usize {
    DEFAULT_MAX_DOCUMENT_BYTES
}

fn default_graph_endpoint() -> String {
    DEFAULT_GRAPH_ENDPOINT.to_string()
}

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to.
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
    /// SQLite database file.
    #[serde(default = "default_database")]
    pub database: PathBuf,
    /// Root of the document store.
    #[serde(default = "default_documents_dir")]
    pub documents_dir: PathBuf,
    /// Largest accepted memo document, in bytes.
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
    /// Log file; logs go to stderr when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen: default_listen(),
            database: default_database(),
            documents_dir: default_documents_dir(),
            max_document_bytes: default_max_document_bytes(),
            log_file: None,
            identity: IdentityConfig::default(),
            directory: DirectoryConfig::default(),
            notifier: NotifierConfig::default(),
        }
    }
}

/// Headers set by the authenticating gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_email_header")]
    pub email_header: String,
    #[serde(default = "default_name_header")]
    pub name_header: String,
}

fn default_email_header() -> String {
    "x-portal-user-email".to_string()
}

fn default_name_header() -> String {
    "x-portal-user-name".to_string()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        IdentityConfig {
            email_header: default_email_header(),
            name_header: default_name_header(),
        }
    }
}

/// Where group membership comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryKind {
    #[default]
    Static,
    Graph,
}

/// Group directory settings.
///
/// With `kind = "graph"`, `groups` only supplies the priority ranking used
/// for listings; membership comes from Graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub kind: DirectoryKind,
    #[serde(default)]
    pub groups: Vec<StaticGroup>,
    #[serde(default = "default_graph_endpoint")]
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Name of an environment variable holding the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        DirectoryConfig {
            kind: DirectoryKind::default(),
            groups: Vec::new(),
            endpoint: default_graph_endpoint(),
            token: None,
            token_env: None,
        }
    }
}

/// How decline notifications are delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifierKind {
    #[default]
    Disabled,
    Graph,
}

fn default_sender_name() -> String {
    "Memo Approval System".to_string()
}

/// Notification sink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    #[serde(default)]
    pub kind: NotifierKind,
    #[serde(default)]
    pub sender_address: String,
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
    #[serde(default = "default_graph_endpoint")]
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        NotifierConfig {
            kind: NotifierKind::default(),
            sender_address: String::new(),
            sender_name: default_sender_name(),
            endpoint: default_graph_endpoint(),
            token: None,
            token_env: None,
        }
    }
}

/// Token from the literal value, else from the named environment variable.
fn resolve_token(
    section: &str,
    token: Option<&str>,
    token_env: Option<&str>,
) -> Result<String, ConfigError> {
    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        return Ok(token.to_string());
    }
    if let Some(var) = token_env {
        return std::env::var(var).map_err(|_| {
            ConfigError::Invalid(format!(
                "[{section}] token_env names '{var}', which is not set"
            ))
        });
    }
    Err(ConfigError::Invalid(format!(
        "[{section}] kind = \"graph\" requires token or token_env"
    )))
}

impl Config {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        config.validate()?;
        Ok(config)
    }

    /// Load `explicit` if given (it must exist), else the default path if it
    /// exists, else built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Config::default())
        }
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.database);
        resolve(&mut self.documents_dir);
        if let Some(log_file) = self.log_file.as_mut() {
            resolve(log_file);
        }
    }

    /// Check cross-field requirements that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_document_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_document_bytes must be greater than zero".to_string(),
            ));
        }
        if self.identity.email_header.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "[identity] email_header must not be empty".to_string(),
            ));
        }
        if self.notifier.kind == NotifierKind::Graph && self.notifier.sender_address.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "[notifier] kind = \"graph\" requires sender_address".to_string(),
            ));
        }
        Ok(())
    }

    pub fn workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            max_document_bytes: self.max_document_bytes,
        }
    }

    /// Build the configured group directory.
    pub fn group_directory(&self) -> Result<Arc<dyn GroupDirectory>, ConfigError> {
        let dir = &self.directory;
        match dir.kind {
            DirectoryKind::Static => Ok(Arc::new(StaticDirectory::new(dir.groups.clone()))),
            DirectoryKind::Graph => {
                let token = resolve_token("directory", dir.token.as_deref(), dir.token_env.as_deref())?;
                let client = GraphClient::new(&dir.endpoint, Box::new(StaticToken::new(token)))
                    .map_err(|e| ConfigError::Invalid(format!("[directory] {e}")))?;
                let ranks: HashMap<String, u32> = dir
                    .groups
                    .iter()
                    .filter_map(|g| g.priority.map(|p| (g.name.clone(), p)))
                    .collect();
                Ok(Arc::new(GraphDirectory::new(client, ranks)))
            }
        }
    }

    /// Build the configured notification sink.
    pub fn notification_sink(&self) -> Result<Box<dyn NotificationSink>, ConfigError> {
        let notifier = &self.notifier;
        match notifier.kind {
            NotifierKind::Disabled => Ok(Box::new(DisabledSink)),
            NotifierKind::Graph => {
                let token = resolve_token(
                    "notifier",
                    notifier.token.as_deref(),
                    notifier.token_env.as_deref(),
                )?;
                let client = GraphClient::new(&notifier.endpoint, Box::new(StaticToken::new(token)))
                    .map_err(|e| ConfigError::Invalid(format!("[notifier] {e}")))?;
                Ok(Box::new(GraphMailSink::new(
                    client,
                    notifier.sender_address.clone(),
                    notifier.sender_name.clone(),
                )))
            }
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
