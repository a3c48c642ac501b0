// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal Microsoft Graph HTTP client shared by the directory and mail
//! adapters.
//!
//! Token acquisition is not handled here: a [`TokenSource`] supplies a bearer
//! token that some other component has already obtained.

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default Graph API base URL.
pub const DEFAULT_GRAPH_ENDPOINT: &str = "https://graph.microsoft.com/v1.0";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Failures talking to Graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("invalid graph endpoint {endpoint}: {reason}")]
    Endpoint { endpoint: String, reason: String },

    #[error("no access token available: {0}")]
    Token(String),

    #[error("graph returned http {code}: {body}")]
    Status { code: u16, body: String },

    #[error("graph transport error: {0}")]
    Transport(String),

    #[error("unexpected graph response: {0}")]
    Decode(String),
}

/// Supplies bearer tokens for Graph requests.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Result<String, GraphError>;
}

/// A fixed token read from configuration.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        StaticToken(token.into())
    }
}

impl TokenSource for StaticToken {
    fn token(&self) -> Result<String, GraphError> {
        if self.0.trim().is_empty() {
            return Err(GraphError::Token("configured token is empty".to_string()));
        }
        Ok(self.0.clone())
    }
}

/// Blocking Graph client.
pub struct GraphClient {
    agent: ureq::Agent,
    endpoint: Url,
    tokens: Box<dyn TokenSource>,
}

impl GraphClient {
    /// Fails when `endpoint` is not an absolute base URL.
    pub fn new(endpoint: &str, tokens: Box<dyn TokenSource>) -> Result<Self, GraphError> {
        let invalid = |reason: String| GraphError::Endpoint {
            endpoint: endpoint.to_string(),
            reason,
        };
        let endpoint = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        if endpoint.cannot_be_a_base() {
            return Err(invalid("not a base url".to_string()));
        }
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(REQUEST_TIMEOUT)
            .timeout_write(REQUEST_TIMEOUT)
            .build();
        Ok(GraphClient {
            agent,
            endpoint,
            tokens,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Absolute URL for an API path; each segment is percent-encoded, so an
    /// e-mail address can be passed as is.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.endpoint.clone();
        // Base-ness is checked in `new`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET an absolute URL (used to follow `@odata.nextLink`).
    pub fn get_url(&self, url: &str) -> Result<Value, GraphError> {
        let token = self.tokens.token()?;
        let response = self
            .agent
            .get(url)
            .set("authorization", &format!("Bearer {token}"))
            .set("accept", "application/json")
            .call()
            .map_err(map_ureq_error)?;
        response
            .into_json::<Value>()
            .map_err(|e| GraphError::Decode(e.to_string()))
    }

    /// GET an API path relative to the endpoint.
    pub fn get(&self, segments: &[&str]) -> Result<Value, GraphError> {
        self.get_url(self.url(segments).as_str())
    }

    /// POST a JSON body to an API path, ignoring any response body.
    pub fn post(&self, segments: &[&str], body: &Value) -> Result<(), GraphError> {
        let token = self.tokens.token()?;
        self.agent
            .post(self.url(segments).as_str())
            .set("authorization", &format!("Bearer {token}"))
            .set("content-type", "application/json")
            .send_json(body)
            .map_err(map_ureq_error)?;
        Ok(())
    }
}

fn map_ureq_error(err: ureq::Error) -> GraphError {
    match err {
        ureq::Error::Status(code, response) => GraphError::Status {
            code,
            body: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(transport) => GraphError::Transport(transport.to_string()),
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
