// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the HTTP service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::path::PathBuf;
use thiserror::Error;

use memo_core::Error as CoreError;

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// An error returned from a handler, rendered as `{"error": code, "message": text}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::Http {
            status: StatusCode::BAD_REQUEST,
            code: "validation_failed",
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Http {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal_error",
            message: message.into(),
        }
    }

    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Http { status, code, .. } => (*status, *code),
            ApiError::Core(err) => core_status(err),
        }
    }
}

fn core_status(err: &CoreError) -> (StatusCode, &'static str) {
    match err {
        CoreError::FieldRequired { .. }
        | CoreError::FieldTooLong { .. }
        | CoreError::InvalidDate(_)
        | CoreError::InvalidStatus(_)
        | CoreError::InvalidDeliveryStatus(_) => (StatusCode::BAD_REQUEST, "validation_failed"),
        CoreError::DocumentTooLarge { .. } => (StatusCode::BAD_REQUEST, "document_too_large"),
        CoreError::AuthenticationRequired => (StatusCode::UNAUTHORIZED, "authentication_required"),
        CoreError::NotAuthorized { .. } => (StatusCode::FORBIDDEN, "not_authorized"),
        CoreError::HierarchyBlocked { .. } => (StatusCode::CONFLICT, "hierarchy_blocked"),
        CoreError::AlreadyResolved { .. } => (StatusCode::CONFLICT, "already_resolved"),
        CoreError::ApprovalNotFound(_)
        | CoreError::MemoNotFound(_)
        | CoreError::NotificationNotFound(_)
        | CoreError::DocumentNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        CoreError::Directory(_) | CoreError::Notification(_) => {
            (StatusCode::BAD_GATEWAY, "upstream_unavailable")
        }
        CoreError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        CoreError::Database(_)
        | CoreError::Io(_)
        | CoreError::Json(_)
        | CoreError::CorruptedData(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    }
}

/// First line of an error message; the `hint:` lines are for terminals.
fn headline(message: &str) -> &str {
    message.lines().next().unwrap_or_default()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(code, error = %message, "request failed");
        }
        let mut body = serde_json::json!({
            "error": code,
            "message": headline(&message),
        });
        if let ApiError::Core(CoreError::HierarchyBlocked { blocking, .. }) = &self {
            body["blocking_groups"] = serde_json::json!(blocking);
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
