// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP routes.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use memo_core::document::Upload;
use memo_core::memo::Submission;
use memo_core::validate::parse_issue_date;
use memo_core::Error as CoreError;

use crate::error::ApiError;
use crate::session::actor_from_headers;
use crate::state::AppState;

/// Room for the non-document multipart fields on top of the document ceiling.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Content type recorded when the client sends none.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_document_bytes().saturating_add(FORM_OVERHEAD_BYTES);
    Router::new()
        .route("/health", get(health))
        .route("/groups", get(groups))
        .route("/memos", post(submit_memo))
        .route("/memos/mine", get(my_memos))
        .route("/approvals/mine", get(my_approvals))
        .route("/approvals/:id/approve", post(approve))
        .route("/approvals/:id/decline", post(decline))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "memod",
    }))
}

async fn groups(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Value>, ApiError> {
    actor_from_headers(&headers, state.identity())?;
    let groups = state.list_groups().await?;
    Ok(Json(json!(groups)))
}

async fn submit_memo(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let actor = actor_from_headers(&headers, state.identity())?;
    let submission = read_submission(multipart).await?;
    let outcome = state
        .with_workflow(move |wf| wf.submit_memo(submission, &actor))
        .await?;

    let required_groups: Vec<&str> = outcome.hierarchy.iter().map(|g| g.group.as_str()).collect();
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Memo raised successfully",
            "memo_id": outcome.memo_id,
            "approvals_created": outcome.approvals_created(),
            "required_groups": required_groups,
            "hierarchy": outcome.hierarchy,
        })),
    ))
}

async fn my_memos(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Value>, ApiError> {
    let actor = actor_from_headers(&headers, state.identity())?;
    let memos = state
        .with_workflow(move |wf| wf.submitted_by(&actor.email))
        .await?;
    Ok(Json(json!(memos)))
}

async fn my_approvals(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let actor = actor_from_headers(&headers, state.identity())?;
    let groups = state.groups_for(&actor).await?;
    let approvals = state
        .with_workflow(move |wf| wf.list_actionable(&groups))
        .await?;
    Ok(Json(json!(approvals)))
}

fn path_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    let Path(id) = path.map_err(|e| ApiError::bad_request(e.body_text()))?;
    Ok(id)
}

async fn approve(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let approval_id = path_id(path)?;
    let actor = actor_from_headers(&headers, state.identity())?;
    let groups = state.groups_for(&actor).await?;
    let approved_by = actor.name.clone();
    let approval = state
        .with_workflow(move |wf| wf.approve(approval_id, &actor, &groups))
        .await?;
    Ok(Json(json!({
        "approval_id": approval.id,
        "status": approval.status,
        "approved_by": approved_by,
        "group": approval.required_group,
    })))
}

#[derive(Debug, Deserialize)]
struct DeclineRequest {
    #[serde(default)]
    comment: String,
}

async fn decline(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<DeclineRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let approval_id = path_id(path)?;
    let actor = actor_from_headers(&headers, state.identity())?;
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let groups = state.groups_for(&actor).await?;
    let declined_by = actor.name.clone();
    let committed = state
        .with_workflow(move |wf| wf.commit_decline(approval_id, &actor, &groups, &request.comment))
        .await?;
    let outcome = state.deliver_decline(committed).await?;
    Ok(Json(json!({
        "approval_id": outcome.approval.id,
        "status": outcome.approval.status,
        "declined_by": declined_by,
        "group": outcome.approval.required_group,
        "notification_sent": outcome.notification_sent,
    })))
}

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::Http {
        status: err.status(),
        code: "invalid_form",
        message: err.body_text(),
    }
}

/// Position of an `approvers` field: `approvers[2]` → `Some(Some(2))`,
/// `approvers[]` or `approvers` → `Some(None)`, anything else → `None`.
fn approver_slot(name: &str) -> Option<Option<usize>> {
    let rest = name.strip_prefix("approvers")?;
    if rest.is_empty() || rest == "[]" {
        return Some(None);
    }
    let index = rest.strip_prefix('[')?.strip_suffix(']')?;
    index.trim().parse().ok().map(Some)
}

async fn field_text(field: Field<'_>) -> Result<String, ApiError> {
    field.text().await.map_err(multipart_error)
}

/// Collect the submission form. Indexed approvers are ordered by index;
/// unindexed ones keep arrival order after them.
async fn read_submission(mut multipart: Multipart) -> Result<Submission, ApiError> {
    let mut description = String::new();
    let mut document: Option<Upload> = None;
    let mut approvers: Vec<(usize, String)> = Vec::new();
    let mut issued_on = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "description" => description = field_text(field).await?,
            "document" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                document = Some(Upload::new(file_name, content_type, bytes.to_vec()));
            }
            "issued_on" => {
                let value = field_text(field).await?;
                if !value.trim().is_empty() {
                    issued_on = Some(parse_issue_date(&value)?);
                }
            }
            other => match approver_slot(other) {
                Some(slot) => {
                    let group = field_text(field).await?;
                    approvers.push((slot.unwrap_or(usize::MAX), group));
                }
                None => tracing::debug!(field = other, "ignoring unknown form field"),
            },
        }
    }

    let document = document.ok_or(CoreError::FieldRequired { field: "Document" })?;
    approvers.sort_by_key(|(index, _)| *index);
    Ok(Submission {
        description,
        document,
        approvers: approvers.into_iter().map(|(_, group)| group).collect(),
        issued_on,
    })
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
