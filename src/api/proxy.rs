// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pass-through to the booking backend.
//!
//! The request credential (cookie or bearer header) is forwarded as
//! `Authorization: Bearer`; the backend's JSON answer is returned verbatim.
//! Authorization decisions stay with the backend.

use axum::{
    extract::{Path, RawQuery, State},
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::auth::OptionalBearer;
use crate::error::ApiError;
use crate::state::AppState;

fn backend_path(path: &str, query: Option<&str>) -> Result<String, ApiError> {
    if path.split('/').any(|segment| segment == "..") {
        return Err(ApiError::bad_request("path must not contain '..' segments"));
    }
    // The path arrives percent-decoded; these would change the backend URL's shape.
    if path.contains(['?', '#']) {
        return Err(ApiError::bad_request("path must not contain '?' or '#'"));
    }

    let mut target = format!("/{}", path.trim_start_matches('/'));
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        target.push('?');
        target.push_str(query);
    }
    Ok(target)
}

#[utoipa::path(
    get,
    path = "/api/proxy/{path}",
    tag = "Proxy",
    params(("path" = String, Path, description = "Backend path below the API root")),
    responses(
        (status = 200, description = "Backend JSON response"),
        (status = 400, description = "Invalid path"),
        (status = 502, description = "Booking backend unavailable")
    )
)]
pub async fn forward_get(
    State(state): State<AppState>,
    OptionalBearer(credential): OptionalBearer,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, ApiError> {
    let target = backend_path(&path, query.as_deref())?;
    debug!(%target, authenticated = credential.is_some(), "proxy GET");

    let body = state.backend.get_json(&target, credential.as_ref()).await?;
    Ok(Json(body))
}

#[utoipa::path(
    post,
    path = "/api/proxy/{path}",
    tag = "Proxy",
    params(("path" = String, Path, description = "Backend path below the API root")),
    responses(
        (status = 200, description = "Backend JSON response"),
        (status = 400, description = "Invalid path"),
        (status = 502, description = "Booking backend unavailable")
    )
)]
pub async fn forward_post(
    State(state): State<AppState>,
    OptionalBearer(credential): OptionalBearer,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let target = backend_path(&path, query.as_deref())?;
    debug!(%target, authenticated = credential.is_some(), "proxy POST");

    let body = state.backend.post_json(&target, credential.as_ref(), &payload).await?;
    Ok(Json(body))
}
