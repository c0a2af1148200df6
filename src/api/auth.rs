// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session endpoints used by the front-end.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;
use tracing::{debug, warn};
use utoipa::IntoParams;

use crate::auth::{AuthError, Bearer, OptionalBearer, RoleRequirement, SessionUser};
use crate::backend::SessionBackend;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SessionQuery {
    /// Comma-separated roles the session must hold one of (e.g. `ADMIN,EMPLOYEE`)
    pub role: Option<String>,
}

/// Current session for the request credential.
///
/// The credential is validated by the booking backend; only active accounts
/// get their profile back. With `role`, the session role must also be listed.
#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = "Auth",
    params(SessionQuery),
    responses(
        (status = 200, description = "Active session", body = SessionUser),
        (status = 401, description = "Missing or rejected credential"),
        (status = 400, description = "Unknown role in requirement"),
        (status = 403, description = "Account is not active or role not allowed"),
        (status = 502, description = "Booking backend unavailable")
    )
)]
pub async fn session(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    Bearer(credential): Bearer,
) -> Result<Json<SessionUser>, Response> {
    let requirement = query
        .role
        .as_deref()
        .map(RoleRequirement::parse)
        .transpose()
        .map_err(|e| ApiError::bad_request(e.to_string()).into_response())?;

    let user = state
        .backend
        .fetch_session(credential.as_str())
        .await
        .map_err(|e| AuthError::from(e).into_response())?;

    if !user.is_active() {
        debug!(user_id = %user.id, status = ?user.status, "session lookup for inactive account");
        return Err(AuthError::InactiveAccount.into_response());
    }
    if let Some(requirement) = requirement {
        if !requirement.admits(user.role) {
            debug!(user_id = %user.id, role = %user.role, "session role not allowed");
            return Err(AuthError::InsufficientPermissions.into_response());
        }
    }

    Ok(Json(user))
}

/// End the session: best-effort backend logout, then expire the cookie.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 204, description = "Session cookie cleared")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    OptionalBearer(credential): OptionalBearer,
) -> impl IntoResponse {
    if let Some(credential) = credential {
        if let Err(err) = state.backend.logout(credential.as_str()).await {
            warn!(error = %err, "backend logout failed; clearing cookie anyway");
        }
    }

    let cookie = Cookie::build((state.config.access_token_cookie.clone(), ""))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(state.config.tls.is_some())
        .max_age(Duration::ZERO);

    (CookieJar::new().add(cookie), StatusCode::NO_CONTENT)
}
