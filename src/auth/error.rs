// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors for the gateway API surface.
//!
//! Page navigation never surfaces these: the guards redirect silently.
//! Only `/api` handlers turn them into JSON responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::backend::BackendError;

/// Authentication error type.
#[derive(Debug)]
pub enum AuthError {
    /// No credential cookie or authorization header present
    MissingCredential,
    /// Authorization header present but not `Bearer <token>`
    InvalidAuthHeader,
    /// Backend rejected the credential (invalid or expired session)
    SessionRejected,
    /// Session is valid but the account is pending or deactivated
    InactiveAccount,
    /// Session role does not satisfy the requirement
    InsufficientPermissions,
    /// Backend could not be reached or answered unexpectedly
    BackendUnavailable(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing_credential",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::SessionRejected => "session_rejected",
            AuthError::InactiveAccount => "inactive_account",
            AuthError::InsufficientPermissions => "insufficient_permissions",
            AuthError::BackendUnavailable(_) => "backend_unavailable",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredential
            | AuthError::InvalidAuthHeader
            | AuthError::SessionRejected => StatusCode::UNAUTHORIZED,
            AuthError::InactiveAccount | AuthError::InsufficientPermissions => {
                StatusCode::FORBIDDEN
            }
            AuthError::BackendUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingCredential => write!(f, "Authentication is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::SessionRejected => write!(f, "Session is invalid or has expired"),
            AuthError::InactiveAccount => write!(f, "Account is not active"),
            AuthError::InsufficientPermissions => {
                write!(f, "Insufficient permissions for this operation")
            }
            AuthError::BackendUnavailable(msg) => write!(f, "Booking backend unavailable: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<BackendError> for AuthError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unauthorized => AuthError::SessionRejected,
            other => AuthError::BackendUnavailable(other.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn missing_credential_returns_401() {
        let response = AuthError::MissingCredential.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "missing_credential");
    }

    #[tokio::test]
    async fn inactive_account_returns_403() {
        let response = AuthError::InactiveAccount.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn backend_unauthorized_maps_to_session_rejected() {
        let err: AuthError = BackendError::Unauthorized.into();
        assert_eq!(err.error_code(), "session_rejected");

        let err: AuthError = BackendError::Status(500).into();
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
