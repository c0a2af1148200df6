// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP client for the booking backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use super::{BackendError, SessionBackend, TokenPair};
use crate::auth::{Credential, SessionUser};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const ME_PATH: &str = "/auth/me";
const REFRESH_PATH: &str = "/auth/refresh-token";
const LOGOUT_PATH: &str = "/auth/logout";
const HEALTH_PATH: &str = "/health";

/// Booking backend client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: Client,
}

impl BackendClient {
    /// Create a client for the backend rooted at `base_url`
    /// (e.g. `https://api.example.com/api`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// `GET` an opaque JSON resource.
    pub async fn get_json(
        &self,
        path: &str,
        credential: Option<&Credential>,
    ) -> Result<Value, BackendError> {
        let mut request = self.http.get(self.url(path));
        if let Some(credential) = credential {
            request = request.bearer_auth(credential.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Request(format!("GET {path} failed: {e}")))?;

        read_json(response, "GET", path).await
    }

    /// `POST` a JSON body and return the JSON answer.
    pub async fn post_json(
        &self,
        path: &str,
        credential: Option<&Credential>,
        body: &Value,
    ) -> Result<Value, BackendError> {
        let mut request = self.http.post(self.url(path)).json(body);
        if let Some(credential) = credential {
            request = request.bearer_auth(credential.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Request(format!("POST {path} failed: {e}")))?;

        read_json(response, "POST", path).await
    }

    /// Check that the backend answers at all.
    ///
    /// Any response below 500 counts as reachable.
    pub async fn ping(&self) -> Result<(), BackendError> {
        let response = self
            .http
            .get(self.url(HEALTH_PATH))
            .send()
            .await
            .map_err(|e| BackendError::Request(format!("GET {HEALTH_PATH} failed: {e}")))?;

        if response.status().is_server_error() {
            return Err(BackendError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionBackend for BackendClient {
    async fn fetch_session(&self, access_token: &str) -> Result<SessionUser, BackendError> {
        let credential = Credential::new(access_token).ok_or(BackendError::Unauthorized)?;
        let body = self.get_json(ME_PATH, Some(&credential)).await?;
        decode_payload(body, &["/data/user", "/data", "/user"])
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, BackendError> {
        let body = self
            .post_json(REFRESH_PATH, None, &json!({ "refreshToken": refresh_token }))
            .await?;
        decode_payload(body, &["/data"])
    }

    async fn logout(&self, access_token: &str) -> Result<(), BackendError> {
        let credential = Credential::new(access_token).ok_or(BackendError::Unauthorized)?;
        self.post_json(LOGOUT_PATH, Some(&credential), &json!({})).await?;
        Ok(())
    }
}

async fn read_json(response: Response, method: &str, path: &str) -> Result<Value, BackendError> {
    let status = response.status();
    debug!(method, path, status = status.as_u16(), "backend response");

    if status == StatusCode::UNAUTHORIZED {
        return Err(BackendError::Unauthorized);
    }
    if !status.is_success() {
        return Err(BackendError::Status(status.as_u16()));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| BackendError::Request(format!("{method} {path} body read failed: {e}")))?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&bytes)
        .map_err(|e| BackendError::InvalidResponse(format!("{method} {path} invalid JSON: {e}")))
}

/// Decode a payload that may be wrapped in one of the backend's envelopes.
///
/// The first pointer that resolves to an object wins; the bare body is the
/// last resort.
fn decode_payload<T: DeserializeOwned>(body: Value, envelopes: &[&str]) -> Result<T, BackendError> {
    let inner = envelopes
        .iter()
        .filter_map(|pointer| body.pointer(pointer))
        .find(|value| value.is_object())
        .cloned()
        .unwrap_or(body);

    serde_json::from_value(inner).map_err(|e| BackendError::InvalidResponse(e.to_string()))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AccountStatus, Role};
    use axum::{
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::{get, post},
        Json, Router,
    };

    fn fake_backend() -> Router {
        Router::new()
            .route(
                "/api/auth/me",
                get(|headers: HeaderMap| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    if auth != "Bearer good-token" {
                        return Err(AxumStatus::UNAUTHORIZED);
                    }
                    Ok(Json(serde_json::json!({
                        "success": true,
                        "data": {
                            "user": {
                                "_id": "u1",
                                "name": "Ravi",
                                "email": "ravi@example.com",
                                "role": "admin",
                                "status": "active"
                            }
                        }
                    })))
                }),
            )
            .route(
                "/api/auth/refresh-token",
                post(|Json(body): Json<Value>| async move {
                    if body["refreshToken"] == "good-refresh" {
                        Ok(Json(serde_json::json!({
                            "data": { "accessToken": "good-token", "refreshToken": "next-refresh" }
                        })))
                    } else {
                        Err(AxumStatus::UNAUTHORIZED)
                    }
                }),
            )
            .route("/api/auth/logout", post(|| async { AxumStatus::NO_CONTENT }))
            .route("/api/bookings", get(|| async { Json(serde_json::json!([{ "id": "b1" }])) }))
            .route("/api/broken", get(|| async { AxumStatus::INTERNAL_SERVER_ERROR }))
            .route("/api/health", get(|| async { "ok" }))
    }

    async fn client() -> BackendClient {
        let base = test_server::spawn(fake_backend()).await;
        BackendClient::new(base, DEFAULT_TIMEOUT).unwrap()
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = BackendClient::new("http://localhost:5000/api/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(client.url("/auth/me"), "http://localhost:5000/api/auth/me");
        assert_eq!(client.url("bookings"), "http://localhost:5000/api/bookings");
    }

    #[test]
    fn decode_payload_accepts_bare_and_wrapped() {
        let bare = serde_json::json!({ "accessToken": "a" });
        let pair: TokenPair = decode_payload(bare, &["/data"]).unwrap();
        assert_eq!(pair.access_token, "a");
        assert!(pair.refresh_token.is_none());

        let wrapped = serde_json::json!({ "data": { "accessToken": "b", "refreshToken": "r" } });
        let pair: TokenPair = decode_payload(wrapped, &["/data"]).unwrap();
        assert_eq!(pair.refresh_token.as_deref(), Some("r"));
    }

    #[tokio::test]
    async fn fetch_session_with_valid_token() {
        let client = client().await;
        let user = client.fetch_session("good-token").await.unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.status, AccountStatus::Active);
    }

    #[tokio::test]
    async fn fetch_session_with_bad_token_is_unauthorized() {
        let client = client().await;
        let err = client.fetch_session("bad-token").await.unwrap_err();
        assert!(matches!(err, BackendError::Unauthorized));
    }

    #[tokio::test]
    async fn refresh_exchanges_tokens() {
        let client = client().await;
        let pair = client.refresh("good-refresh").await.unwrap();
        assert_eq!(pair.access_token, "good-token");
        assert_eq!(pair.refresh_token.as_deref(), Some("next-refresh"));
        assert!(matches!(
            client.refresh("stale").await,
            Err(BackendError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn logout_accepts_empty_body() {
        let client = client().await;
        client.logout("good-token").await.unwrap();
    }

    #[tokio::test]
    async fn opaque_json_and_status_errors() {
        let client = client().await;
        let bookings = client.get_json("/bookings", None).await.unwrap();
        assert_eq!(bookings[0]["id"], "b1");

        let err = client.get_json("/broken", None).await.unwrap_err();
        assert!(matches!(err, BackendError::Status(500)));

        client.ping().await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_backend_is_request_error() {
        let client = BackendClient::new("http://127.0.0.1:1/api", Duration::from_secs(2)).unwrap();
        assert!(matches!(client.ping().await, Err(BackendError::Request(_))));
    }
}
