// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer credential extraction.
//!
//! The credential is looked up in the access token cookie first and in the
//! `Authorization: Bearer <token>` header second. Nothing here decodes or
//! verifies the token; the backend is the authority on its validity.
//!
//! Use the `Bearer` extractor in `/api` handlers that need the credential:
//!
//! ```rust,ignore
//! async fn my_handler(Bearer(credential): Bearer) -> impl IntoResponse {
//!     // credential.as_str() is the raw token
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::CookieJar;

use super::AuthError;
use crate::state::AppState;

/// Opaque bearer token proving identity to the backend.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw token. Blank tokens are not credentials.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Extract the credential from the named cookie, falling back to a
/// bearer `Authorization` header.
///
/// A header without the `Bearer ` prefix is ignored here.
pub fn credential_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<Credential> {
    let jar = CookieJar::from_headers(headers);
    if let Some(credential) = jar
        .get(cookie_name)
        .and_then(|cookie| Credential::new(cookie.value()))
    {
        return Some(credential);
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(Credential::new)
}

/// Extractor for handlers that require a credential.
///
/// Unlike the edge guard, a malformed `Authorization` header is rejected
/// with `InvalidAuthHeader` instead of being treated as absent.
pub struct Bearer(pub Credential);

impl FromRequestParts<AppState> for Bearer {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookie_name = &state.config.access_token_cookie;
        if let Some(credential) = credential_from_headers(&parts.headers, cookie_name) {
            return Ok(Bearer(credential));
        }

        match parts.headers.get(AUTHORIZATION) {
            Some(_) => Err(AuthError::InvalidAuthHeader),
            None => Err(AuthError::MissingCredential),
        }
    }
}

/// Optional credential extractor.
///
/// Returns `None` instead of rejecting when no credential is present.
pub struct OptionalBearer(pub Option<Credential>);

impl FromRequestParts<AppState> for OptionalBearer {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalBearer(credential_from_headers(
            &parts.headers,
            &state.config.access_token_cookie,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, HeaderValue, Request};

    fn headers(pairs: &[(axum::http::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn cookie_takes_precedence_over_header() {
        let map = headers(&[
            (COOKIE, "theme=dark; accessToken=from-cookie"),
            (AUTHORIZATION, "Bearer from-header"),
        ]);
        let credential = credential_from_headers(&map, "accessToken").unwrap();
        assert_eq!(credential.as_str(), "from-cookie");
    }

    #[test]
    fn falls_back_to_bearer_header() {
        let map = headers(&[(AUTHORIZATION, "Bearer abc.def")]);
        let credential = credential_from_headers(&map, "accessToken").unwrap();
        assert_eq!(credential.as_str(), "abc.def");
    }

    #[test]
    fn empty_values_are_absent() {
        let map = headers(&[(COOKIE, "accessToken="), (AUTHORIZATION, "Bearer   ")]);
        assert!(credential_from_headers(&map, "accessToken").is_none());
    }

    #[test]
    fn non_bearer_header_is_ignored() {
        let map = headers(&[(AUTHORIZATION, "Basic dXNlcjpwYXNz")]);
        assert!(credential_from_headers(&map, "accessToken").is_none());
    }

    #[test]
    fn debug_hides_token() {
        let credential = Credential::new("secret").unwrap();
        assert_eq!(format!("{credential:?}"), "Credential(***)");
    }

    #[tokio::test]
    async fn bearer_extractor_distinguishes_missing_and_malformed() {
        let state = AppState::default();

        let mut parts = Request::builder()
            .uri("/api/auth/session")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        let result = Bearer::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingCredential)));

        let mut parts = Request::builder()
            .uri("/api/auth/session")
            .header(AUTHORIZATION, "Token abc")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        let result = Bearer::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn optional_bearer_returns_none_without_credential() {
        let state = AppState::default();
        let mut parts = Request::builder().uri("/api/auth/logout").body(()).unwrap().into_parts().0;
        let OptionalBearer(credential) = OptionalBearer::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(credential.is_none());
    }
}
