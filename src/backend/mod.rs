// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Booking Backend Integration
//!
//! The external backend owns bookings, payments, promo codes, users and
//! content. This gateway only talks to it over HTTP, always presenting the
//! visitor's credential as `Authorization: Bearer <token>`.
//!
//! ## Endpoints used
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | `GET`  | `/auth/me` | Session user for a credential |
//! | `POST` | `/auth/refresh-token` | Exchange a refresh token |
//! | `POST` | `/auth/logout` | Invalidate a credential |
//! | `GET`  | `/health` | Reachability probe |
//!
//! Every other path is opaque business data forwarded as JSON.

pub mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::auth::SessionUser;

pub use client::BackendClient;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Request(String),

    #[error("backend rejected the credential")]
    Unauthorized,

    #[error("backend returned HTTP {0}")]
    Status(u16),

    #[error("backend response was invalid: {0}")]
    InvalidResponse(String),
}

/// Fresh credentials issued by a refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Session operations the client session store needs from the backend.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Validate an access token and return its user.
    async fn fetch_session(&self, access_token: &str) -> Result<SessionUser, BackendError>;

    /// Exchange a refresh token for new credentials.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, BackendError>;

    /// Invalidate an access token.
    async fn logout(&self, access_token: &str) -> Result<(), BackendError>;
}
