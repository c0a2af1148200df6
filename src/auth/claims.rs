// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session user representation and access token inspection.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: i64 = 60;

/// Lifecycle tag of a user account.
///
/// Only `Active` accounts may enter guarded sections regardless of role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum AccountStatus {
    Active,
    Pending,
    Deactivated,
    /// Unrecognised status string
    Unknown,
}

impl AccountStatus {
    /// Parse a status name (case-insensitive).
    pub fn parse(s: &str) -> AccountStatus {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => AccountStatus::Active,
            "pending" => AccountStatus::Pending,
            "deactivated" => AccountStatus::Deactivated,
            _ => AccountStatus::Unknown,
        }
    }

    pub fn is_active(&self) -> bool {
        *self == AccountStatus::Active
    }
}

impl From<String> for AccountStatus {
    fn from(value: String) -> Self {
        AccountStatus::parse(&value)
    }
}

/// The authenticated user's profile as cached by the client.
///
/// This is the shape returned by the backend's `auth/me` endpoint and the
/// value persisted alongside the access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Backend user ID
    #[serde(alias = "_id")]
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Login email
    #[serde(default)]
    pub email: String,

    /// Contact phone (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// User's role
    pub role: Role,

    /// Account lifecycle status
    pub status: AccountStatus,
}

impl SessionUser {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Minimal JWT claims needed to read the expiry.
#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    #[serde(default)]
    exp: Option<i64>,
}

/// Read the `exp` claim of a JWT access token without verifying it.
///
/// Returns `None` for opaque (non-JWT) tokens or tokens without `exp`.
/// The backend remains the authority; this only lets the client skip a
/// request that is certain to be rejected.
pub fn token_expiry(token: &str) -> Option<i64> {
    let data = jsonwebtoken::dangerous::insecure_decode::<ExpiryClaims>(token).ok()?;
    data.claims.exp
}

/// Whether a JWT access token is past its expiry (with clock skew leeway).
///
/// Opaque tokens are never considered expired.
pub fn token_expired(token: &str, now: i64) -> bool {
    match token_expiry(token) {
        Some(exp) => exp < now - CLOCK_SKEW_LEEWAY,
        None => false,
    }
}
