// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Credential handling, roles and the edge route guard.
//!
//! ## Auth Flow
//!
//! 1. The external login flow stores the access token in the `accessToken`
//!    cookie (and in client storage for the session store)
//! 2. Every navigation passes the edge guard:
//!    - protected page without credential → `/login?redirect=<path>`
//!    - login/register page with credential → `/dashboard`
//! 3. Guarded client subtrees validate the session (status + role) through
//!    the session store, see [`crate::session`]
//! 4. `/api` calls forward the credential as `Authorization: Bearer <token>`
//!    to the booking backend, which owns real authorization
//!
//! ## Security
//!
//! - The edge guard is a presence check only, it never decodes tokens
//! - Token contents are only peeked (expiry) client-side, never trusted

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod roles;
pub mod routes;

pub use claims::{AccountStatus, SessionUser};
pub use error::AuthError;
pub use extractor::{Bearer, Credential, OptionalBearer};
pub use middleware::{edge_guard, EdgeGuard};
pub use roles::{Role, RoleRequirement};
pub use routes::{EdgeDecision, RouteClass, RouteTable};
