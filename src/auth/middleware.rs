// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Edge route guard middleware for Axum.
//!
//! Runs on every navigation before any page is served and decides between
//! letting the request through, sending it to the login page, or sending an
//! already-authenticated visitor away from login/register pages.
//!
//! This is a presence check only. The credential is never decoded here;
//! the session guard and the backend perform the real authorization.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .fallback_service(pages)
//!     .layer(axum::middleware::from_fn_with_state(
//!         EdgeGuard::new(route_table, "accessToken"),
//!         edge_guard,
//!     ));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use super::extractor::credential_from_headers;
use super::routes::{EdgeDecision, RouteTable};

/// Edge guard configuration.
#[derive(Clone)]
pub struct EdgeGuard {
    /// Route classification
    pub routes: Arc<RouteTable>,
    /// Name of the access token cookie
    pub cookie_name: Arc<str>,
}

impl EdgeGuard {
    pub fn new(routes: impl Into<Arc<RouteTable>>, cookie_name: impl Into<Arc<str>>) -> Self {
        Self {
            routes: routes.into(),
            cookie_name: cookie_name.into(),
        }
    }
}

/// Edge guard middleware function.
pub async fn edge_guard(State(guard): State<EdgeGuard>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let has_credential = credential_from_headers(request.headers(), &guard.cookie_name).is_some();

    match guard.routes.decide(&path, has_credential) {
        EdgeDecision::Allow => next.run(request).await,
        EdgeDecision::RedirectToLogin { location } => {
            debug!(path = %path, %location, "edge guard: no credential for protected route");
            Redirect::temporary(&location).into_response()
        }
        EdgeDecision::RedirectToDashboard { location } => {
            debug!(path = %path, %location, "edge guard: credential present on auth-only route");
            Redirect::temporary(&location).into_response()
        }
    }
}
