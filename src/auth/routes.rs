// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Static route classification for the edge guard.
//!
//! Paths are matched by case-sensitive prefix against the path exactly as
//! received. Protected and auth-only prefixes are disjoint, so the order in
//! which categories are checked does not change the outcome.

use url::form_urlencoded;

/// Default login page.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Landing page for authenticated visitors hitting an auth-only page.
pub const DEFAULT_DASHBOARD_PATH: &str = "/dashboard";

/// Query parameter carrying the originally requested path to the login page.
pub const REDIRECT_PARAM: &str = "redirect";

const DEFAULT_PROTECTED: &[&str] = &[
    "/dashboard",
    "/admin",
    "/employee",
    "/profile",
    "/my-bookings",
    "/checkout",
];

const DEFAULT_AUTH_ONLY: &[&str] = &[
    "/login",
    "/register",
    "/forgot-password",
    "/reset-password",
    "/verify-otp",
];

/// Never classified or redirected: API, static assets, image optimisation,
/// favicon and public assets.
const DEFAULT_EXCLUDED: &[&str] = &["/api", "/static", "/_image", "/favicon.ico", "/public"];

/// Category a path falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Bypasses the guard entirely
    Excluded,
    /// Requires a credential
    Protected,
    /// Only for visitors without a credential
    AuthOnly,
    /// Everything else
    Public,
}

/// Outcome of the edge guard for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeDecision {
    Allow,
    RedirectToLogin { location: String },
    RedirectToDashboard { location: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteTableError {
    #[error("protected prefix {protected:?} overlaps auth-only prefix {auth_only:?}")]
    Overlap { protected: String, auth_only: String },
    #[error("route prefix {0:?} must start with '/'")]
    NotAbsolute(String),
}

/// Partition of URL path prefixes into protected, auth-only and excluded.
#[derive(Debug, Clone)]
pub struct RouteTable {
    protected: Vec<String>,
    auth_only: Vec<String>,
    excluded: Vec<String>,
    login_path: String,
    default_dashboard: String,
}

impl RouteTable {
    /// Build a table, rejecting overlapping protected and auth-only prefixes.
    pub fn new<P, A, E>(protected: P, auth_only: A, excluded: E) -> Result<Self, RouteTableError>
    where
        P: IntoIterator,
        P::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        let protected = collect_prefixes(protected)?;
        let auth_only = collect_prefixes(auth_only)?;
        let excluded = collect_prefixes(excluded)?;

        for p in &protected {
            for a in &auth_only {
                if p.starts_with(a.as_str()) || a.starts_with(p.as_str()) {
                    return Err(RouteTableError::Overlap {
                        protected: p.clone(),
                        auth_only: a.clone(),
                    });
                }
            }
        }

        Ok(Self {
            protected,
            auth_only,
            excluded,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            default_dashboard: DEFAULT_DASHBOARD_PATH.to_string(),
        })
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn with_default_dashboard(mut self, path: impl Into<String>) -> Self {
        self.default_dashboard = path.into();
        self
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn default_dashboard(&self) -> &str {
        &self.default_dashboard
    }

    /// Classify a request path.
    pub fn classify(&self, path: &str) -> RouteClass {
        let matches = |prefixes: &[String]| prefixes.iter().any(|p| path.starts_with(p.as_str()));

        if matches(&self.excluded) {
            RouteClass::Excluded
        } else if matches(&self.protected) {
            RouteClass::Protected
        } else if matches(&self.auth_only) {
            RouteClass::AuthOnly
        } else {
            RouteClass::Public
        }
    }

    /// Decide what to do with a request for `path`.
    ///
    /// Only the presence of a credential is considered, never its validity.
    pub fn decide(&self, path: &str, has_credential: bool) -> EdgeDecision {
        match self.classify(path) {
            RouteClass::Protected if !has_credential => EdgeDecision::RedirectToLogin {
                location: self.login_redirect(path),
            },
            RouteClass::AuthOnly if has_credential => EdgeDecision::RedirectToDashboard {
                location: self.default_dashboard.clone(),
            },
            _ => EdgeDecision::Allow,
        }
    }

    /// Login URL carrying `path` as the `redirect` parameter.
    pub fn login_redirect(&self, path: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(REDIRECT_PARAM, path)
            .finish();
        format!("{}?{query}", self.login_path)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            protected: DEFAULT_PROTECTED.iter().map(|s| s.to_string()).collect(),
            auth_only: DEFAULT_AUTH_ONLY.iter().map(|s| s.to_string()).collect(),
            excluded: DEFAULT_EXCLUDED.iter().map(|s| s.to_string()).collect(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            default_dashboard: DEFAULT_DASHBOARD_PATH.to_string(),
        }
    }
}

fn collect_prefixes<I>(prefixes: I) -> Result<Vec<String>, RouteTableError>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    prefixes
        .into_iter()
        .map(Into::into)
        .map(|p| {
            if p.starts_with('/') {
                Ok(p)
            } else {
                Err(RouteTableError::NotAbsolute(p))
            }
        })
        .collect()
}
