// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client session guard.
//!
//! Wraps a protected subtree: nothing inside is rendered until the shared
//! session store has settled and the session passes the checks below.
//!
//! ## Checks (in order)
//!
//! 1. A session exists and its account status is `ACTIVE`,
//!    otherwise → login page
//! 2. If a role requirement is set, the session role is a member,
//!    otherwise → the session role's own dashboard
//!
//! ## Phases
//!
//! ```text
//! Initializing ──store settled──▶ Checking ──▶ Authorized
//!                                          └──▶ Redirecting(path)
//! ```
//!
//! Both final phases are terminal for the mount. While not `Authorized` the
//! guard renders a loading placeholder only.

use std::sync::Arc;

use tracing::debug;

use super::navigation::Navigator;
use super::store::SessionStore;
use crate::auth::routes::DEFAULT_LOGIN_PATH;
use crate::auth::{AccountStatus, Role, RoleRequirement, SessionUser};

/// Why access was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No session, or session initialization failed
    NoSession,
    /// Account is pending, deactivated or in an unknown state
    Inactive(AccountStatus),
    /// Active session whose role is not in the requirement
    RoleMismatch(Role),
}

/// Result of checking a session against a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied { reason: DenyReason, redirect_to: String },
}

/// Check a session against an optional role requirement.
pub fn evaluate(
    session: Option<&SessionUser>,
    requirement: Option<&RoleRequirement>,
    login_path: &str,
) -> Access {
    let Some(user) = session else {
        return Access::Denied {
            reason: DenyReason::NoSession,
            redirect_to: login_path.to_string(),
        };
    };

    if !user.is_active() {
        return Access::Denied {
            reason: DenyReason::Inactive(user.status),
            redirect_to: login_path.to_string(),
        };
    }

    match requirement {
        Some(requirement) if !requirement.admits(user.role) => Access::Denied {
            reason: DenyReason::RoleMismatch(user.role),
            redirect_to: user.role.dashboard_path().to_string(),
        },
        _ => Access::Granted,
    }
}

/// Per-mount guard phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardPhase {
    Initializing,
    Checking,
    Authorized,
    Redirecting(String),
}

impl GuardPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GuardPhase::Authorized | GuardPhase::Redirecting(_))
    }
}

/// What a guarded subtree shows.
#[derive(Debug, PartialEq, Eq)]
pub enum GuardView<T> {
    /// Loading / redirecting placeholder
    Loading,
    /// The protected children
    Content(T),
}

pub struct SessionGuard<N: Navigator> {
    store: Arc<SessionStore>,
    navigator: N,
    requirement: Option<RoleRequirement>,
    login_path: String,
    phase: GuardPhase,
}

impl<N: Navigator> SessionGuard<N> {
    pub fn new(store: Arc<SessionStore>, navigator: N) -> Self {
        Self {
            store,
            navigator,
            requirement: None,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            phase: GuardPhase::Initializing,
        }
    }

    /// Restrict the subtree to the given roles.
    pub fn require(mut self, requirement: RoleRequirement) -> Self {
        self.requirement = Some(requirement);
        self
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn phase(&self) -> &GuardPhase {
        &self.phase
    }

    /// Drive the guard to a terminal phase.
    ///
    /// Triggers the store's shared initialization, waits for it to settle,
    /// then evaluates once. Navigation happens at most once per mount;
    /// calling `mount` again after a terminal phase does nothing. Dropping
    /// the future (unmount) leaves the shared initialization running.
    pub async fn mount(&mut self) -> &GuardPhase {
        if self.phase.is_terminal() {
            return &self.phase;
        }

        let snapshot = self.store.initialize().await;

        self.phase = GuardPhase::Checking;
        let access = evaluate(
            snapshot.session.as_ref(),
            self.requirement.as_ref(),
            &self.login_path,
        );
        self.phase = match access {
            Access::Granted => GuardPhase::Authorized,
            Access::Denied { reason, redirect_to } => {
                debug!(?reason, %redirect_to, "session guard redirecting");
                self.navigator.navigate_to(&redirect_to);
                GuardPhase::Redirecting(redirect_to)
            }
        };

        &self.phase
    }

    /// Render the subtree. `children` runs only when authorized.
    pub fn render<T>(&self, children: impl FnOnce() -> T) -> GuardView<T> {
        match self.phase {
            GuardPhase::Authorized => GuardView::Content(children()),
            _ => GuardView::Loading,
        }
    }
}
