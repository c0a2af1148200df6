// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process session backend double for store and guard tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::auth::{AccountStatus, Role, SessionUser};
use crate::backend::{BackendError, SessionBackend, TokenPair};

pub fn user(role: Role, status: AccountStatus) -> SessionUser {
    SessionUser {
        id: format!("{}-1", role.to_string().to_lowercase()),
        name: "Test Devotee".to_string(),
        email: "devotee@example.com".to_string(),
        phone: Some("+91 90000 00000".to_string()),
        role,
        status,
    }
}

#[derive(Default)]
pub struct FakeBackend {
    users: HashMap<String, SessionUser>,
    refreshes: HashMap<String, TokenPair>,
    delay: Option<Duration>,
    unreachable: bool,
    me_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    logout_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn with_user(mut self, token: &str, user: SessionUser) -> Self {
        self.users.insert(token.to_string(), user);
        self
    }

    pub fn with_refresh(
        mut self,
        refresh_token: &str,
        access: &str,
        next_refresh: Option<&str>,
    ) -> Self {
        self.refreshes.insert(
            refresh_token.to_string(),
            TokenPair {
                access_token: access.to_string(),
                refresh_token: next_refresh.map(str::to_string),
            },
        );
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn me_calls(&self) -> usize {
        self.me_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }

    async fn network(&self) -> Result<(), BackendError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.unreachable {
            return Err(BackendError::Request("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionBackend for FakeBackend {
    async fn fetch_session(&self, access_token: &str) -> Result<SessionUser, BackendError> {
        self.me_calls.fetch_add(1, Ordering::SeqCst);
        self.network().await?;
        self.users
            .get(access_token)
            .cloned()
            .ok_or(BackendError::Unauthorized)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, BackendError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.network().await?;
        self.refreshes
            .get(refresh_token)
            .cloned()
            .ok_or(BackendError::Unauthorized)
    }

    async fn logout(&self, _access_token: &str) -> Result<(), BackendError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.network().await
    }
}
