// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Process-wide client session store.
//!
//! One `SessionStore` exists per client process and is shared as an
//! `Arc<SessionStore>`. It is the single owner of session truth: guards
//! and other consumers only read snapshots or subscribe to changes.
//!
//! ## State
//!
//! ```text
//! Uninitialized ──initialize()──▶ Initializing ──▶ Ready(session?)
//!                                              └──▶ Error (no session)
//! Ready/Error ──logout()──▶ Ready(None)
//! ```
//!
//! Only `initialize` and `logout` mutate the store. `initialize` is
//! single-flight: the first caller moves the store to `Initializing` and
//! spawns the resolver; every caller then waits on the watch channel, so the
//! backend is asked once even if callers go away mid-flight.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::storage::{CredentialStorage, StorageError, StoredCredentials};
use crate::auth::claims::token_expired;
use crate::auth::SessionUser;
use crate::backend::{BackendError, SessionBackend};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("credential storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Lifecycle of the store itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    Initializing,
    Ready,
    Error,
}

/// Consistent view of the store at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub state: StoreState,
    pub session: Option<SessionUser>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl SessionSnapshot {
    fn uninitialized() -> Self {
        Self {
            state: StoreState::Uninitialized,
            session: None,
            updated_at: None,
        }
    }

    /// Initialization has finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self.state, StoreState::Ready | StoreState::Error)
    }
}

pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
    storage: Arc<dyn CredentialStorage>,
    state: watch::Sender<SessionSnapshot>,
    /// Serialises the resolver task and `logout`.
    flight: Mutex<()>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn SessionBackend>, storage: Arc<dyn CredentialStorage>) -> Arc<Self> {
        let (state, _) = watch::channel(SessionSnapshot::uninitialized());
        Arc::new(Self {
            backend,
            storage,
            state,
            flight: Mutex::new(()),
        })
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Receive every snapshot published from now on.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Resolve the session once.
    ///
    /// Safe to call from any number of guards at once; later calls return
    /// the settled snapshot without touching storage or the backend.
    /// Failures are folded into `StoreState::Error` with no session.
    ///
    /// The work runs on a task owned by the store. Dropping the returned
    /// future only stops waiting; the shared initialization carries on.
    pub async fn initialize(self: &Arc<Self>) -> SessionSnapshot {
        let mut updates = self.subscribe();
        self.start();

        let settled = match updates.wait_for(SessionSnapshot::is_settled).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        };
        settled
    }

    /// Claim `Uninitialized -> Initializing` and spawn the resolver.
    /// Only the caller that wins the transition spawns.
    fn start(self: &Arc<Self>) {
        let claimed = self.state.send_if_modified(|snapshot| {
            if snapshot.state != StoreState::Uninitialized {
                return false;
            }
            *snapshot = SessionSnapshot {
                state: StoreState::Initializing,
                session: None,
                updated_at: Some(Utc::now()),
            };
            true
        });
        if !claimed {
            return;
        }

        let store = Arc::clone(self);
        tokio::spawn(async move {
            let _flight = store.flight.lock().await;
            // A logout may have settled the store before the resolver ran.
            if store.snapshot().state != StoreState::Initializing {
                return;
            }

            match store.resolve().await {
                Ok(session) => {
                    info!(
                        user_id = ?session.as_ref().map(|u| u.id.as_str()),
                        role = ?session.as_ref().map(|u| u.role),
                        "session initialized"
                    );
                    store.publish(StoreState::Ready, session);
                }
                Err(e) => {
                    warn!(error = %e, "session initialization failed");
                    store.publish(StoreState::Error, None);
                }
            }
        });
    }

    /// End the session.
    ///
    /// The backend is told on a best-effort basis; local credentials are
    /// always dropped and an empty session is published.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let _flight = self.flight.lock().await;

        match self.storage.load() {
            Ok(stored) => {
                if let Some(token) = stored.access_token() {
                    if let Err(e) = self.backend.logout(token).await {
                        warn!(error = %e, "backend logout failed");
                    }
                }
            }
            Err(e) => warn!(error = %e, "could not read credentials for logout"),
        }

        let cleared = self.storage.clear();
        self.publish(StoreState::Ready, None);
        cleared.map_err(SessionError::from)
    }

    fn publish(&self, state: StoreState, session: Option<SessionUser>) {
        self.state.send_replace(SessionSnapshot {
            state,
            session,
            updated_at: Some(Utc::now()),
        });
    }

    async fn resolve(&self) -> Result<Option<SessionUser>, SessionError> {
        let mut stored = self.storage.load()?;
        let mut refreshed = false;

        let now = Utc::now().timestamp();
        let current = stored.access_token().map(str::to_string);
        let mut token = match current {
            Some(token) if !token_expired(&token, now) => token,
            Some(_) => {
                debug!("stored access token expired, refreshing");
                refreshed = true;
                match self.refresh(&mut stored).await? {
                    Some(token) => token,
                    None => return self.forget(&stored),
                }
            }
            None => return self.forget(&stored),
        };

        loop {
            match self.backend.fetch_session(&token).await {
                Ok(user) => {
                    stored.user = Some(user.clone());
                    self.storage.save(&stored)?;
                    return Ok(Some(user));
                }
                Err(BackendError::Unauthorized) if !refreshed => {
                    debug!("access token rejected, refreshing");
                    refreshed = true;
                    match self.refresh(&mut stored).await? {
                        Some(next) => token = next,
                        None => return self.forget(&stored),
                    }
                }
                Err(BackendError::Unauthorized) => return self.forget(&stored),
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Exchange the stored refresh token. `Ok(None)` when there is none or
    /// the backend rejects it.
    async fn refresh(
        &self,
        stored: &mut StoredCredentials,
    ) -> Result<Option<String>, SessionError> {
        let Some(refresh_token) = stored.refresh_token().map(str::to_string) else {
            return Ok(None);
        };

        match self.backend.refresh(&refresh_token).await {
            Ok(pair) => {
                stored.access_token = Some(pair.access_token.clone());
                if pair.refresh_token.is_some() {
                    stored.refresh_token = pair.refresh_token;
                }
                self.storage.save(stored)?;
                Ok(Some(pair.access_token))
            }
            Err(BackendError::Unauthorized) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Drop credentials the backend will not accept.
    fn forget(&self, stored: &StoredCredentials) -> Result<Option<SessionUser>, SessionError> {
        if *stored != StoredCredentials::default() {
            self.storage.clear()?;
        }
        Ok(None)
    }
}
