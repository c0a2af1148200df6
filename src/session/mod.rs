// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Client Session Module
//!
//! The client-side half of access control, used by the front-end runtime:
//!
//! - `store` - process-wide session store with single-flight initialization
//! - `guard` - per-subtree guard enforcing account status and role
//! - `storage` - persisted access/refresh tokens and cached user
//! - `navigation` - navigation capability used for redirects
//!
//! ## Example
//!
//! ```rust,ignore
//! let store = SessionStore::new(Arc::new(backend), Arc::new(JsonFileStorage::new(path)));
//! let (navigator, routes) = ChannelNavigator::new();
//!
//! let mut guard = SessionGuard::new(store.clone(), navigator)
//!     .require(RoleRequirement::parse("admin")?);
//! guard.mount().await;
//! let view = guard.render(|| admin_panel());
//! ```

pub mod guard;
pub mod navigation;
pub mod storage;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use guard::{evaluate, Access, DenyReason, GuardPhase, GuardView, SessionGuard};
pub use navigation::{ChannelNavigator, Navigator};
pub use storage::{
    CredentialStorage, JsonFileStorage, MemoryStorage, StorageError, StoredCredentials,
};
pub use store::{SessionError, SessionSnapshot, SessionStore, StoreState};
