// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Persisted client credentials.
//!
//! The login flow (external) writes the access token, refresh token and the
//! cached user here; the session store reads them on initialization and
//! clears them on logout or when the backend rejects them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::auth::SessionUser;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Everything the client keeps between page loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

impl StoredCredentials {
    /// Access token, if present and non-blank.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Refresh token, if present and non-blank.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Client-side credential storage.
pub trait CredentialStorage: Send + Sync {
    fn load(&self) -> Result<StoredCredentials, StorageError>;
    fn save(&self, credentials: &StoredCredentials) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// In-memory storage, lost when the process ends (session storage).
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: Mutex<StoredCredentials>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: StoredCredentials) -> Self {
        Self {
            inner: Mutex::new(credentials),
        }
    }
}

impl CredentialStorage for MemoryStorage {
    fn load(&self) -> Result<StoredCredentials, StorageError> {
        self.inner
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| StorageError::Poisoned)
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<(), StorageError> {
        let mut guard = self.inner.lock().map_err(|_| StorageError::Poisoned)?;
        *guard = credentials.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.save(&StoredCredentials::default())
    }
}

/// Storage backed by one JSON document on disk (local storage).
///
/// A missing file reads as empty credentials.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStorage for JsonFileStorage {
    fn load(&self) -> Result<StoredCredentials, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(StoredCredentials::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(StoredCredentials::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Replace atomically: write a sibling temp file, then rename over.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(credentials)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AccountStatus, Role};
    use tempfile::TempDir;

    fn sample() -> StoredCredentials {
        StoredCredentials {
            access_token: Some("access".to_string()),
            refresh_token: Some("refresh".to_string()),
            user: Some(SessionUser {
                id: "u1".to_string(),
                name: "Meera".to_string(),
                email: "meera@example.com".to_string(),
                phone: None,
                role: Role::User,
                status: AccountStatus::Active,
            }),
        }
    }

    #[test]
    fn blank_tokens_are_absent() {
        let creds = StoredCredentials {
            access_token: Some("  ".to_string()),
            refresh_token: Some(String::new()),
            user: None,
        };
        assert!(creds.access_token().is_none());
        assert!(creds.refresh_token().is_none());
    }

    #[test]
    fn memory_storage_save_load_clear() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.load().unwrap(), StoredCredentials::default());

        storage.save(&sample()).unwrap();
        assert_eq!(storage.load().unwrap(), sample());

        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), StoredCredentials::default());
    }

    #[test]
    fn file_storage_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("session.json"));
        assert_eq!(storage.load().unwrap(), StoredCredentials::default());
        storage.clear().unwrap();
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        JsonFileStorage::new(&path).save(&sample()).unwrap();
        let reopened = JsonFileStorage::new(&path);
        assert_eq!(reopened.load().unwrap(), sample());

        reopened.clear().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn file_storage_reports_corrupt_documents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, b"{not json").unwrap();
        assert!(matches!(
            JsonFileStorage::new(&path).load(),
            Err(StorageError::Json(_))
        ));
    }
}
