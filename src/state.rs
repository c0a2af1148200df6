// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{EdgeGuard, RouteTable};
use crate::backend::{BackendClient, BackendError};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub routes: Arc<RouteTable>,
    pub backend: BackendClient,
}

impl AppState {
    pub fn new(config: AppConfig, routes: RouteTable) -> Result<Self, BackendError> {
        let backend = BackendClient::new(&config.backend_api_url, config.backend_timeout)?;
        Ok(Self {
            config: Arc::new(config),
            routes: Arc::new(routes),
            backend,
        })
    }

    /// Edge guard state sharing this app's route table and cookie name.
    pub fn edge_guard(&self) -> EdgeGuard {
        EdgeGuard::new(self.routes.clone(), self.config.access_token_cookie.as_str())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default(), RouteTable::default())
            .unwrap_or_else(|e| panic!("default backend client must build: {e}"))
    }
}
