// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Puja Portal - Booking Site Web Gateway
//!
//! Serves the puja and astrology booking front-end and enforces the auth
//! gate in front of it.
//!
//! ## Modules
//!
//! - `api` - HTTP surface (Axum): probes, session endpoints, backend proxy, pages
//! - `auth` - Credentials, roles and the edge route guard
//! - `backend` - Booking backend client
//! - `session` - Client session store and guard
//! - `config` - Environment configuration

pub mod api;
pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod session;
pub mod state;
