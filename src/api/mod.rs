// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # HTTP Surface
//!
//! | Path | Purpose |
//! |------|---------|
//! | `/api/health`, `/api/health/live`, `/api/health/ready` | Probes |
//! | `/api/auth/session` | Current session for the request credential |
//! | `/api/auth/logout` | Backend logout + cookie expiry |
//! | `/api/proxy/{*path}` | Pass-through to the booking backend |
//! | `/api/docs`, `/api/openapi.json` | API documentation |
//! | everything else | Page tree from `STATIC_DIR`, `index.html` fallback |
//!
//! Every request passes the edge guard first; `/api` is excluded from it.

use axum::{
    http::Uri,
    middleware::from_fn_with_state,
    routing::{any, get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{edge_guard, AccountStatus, Role, SessionUser},
    error::ApiError,
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod proxy;

pub fn router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    let pages = ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    let api_routes = Router::new()
        .route("/api/health", get(health::health))
        .route("/api/health/live", get(health::liveness))
        .route("/api/health/ready", get(health::readiness))
        .route("/api/auth/session", get(auth::session))
        .route("/api/auth/logout", post(auth::logout))
        .route(
            "/api/proxy/{*path}",
            get(proxy::forward_get).post(proxy::forward_post),
        )
        .route("/api/{*rest}", any(api_not_found))
        .with_state(state.clone());

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .fallback_service(pages)
        .layer(from_fn_with_state(state.edge_guard(), edge_guard))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

async fn api_not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("no API route for {}", uri.path()))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        auth::session,
        auth::logout,
        proxy::forward_get,
        proxy::forward_post
    ),
    components(
        schemas(
            SessionUser,
            Role,
            AccountStatus,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Auth", description = "Session lookup and logout"),
        (name = "Proxy", description = "Credentialed pass-through to the booking backend")
    )
)]
struct ApiDoc;
