/*
 *  Copyright 2025 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! # ForgeFit HTTP Server
//!
//! JSON API over the ForgeFit core library. Read endpoints are public;
//! write endpoints require an admin bearer token checked against the
//! external auth service. Program writes arrive as multipart forms
//! carrying text fields plus the image and attachment files.

pub mod error;
pub mod handlers;
pub mod logging;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_body = state.max_body_bytes;

    Router::new()
        .route(
            "/api/programs",
            get(handlers::programs::list)
                .post(handlers::programs::create)
                .delete(handlers::programs::remove),
        )
        .route(
            "/api/programs/{id}",
            get(handlers::programs::detail).put(handlers::programs::update),
        )
        .route("/api/download", get(handlers::download::proxy))
        .route("/healthz", get(handlers::healthz))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
