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

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use forgefit::access::{AccessGuard, HttpAccessGuard, Principal};
use forgefit::cms::{HttpDeliveryApi, HttpManagementApi};
use forgefit::config::ForgeFitConfig;
use forgefit::programs::ProgramService;
use forgefit::reader::ProgramReader;

use crate::error::ApiError;

/// Shared state behind every handler. All services hang off traits,
/// so tests construct this with in-memory backends.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ProgramService>,
    pub reader: Arc<ProgramReader>,
    pub guard: Arc<dyn AccessGuard>,
    /// Client for the download proxy.
    pub http: reqwest::Client,
    pub max_body_bytes: usize,
}

impl AppState {
    /// Wire up the production stack from configuration.
    pub fn from_config(config: &ForgeFitConfig) -> anyhow::Result<Self> {
        let management = Arc::new(HttpManagementApi::new(&config.cms)?);
        let delivery = Arc::new(HttpDeliveryApi::new(&config.cms)?);
        let reader = Arc::new(ProgramReader::new(delivery, &config.cache));
        let service = Arc::new(ProgramService::new(
            management,
            reader.clone(),
            &config.uploads,
        ));
        let guard = Arc::new(HttpAccessGuard::new(&config.auth));

        Ok(Self {
            service,
            reader,
            guard,
            http: reqwest::Client::new(),
            max_body_bytes: config.server.max_body_bytes,
        })
    }

    /// Check the request's bearer token against the admin guard.
    pub async fn require_admin(&self, headers: &HeaderMap) -> Result<Principal, ApiError> {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .unwrap_or("");

        Ok(self.guard.authorize_admin(token).await?)
    }
}
