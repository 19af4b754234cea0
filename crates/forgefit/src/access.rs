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

//! Admin access guard for the write endpoints.
//!
//! Authorization is a two-step check against the external auth
//! service: resolve the bearer token to a user, then look up that
//! user's profile role. Only the `admin` role may write. The guard is
//! a trait so tests can substitute a static implementation.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::AuthConfig;

/// Role string that grants write access.
pub const ADMIN_ROLE: &str = "admin";

/// An authenticated user that passed the admin check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub role: String,
}

#[derive(Error, Debug)]
pub enum AccessError {
    /// No valid session: missing, expired, or unrecognized token.
    #[error("User not authenticated")]
    Unauthenticated,

    /// A valid session without the admin role.
    #[error("User not authorized")]
    Forbidden,

    /// The auth service itself failed or answered unexpectedly.
    #[error("Auth service call failed: {0}")]
    Upstream(String),
}

impl From<reqwest::Error> for AccessError {
    fn from(e: reqwest::Error) -> Self {
        AccessError::Upstream(e.to_string())
    }
}

/// Authorizes a bearer token for admin writes.
#[async_trait]
pub trait AccessGuard: Send + Sync {
    async fn authorize_admin(&self, token: &str) -> Result<Principal, AccessError>;
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    role: Option<String>,
}

/// Guard backed by the external auth service's REST API.
pub struct HttpAccessGuard {
    http: reqwest::Client,
    base: String,
    public_key: String,
}

impl HttpAccessGuard {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: config.url.trim_end_matches('/').to_string(),
            public_key: config.public_key.clone(),
        }
    }

    /// Resolve the token to a user id. Any non-success answer means
    /// the session is invalid, not that the service is down.
    async fn current_user(&self, token: &str) -> Result<AuthUser, AccessError> {
        let resp = self
            .http
            .get(format!("{}/auth/v1/user", self.base))
            .header("apikey", &self.public_key)
            .bearer_auth(token)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AccessError::Unauthenticated);
        }
        resp.json::<AuthUser>()
            .await
            .map_err(|_| AccessError::Unauthenticated)
    }

    async fn user_role(&self, token: &str, user_id: &str) -> Result<Option<String>, AccessError> {
        let resp = self
            .http
            .get(format!("{}/rest/v1/profiles", self.base))
            .query(&[("id", format!("eq.{}", user_id)), ("select", "role".to_string())])
            .header("apikey", &self.public_key)
            .bearer_auth(token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AccessError::Upstream(format!(
                "profile lookup returned {}",
                status
            )));
        }

        let rows: Vec<ProfileRow> = resp.json().await.map_err(|e| {
            AccessError::Upstream(format!("profile response malformed: {}", e))
        })?;
        Ok(rows.into_iter().next().and_then(|row| row.role))
    }
}

#[async_trait]
impl AccessGuard for HttpAccessGuard {
    async fn authorize_admin(&self, token: &str) -> Result<Principal, AccessError> {
        if token.is_empty() {
            return Err(AccessError::Unauthenticated);
        }

        let user = self.current_user(token).await?;
        let role = self.user_role(token, &user.id).await?;

        match role {
            Some(role) if role == ADMIN_ROLE => {
                debug!(user = %user.id, "admin write authorized");
                Ok(Principal { id: user.id, role })
            }
            // A missing profile row counts as non-admin, not an error.
            _ => Err(AccessError::Forbidden),
        }
    }
}
