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

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgeFitConfig {
    pub cms: CmsConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Connection details for the headless CMS. The delivery token reads
/// published content; the management token performs writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsConfig {
    pub space_id: String,
    pub environment: String,
    pub access_token: String,
    pub management_token: String,
    pub delivery_url: String,
    pub management_url: String,
    pub upload_url: String,
}

/// The external auth service the admin guard checks sessions against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub url: String,
    /// Anonymous API key sent alongside every auth request.
    pub public_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub log_level: String,
    /// Upper bound on multipart request bodies, in bytes.
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadsConfig {
    /// How many asset uploads run in flight at once per request.
    pub max_concurrency: u32,
    pub process_poll_interval_ms: u64,
    pub process_poll_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long the cached program list stays valid without an
    /// explicit invalidation.
    pub list_ttl_secs: u64,
}
