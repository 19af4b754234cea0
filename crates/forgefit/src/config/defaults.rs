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

use crate::config::types::*;

impl Default for ForgeFitConfig {
    fn default() -> Self {
        Self {
            cms: CmsConfig::default(),
            auth: AuthConfig::default(),
            server: ServerConfig::default(),
            uploads: UploadsConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            space_id: "${FORGEFIT_CMS_SPACE_ID:?CMS space id must be provided}".to_string(),
            environment: "master".to_string(),
            access_token: "${FORGEFIT_CMS_ACCESS_TOKEN:?CMS delivery token must be provided}"
                .to_string(),
            management_token:
                "${FORGEFIT_CMS_MANAGEMENT_TOKEN:?CMS management token must be provided}"
                    .to_string(),
            delivery_url: "https://cdn.contentful.com".to_string(),
            management_url: "https://api.contentful.com".to_string(),
            upload_url: "https://upload.contentful.com".to_string(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            url: "${FORGEFIT_AUTH_URL:?auth service URL must be provided}".to_string(),
            public_key: "${FORGEFIT_AUTH_PUBLIC_KEY:?auth public key must be provided}"
                .to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            // Covers the image plus a handful of PDF attachments.
            max_body_bytes: 50 * 1024 * 1024,
        }
    }
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            process_poll_interval_ms: 500,
            process_poll_attempts: 20,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            list_ttl_secs: 3600, // 1 hour
        }
    }
}

/// Generate a complete default configuration as TOML string
pub fn generate_default_config_toml() -> Result<String, toml::ser::Error> {
    let config = ForgeFitConfig::default();
    toml::to_string_pretty(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_template_parses_back() {
        let template = generate_default_config_toml().unwrap();
        let parsed: ForgeFitConfig = toml::from_str(&template).unwrap();
        assert_eq!(parsed.server.port, 8080);
        // Secrets stay as env placeholders in the template
        assert!(parsed.cms.space_id.starts_with("${FORGEFIT_CMS_SPACE_ID"));
    }
}
