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

use crate::config::{types::*, ValidationError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn require_url(field: &str, value: &str) -> Result<(), ValidationError> {
    Url::parse(value).map_err(|_| ValidationError::InvalidUrl {
        field: field.to_string(),
        url: value.to_string(),
    })?;
    Ok(())
}

fn require_value(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingValue {
            field: field.to_string(),
        });
    }
    Ok(())
}

impl Validate for ForgeFitConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if let Err(e) = self.cms.validate() {
            errors.push(e);
        }
        if let Err(e) = self.auth.validate() {
            errors.push(e);
        }
        if let Err(e) = self.server.validate() {
            errors.push(e);
        }
        if let Err(e) = self.uploads.validate() {
            errors.push(e);
        }
        if let Err(e) = self.cache.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.into_iter().next().unwrap())
        } else {
            Err(ValidationError::Multiple { errors })
        }
    }
}

impl Validate for CmsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        require_value("cms.space_id", &self.space_id)?;
        require_value("cms.environment", &self.environment)?;
        require_value("cms.access_token", &self.access_token)?;
        require_value("cms.management_token", &self.management_token)?;
        require_url("cms.delivery_url", &self.delivery_url)?;
        require_url("cms.management_url", &self.management_url)?;
        require_url("cms.upload_url", &self.upload_url)?;
        Ok(())
    }
}

impl Validate for AuthConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        require_url("auth.url", &self.url)?;
        require_value("auth.public_key", &self.public_key)?;
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        match self.log_level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            _ => {
                return Err(ValidationError::InvalidLogLevel {
                    level: self.log_level.clone(),
                });
            }
        }

        require_value("server.bind_address", &self.bind_address)?;

        if self.port == 0 {
            return Err(ValidationError::InvalidPositive {
                field: "server.port".to_string(),
                value: 0,
            });
        }
        if self.max_body_bytes == 0 {
            return Err(ValidationError::InvalidPositive {
                field: "server.max_body_bytes".to_string(),
                value: 0,
            });
        }
        Ok(())
    }
}

impl Validate for UploadsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.max_concurrency == 0 {
            return Err(ValidationError::InvalidPositive {
                field: "uploads.max_concurrency".to_string(),
                value: 0,
            });
        }
        if self.process_poll_interval_ms == 0 {
            return Err(ValidationError::InvalidPositive {
                field: "uploads.process_poll_interval_ms".to_string(),
                value: 0,
            });
        }
        if self.process_poll_attempts == 0 {
            return Err(ValidationError::InvalidPositive {
                field: "uploads.process_poll_attempts".to_string(),
                value: 0,
            });
        }
        Ok(())
    }
}

impl Validate for CacheConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.list_ttl_secs == 0 {
            return Err(ValidationError::InvalidPositive {
                field: "cache.list_ttl_secs".to_string(),
                value: 0,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_cms() -> CmsConfig {
        CmsConfig {
            space_id: "space1".to_string(),
            environment: "master".to_string(),
            access_token: "cda".to_string(),
            management_token: "cma".to_string(),
            delivery_url: "https://cdn.contentful.com".to_string(),
            management_url: "https://api.contentful.com".to_string(),
            upload_url: "https://upload.contentful.com".to_string(),
        }
    }

    #[test]
    fn test_cms_config_validation() {
        let mut config = valid_cms();
        assert!(config.validate().is_ok());

        config.space_id = "".to_string();
        assert!(config.validate().is_err());

        config = valid_cms();
        config.management_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_server_config_validation() {
        let mut config = ServerConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());

        config.log_level = "info".to_string();
        config.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_uploads_config_validation() {
        let mut config = UploadsConfig::default();
        assert!(config.validate().is_ok());

        config.max_concurrency = 0;
        assert!(config.validate().is_err());
    }
}
