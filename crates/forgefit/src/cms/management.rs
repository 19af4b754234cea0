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

//! HTTP implementation of the CMS management (write) API.
//!
//! Requests carry the management token as a bearer credential; entry
//! and asset mutations send the last observed resource version in the
//! `X-Contentful-Version` header so the CMS can reject concurrent
//! modification with a 409.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::cms::error::CmsError;
use crate::cms::traits::ManagementApi;
use crate::cms::types::{
    AssetRecord, EntryRecord, NewAsset, ProgramFieldSet, WireAsset, WireEntry, WireProgramFields,
    LOCALE, PROGRAM_CONTENT_TYPE,
};
use crate::config::CmsConfig;

const MANAGEMENT_CONTENT_TYPE: &str = "application/vnd.contentful.management.v1+json";

const VERSION_HEADER: &str = "X-Contentful-Version";
const CONTENT_TYPE_HEADER: &str = "X-Contentful-Content-Type";

/// Management API client bound to one space/environment.
#[derive(Debug)]
pub struct HttpManagementApi {
    http: reqwest::Client,
    /// `{management_url}/spaces/{space}/environments/{env}`
    base: String,
    /// `{upload_url}/spaces/{space}/uploads`
    upload_url: String,
    token: String,
}

impl HttpManagementApi {
    pub fn new(config: &CmsConfig) -> Result<Self, CmsError> {
        if config.management_token.is_empty() || config.space_id.is_empty() {
            return Err(CmsError::Configuration(
                "management token and space id are required".to_string(),
            ));
        }

        let base = format!(
            "{}/spaces/{}/environments/{}",
            config.management_url.trim_end_matches('/'),
            config.space_id,
            config.environment
        );
        let upload_url = format!(
            "{}/spaces/{}/uploads",
            config.upload_url.trim_end_matches('/'),
            config.space_id
        );
        // Reject malformed base URLs here instead of on first request
        url::Url::parse(&base)?;
        url::Url::parse(&upload_url)?;

        Ok(Self {
            http: reqwest::Client::new(),
            base,
            upload_url,
            token: config.management_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    /// Map non-success responses onto the error taxonomy. 404 and 409
    /// get dedicated variants; everything else surfaces the response
    /// body as the upstream detail string.
    async fn check(
        resp: reqwest::Response,
        resource: &str,
    ) -> Result<reqwest::Response, CmsError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        match status.as_u16() {
            404 => Err(CmsError::NotFound {
                id: resource.to_string(),
            }),
            409 => Err(CmsError::VersionConflict {
                id: resource.to_string(),
            }),
            code => {
                let message = resp.text().await.unwrap_or_default();
                Err(CmsError::Api { status: code, message })
            }
        }
    }
}

#[async_trait]
impl ManagementApi for HttpManagementApi {
    async fn upload_binary(&self, bytes: Vec<u8>) -> Result<String, CmsError> {
        debug!(bytes = bytes.len(), "uploading binary to CMS");
        let resp = self
            .http
            .post(&self.upload_url)
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await?;
        let resp = Self::check(resp, "upload").await?;
        let body: serde_json::Value = resp.json().await?;
        body["sys"]["id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| CmsError::Api {
                status: 200,
                message: "upload response missing sys.id".to_string(),
            })
    }

    async fn create_asset(&self, draft: NewAsset) -> Result<AssetRecord, CmsError> {
        let payload = json!({
            "fields": {
                "title": { LOCALE: draft.title },
                "description": { LOCALE: "" },
                "file": {
                    LOCALE: {
                        "contentType": draft.content_type,
                        "fileName": draft.file_name,
                        "uploadFrom": {
                            "sys": {
                                "type": "Link",
                                "linkType": "Upload",
                                "id": draft.upload_id,
                            }
                        }
                    }
                }
            }
        });

        let resp = self
            .http
            .post(self.url("assets"))
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, MANAGEMENT_CONTENT_TYPE)
            .json(&payload)
            .send()
            .await?;
        let resp = Self::check(resp, "asset").await?;
        let wire: WireAsset = resp.json().await?;
        Ok(wire.into())
    }

    async fn process_asset(&self, id: &str, version: u64) -> Result<(), CmsError> {
        let resp = self
            .http
            .put(self.url(&format!("assets/{}/files/{}/process", id, LOCALE)))
            .bearer_auth(&self.token)
            .header(VERSION_HEADER, version)
            .send()
            .await?;
        Self::check(resp, id).await?;
        Ok(())
    }

    async fn get_asset(&self, id: &str) -> Result<AssetRecord, CmsError> {
        let resp = self
            .http
            .get(self.url(&format!("assets/{}", id)))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let resp = Self::check(resp, id).await?;
        let wire: WireAsset = resp.json().await?;
        Ok(wire.into())
    }

    async fn publish_asset(&self, id: &str, version: u64) -> Result<AssetRecord, CmsError> {
        let resp = self
            .http
            .put(self.url(&format!("assets/{}/published", id)))
            .bearer_auth(&self.token)
            .header(VERSION_HEADER, version)
            .send()
            .await?;
        let resp = Self::check(resp, id).await?;
        let wire: WireAsset = resp.json().await?;
        Ok(wire.into())
    }

    async fn delete_asset(&self, id: &str) -> Result<(), CmsError> {
        // Unpublish first so the delete is accepted for published
        // assets; the status is ignored since a 404/400 just means
        // there was nothing to unpublish.
        let _ = self
            .http
            .delete(self.url(&format!("assets/{}/published", id)))
            .bearer_auth(&self.token)
            .send()
            .await?;

        let resp = self
            .http
            .delete(self.url(&format!("assets/{}", id)))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::check(resp, id).await?;
        Ok(())
    }

    async fn get_entry(&self, id: &str) -> Result<EntryRecord, CmsError> {
        let resp = self
            .http
            .get(self.url(&format!("entries/{}", id)))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let resp = Self::check(resp, id).await?;
        let wire: WireEntry = resp.json().await?;
        Ok(wire.into())
    }

    async fn create_entry(&self, fields: ProgramFieldSet) -> Result<EntryRecord, CmsError> {
        let wire_fields: WireProgramFields = fields.into();
        let resp = self
            .http
            .post(self.url("entries"))
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, MANAGEMENT_CONTENT_TYPE)
            .header(CONTENT_TYPE_HEADER, PROGRAM_CONTENT_TYPE)
            .json(&json!({ "fields": wire_fields }))
            .send()
            .await?;
        let resp = Self::check(resp, "entry").await?;
        let wire: WireEntry = resp.json().await?;
        Ok(wire.into())
    }

    async fn update_entry(
        &self,
        id: &str,
        version: u64,
        fields: ProgramFieldSet,
    ) -> Result<EntryRecord, CmsError> {
        let wire_fields: WireProgramFields = fields.into();
        let resp = self
            .http
            .put(self.url(&format!("entries/{}", id)))
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, MANAGEMENT_CONTENT_TYPE)
            .header(VERSION_HEADER, version)
            .json(&json!({ "fields": wire_fields }))
            .send()
            .await?;
        let resp = Self::check(resp, id).await?;
        let wire: WireEntry = resp.json().await?;
        Ok(wire.into())
    }

    async fn publish_entry(&self, id: &str, version: u64) -> Result<EntryRecord, CmsError> {
        let resp = self
            .http
            .put(self.url(&format!("entries/{}/published", id)))
            .bearer_auth(&self.token)
            .header(VERSION_HEADER, version)
            .send()
            .await?;
        let resp = Self::check(resp, id).await?;
        let wire: WireEntry = resp.json().await?;
        Ok(wire.into())
    }

    async fn unpublish_entry(&self, id: &str) -> Result<EntryRecord, CmsError> {
        let resp = self
            .http
            .delete(self.url(&format!("entries/{}/published", id)))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let resp = Self::check(resp, id).await?;
        let wire: WireEntry = resp.json().await?;
        Ok(wire.into())
    }

    async fn delete_entry(&self, id: &str) -> Result<(), CmsError> {
        let resp = self
            .http
            .delete(self.url(&format!("entries/{}", id)))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::check(resp, id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CmsConfig;

    #[test]
    fn malformed_base_urls_are_rejected_at_construction() {
        let config = CmsConfig {
            management_url: "not a url".to_string(),
            ..Default::default()
        };
        let err = HttpManagementApi::new(&config).unwrap_err();
        assert!(matches!(err, CmsError::InvalidUrl(_)));

        let config = CmsConfig {
            upload_url: "also not a url".to_string(),
            ..Default::default()
        };
        let err = HttpManagementApi::new(&config).unwrap_err();
        assert!(matches!(err, CmsError::InvalidUrl(_)));
    }
}
