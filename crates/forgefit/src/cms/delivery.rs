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

//! HTTP implementation of the CMS delivery (read) API.
//!
//! Queries request only the fields the views consume and ask the CMS
//! to include linked assets one level deep. Links whose target asset
//! is missing from the `includes` block (deleted assets) are dropped
//! during resolution rather than failing the read.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::cms::error::CmsError;
use crate::cms::traits::DeliveryApi;
use crate::cms::types::{
    AssetLink, DeliveryAsset, DeliveryCollection, DeliveryEntry, PROGRAM_CONTENT_TYPE,
};
use crate::config::CmsConfig;
use crate::models::{ResolvedAsset, ResolvedProgram};
use crate::richtext::RichTextDocument;

const SELECT_FIELDS: &str =
    "sys.id,fields.programName,fields.programInformation,fields.programImage,fields.programAssets";

/// Delivery API client bound to one space/environment.
#[derive(Debug)]
pub struct HttpDeliveryApi {
    http: reqwest::Client,
    /// `{delivery_url}/spaces/{space}/environments/{env}`
    base: String,
    access_token: String,
}

impl HttpDeliveryApi {
    pub fn new(config: &CmsConfig) -> Result<Self, CmsError> {
        if config.access_token.is_empty() || config.space_id.is_empty() {
            return Err(CmsError::Configuration(
                "delivery access token and space id are required".to_string(),
            ));
        }

        let base = format!(
            "{}/spaces/{}/environments/{}",
            config.delivery_url.trim_end_matches('/'),
            config.space_id,
            config.environment
        );
        // Reject a malformed base URL here instead of on first request
        url::Url::parse(&base)?;

        Ok(Self {
            http: reqwest::Client::new(),
            base,
            access_token: config.access_token.clone(),
        })
    }

    async fn fetch_collection(
        &self,
        extra_params: &[(&str, &str)],
    ) -> Result<DeliveryCollection, CmsError> {
        let mut params: Vec<(&str, &str)> = vec![
            ("access_token", self.access_token.as_str()),
            ("content_type", PROGRAM_CONTENT_TYPE),
            ("include", "1"),
        ];
        params.extend_from_slice(extra_params);

        let resp = self
            .http
            .get(format!("{}/entries", self.base))
            .query(&params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(CmsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }
}

/// Build an id → resolved-asset map from the `includes` block. Assets
/// without file details (still processing, or withheld) are skipped.
fn asset_index(assets: &[DeliveryAsset]) -> HashMap<String, ResolvedAsset> {
    assets
        .iter()
        .filter_map(|asset| {
            let fields = asset.fields.as_ref()?;
            let file = fields.file.as_ref()?;
            Some((
                asset.sys.id.clone(),
                ResolvedAsset {
                    id: asset.sys.id.clone(),
                    title: fields
                        .title
                        .clone()
                        .unwrap_or_else(|| file.file_name.clone()),
                    file_name: file.file_name.clone(),
                    content_type: file.content_type.clone(),
                    url: file.url.clone(),
                },
            ))
        })
        .collect()
}

fn resolve_entry(
    entry: DeliveryEntry,
    assets: &HashMap<String, ResolvedAsset>,
) -> ResolvedProgram {
    let resolve = |link: &AssetLink| assets.get(link.id()).cloned();

    ResolvedProgram {
        id: entry.sys.id,
        program_name: entry.fields.program_name.unwrap_or_default(),
        program_information: entry.fields.program_information.unwrap_or_else(|| {
            RichTextDocument {
                node_type: "document".to_string(),
                data: Default::default(),
                content: Vec::new(),
            }
        }),
        program_image: entry.fields.program_image.as_ref().and_then(resolve),
        program_assets: entry
            .fields
            .program_assets
            .iter()
            .filter_map(resolve)
            .collect(),
        difficulty: entry.fields.difficulty.and_then(|d| d.parse().ok()),
        level: entry.fields.level.and_then(|l| l.parse().ok()),
        duration: entry.fields.duration,
    }
}

#[async_trait]
impl DeliveryApi for HttpDeliveryApi {
    async fn list_programs(&self) -> Result<Vec<ResolvedProgram>, CmsError> {
        let collection = self
            .fetch_collection(&[("select", SELECT_FIELDS), ("order", "fields.programName")])
            .await?;

        let assets = asset_index(&collection.includes.assets);
        Ok(collection
            .items
            .into_iter()
            .map(|entry| resolve_entry(entry, &assets))
            .collect())
    }

    async fn get_program(&self, id: &str) -> Result<ResolvedProgram, CmsError> {
        // The single-entry endpoint does not return includes, so link
        // resolution goes through a filtered collection query instead.
        let collection = self.fetch_collection(&[("sys.id", id)]).await?;

        let assets = asset_index(&collection.includes.assets);
        collection
            .items
            .into_iter()
            .next()
            .map(|entry| resolve_entry(entry, &assets))
            .ok_or_else(|| CmsError::NotFound { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_collection() -> DeliveryCollection {
        serde_json::from_value(serde_json::json!({
            "items": [
                {
                    "sys": {"id": "e1"},
                    "fields": {
                        "programName": "5K Starter",
                        "programImage": {"sys": {"type": "Link", "linkType": "Asset", "id": "a1"}},
                        "programAssets": [
                            {"sys": {"type": "Link", "linkType": "Asset", "id": "a2"}},
                            {"sys": {"type": "Link", "linkType": "Asset", "id": "gone"}}
                        ]
                    }
                }
            ],
            "includes": {
                "Asset": [
                    {
                        "sys": {"id": "a1"},
                        "fields": {
                            "title": "cover.jpg",
                            "file": {"url": "//assets.test/a1/cover.jpg", "fileName": "cover.jpg", "contentType": "image/jpeg"}
                        }
                    },
                    {
                        "sys": {"id": "a2"},
                        "fields": {
                            "title": "plan.pdf",
                            "file": {"url": "//assets.test/a2/plan.pdf", "fileName": "plan.pdf", "contentType": "application/pdf"}
                        }
                    }
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn resolves_links_against_includes() {
        let collection = sample_collection();
        let assets = asset_index(&collection.includes.assets);
        let program = resolve_entry(collection.items.into_iter().next().unwrap(), &assets);

        assert_eq!(program.program_name, "5K Starter");
        assert_eq!(program.program_image.as_ref().unwrap().id, "a1");
        assert_eq!(program.program_assets.len(), 1);
        assert_eq!(program.program_assets[0].file_name, "plan.pdf");
    }

    #[test]
    fn malformed_delivery_url_is_rejected_at_construction() {
        let config = crate::config::CmsConfig {
            delivery_url: "not a url".to_string(),
            ..Default::default()
        };
        let err = HttpDeliveryApi::new(&config).unwrap_err();
        assert!(matches!(err, CmsError::InvalidUrl(_)));
    }

    #[test]
    fn unresolvable_links_are_dropped_not_errors() {
        let collection = sample_collection();
        let assets = asset_index(&collection.includes.assets);
        let program = resolve_entry(collection.items.into_iter().next().unwrap(), &assets);

        // "gone" was linked but absent from includes
        assert!(program.program_assets.iter().all(|a| a.id != "gone"));
    }
}
