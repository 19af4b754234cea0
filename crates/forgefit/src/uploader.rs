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

//! Asset upload pipeline: upload bytes → create draft → process →
//! publish → link.
//!
//! A failure at any step aborts that upload and propagates. Ids of
//! assets that reached creation are recorded in an [`AssetLedger`] as
//! soon as they exist, so a failing orchestration can issue
//! best-effort compensating deletes; the CMS itself performs no
//! rollback and an aborted upload may leave an unpublished draft
//! behind if compensation also fails.
//!
//! Multiple files fan out with bounded concurrency. The returned link
//! list preserves input order regardless of completion order.

use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

use crate::cms::{AssetLink, CmsError, ManagementApi, NewAsset};
use crate::config::UploadsConfig;
use crate::models::AssetSource;

/// Records ids of assets created during one orchestration, for
/// best-effort compensation if a later step fails.
#[derive(Debug, Default)]
pub struct AssetLedger {
    created: Mutex<Vec<String>>,
}

impl AssetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, asset_id: impl Into<String>) {
        self.created
            .lock()
            .expect("asset ledger poisoned")
            .push(asset_id.into());
    }

    /// Take all recorded ids, leaving the ledger empty.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.created.lock().expect("asset ledger poisoned"))
    }
}

/// Executes the create/process/publish sequence against a management
/// client.
pub struct AssetUploader {
    management: Arc<dyn ManagementApi>,
    max_concurrency: usize,
    poll_interval: Duration,
    poll_attempts: u32,
}

impl AssetUploader {
    pub fn new(management: Arc<dyn ManagementApi>, config: &UploadsConfig) -> Self {
        Self {
            management,
            max_concurrency: config.max_concurrency.max(1) as usize,
            poll_interval: Duration::from_millis(config.process_poll_interval_ms),
            poll_attempts: config.process_poll_attempts,
        }
    }

    /// Upload one file and return a link to the published asset.
    ///
    /// The created asset id is recorded in `ledger` before processing
    /// begins, so it is compensatable even when a later step fails.
    pub async fn upload(
        &self,
        file: AssetSource,
        ledger: &AssetLedger,
    ) -> Result<AssetLink, CmsError> {
        let file_name = file.file_name.clone();
        debug!(file = %file_name, "uploading asset");

        let upload_id = self.management.upload_binary(file.bytes).await?;

        let draft = self
            .management
            .create_asset(NewAsset {
                title: file.file_name.clone(),
                file_name: file.file_name,
                content_type: file.content_type,
                upload_id,
            })
            .await?;
        ledger.record(&draft.id);

        self.management
            .process_asset(&draft.id, draft.version)
            .await?;
        let processed = self.wait_processed(&draft.id).await?;

        let published = self
            .management
            .publish_asset(&processed.id, processed.version)
            .await?;

        debug!(file = %file_name, asset = %published.id, "asset published");
        Ok(AssetLink::new(published.id))
    }

    /// Upload a batch, preserving input order in the returned links.
    /// The first failure aborts the batch; uploads already created are
    /// in the ledger for compensation.
    pub async fn upload_all(
        &self,
        files: Vec<AssetSource>,
        ledger: &AssetLedger,
    ) -> Result<Vec<AssetLink>, CmsError> {
        stream::iter(files.into_iter().map(|file| self.upload(file, ledger)))
            .buffered(self.max_concurrency)
            .try_collect()
            .await
    }

    /// Poll the asset until the CMS reports file ingestion complete.
    async fn wait_processed(
        &self,
        id: &str,
    ) -> Result<crate::cms::AssetRecord, CmsError> {
        for _ in 0..self.poll_attempts {
            let asset = self.management.get_asset(id).await?;
            if asset.is_processed() {
                return Ok(asset);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
        Err(CmsError::AssetUnprocessable { id: id.to_string() })
    }
}
