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

//! Tests for the asset upload pipeline: processing polls, ordering,
//! and ledger bookkeeping.

use std::sync::Arc;

use crate::fixtures::*;
use forgefit::cms::{CmsError, ManagementApi};
use forgefit::uploader::{AssetLedger, AssetUploader};
use forgefit_testing::{FailPoint, InMemoryCms};

fn uploader(cms: Arc<InMemoryCms>) -> AssetUploader {
    AssetUploader::new(cms, &test_uploads_config())
}

#[tokio::test]
async fn upload_polls_until_processing_completes() {
    let cms = Arc::new(InMemoryCms::new());
    cms.set_processing_polls(3);
    let uploader = uploader(cms.clone());
    let ledger = AssetLedger::new();

    let link = uploader.upload(pdf("plan.pdf"), &ledger).await.unwrap();

    let asset = cms.get_asset(link.id()).await.unwrap();
    assert!(asset.is_processed());
    assert!(asset.published_version.is_some());
}

#[tokio::test]
async fn upload_gives_up_after_poll_budget() {
    let cms = Arc::new(InMemoryCms::new());
    // More polls required than the config allows (5 attempts)
    cms.set_processing_polls(50);
    let uploader = uploader(cms.clone());
    let ledger = AssetLedger::new();

    let err = uploader.upload(pdf("plan.pdf"), &ledger).await.unwrap_err();
    assert!(matches!(err, CmsError::AssetUnprocessable { .. }));

    // The created draft is in the ledger for the caller to compensate
    assert_eq!(ledger.drain().len(), 1);
}

#[tokio::test]
async fn batch_upload_preserves_input_order() {
    let cms = Arc::new(InMemoryCms::new());
    let uploader = uploader(cms.clone());
    let ledger = AssetLedger::new();

    let files = vec![pdf("a.pdf"), pdf("b.pdf"), pdf("c.pdf"), pdf("d.pdf")];
    let links = uploader.upload_all(files, &ledger).await.unwrap();

    let mut names = Vec::new();
    for link in &links {
        names.push(cms.get_asset(link.id()).await.unwrap().file_name);
    }
    assert_eq!(names, vec!["a.pdf", "b.pdf", "c.pdf", "d.pdf"]);
}

#[tokio::test]
async fn failed_publish_still_records_the_asset() {
    let cms = Arc::new(InMemoryCms::new());
    cms.fail_on(FailPoint::PublishAsset);
    let uploader = uploader(cms.clone());
    let ledger = AssetLedger::new();

    let result = uploader.upload(pdf("plan.pdf"), &ledger).await;
    assert!(result.is_err());

    // Created before the failure, so compensation can find it
    let recorded = ledger.drain();
    assert_eq!(recorded.len(), 1);
    assert!(cms.get_asset(&recorded[0]).await.is_ok());
}

#[tokio::test]
async fn empty_batch_is_a_no_op() {
    let cms = Arc::new(InMemoryCms::new());
    let uploader = uploader(cms.clone());
    let ledger = AssetLedger::new();

    let links = uploader.upload_all(Vec::new(), &ledger).await.unwrap();
    assert!(links.is_empty());
    assert_eq!(cms.asset_count(), 0);
}
