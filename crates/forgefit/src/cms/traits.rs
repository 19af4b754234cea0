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

//! Core trait definitions for the CMS boundary.
//!
//! [`ManagementApi`] covers the write path (assets and entries),
//! [`DeliveryApi`] the published read path. Orchestration code holds
//! these as trait objects so HTTP clients and in-memory test backends
//! are interchangeable.

use async_trait::async_trait;

use crate::cms::error::CmsError;
use crate::cms::types::{AssetRecord, EntryRecord, NewAsset, ProgramFieldSet};
use crate::models::ResolvedProgram;

/// Write access to the CMS management API.
///
/// Every mutation is a single external call; sequencing (upload →
/// create → process → publish) belongs to the callers.
#[async_trait]
pub trait ManagementApi: Send + Sync {
    /// Upload raw bytes, returning the upload id a draft asset can
    /// reference.
    async fn upload_binary(&self, bytes: Vec<u8>) -> Result<String, CmsError>;

    /// Create a draft asset referencing an uploaded binary.
    async fn create_asset(&self, draft: NewAsset) -> Result<AssetRecord, CmsError>;

    /// Ask the CMS to ingest/validate the draft's file for all
    /// configured locales. Completion is observed via [`Self::get_asset`].
    async fn process_asset(&self, id: &str, version: u64) -> Result<(), CmsError>;

    async fn get_asset(&self, id: &str) -> Result<AssetRecord, CmsError>;

    /// Publish a processed asset, making its file URL publicly
    /// resolvable.
    async fn publish_asset(&self, id: &str, version: u64) -> Result<AssetRecord, CmsError>;

    /// Unpublish (if needed) and delete an asset. Used only for
    /// best-effort compensation; failures are reported, never retried.
    async fn delete_asset(&self, id: &str) -> Result<(), CmsError>;

    async fn get_entry(&self, id: &str) -> Result<EntryRecord, CmsError>;

    async fn create_entry(&self, fields: ProgramFieldSet) -> Result<EntryRecord, CmsError>;

    /// Overwrite an entry's fields. `version` is the last version the
    /// caller observed; a mismatch fails with
    /// [`CmsError::VersionConflict`] instead of silently overwriting.
    async fn update_entry(
        &self,
        id: &str,
        version: u64,
        fields: ProgramFieldSet,
    ) -> Result<EntryRecord, CmsError>;

    async fn publish_entry(&self, id: &str, version: u64) -> Result<EntryRecord, CmsError>;

    async fn unpublish_entry(&self, id: &str) -> Result<EntryRecord, CmsError>;

    async fn delete_entry(&self, id: &str) -> Result<(), CmsError>;
}

/// Read access to published program entries, with link resolution.
#[async_trait]
pub trait DeliveryApi: Send + Sync {
    /// All published programs, `programName` ascending. Unresolvable
    /// asset links are dropped, never an error.
    async fn list_programs(&self) -> Result<Vec<ResolvedProgram>, CmsError>;

    /// One published program by entry id, or [`CmsError::NotFound`].
    async fn get_program(&self, id: &str) -> Result<ResolvedProgram, CmsError>;
}
