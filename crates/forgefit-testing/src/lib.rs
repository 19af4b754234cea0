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

//! # ForgeFit Testing Utilities
//!
//! In-memory stand-ins for the external services ForgeFit talks to,
//! so orchestration behavior can be tested without a network: an
//! [`InMemoryCms`] that implements both CMS traits with real version
//! and publication semantics, and a [`StaticAccessGuard`] with fixed
//! token-to-role mappings.
//!
//! Failures are injected per operation with [`FailPoint`], optionally
//! after a number of successful calls, which is how compensation
//! paths get exercised.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use forgefit::access::{AccessError, AccessGuard, Principal, ADMIN_ROLE};
use forgefit::cms::{
    AssetLink, AssetRecord, CmsError, DeliveryApi, EntryRecord, ManagementApi, NewAsset,
    ProgramFieldSet,
};
use forgefit::models::{ResolvedAsset, ResolvedProgram};
use forgefit::richtext::RichTextDocument;

/// Operations of the in-memory CMS that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    UploadBinary,
    CreateAsset,
    ProcessAsset,
    PublishAsset,
    DeleteAsset,
    CreateEntry,
    UpdateEntry,
    PublishEntry,
    UnpublishEntry,
    DeleteEntry,
}

#[derive(Debug, Clone)]
struct AssetState {
    version: u64,
    title: String,
    file_name: String,
    content_type: String,
    url: Option<String>,
    published_version: Option<u64>,
}

#[derive(Debug, Clone)]
struct EntryState {
    version: u64,
    fields: ProgramFieldSet,
    /// Snapshot of the fields at the last publish, what delivery sees.
    published_fields: Option<ProgramFieldSet>,
    published_version: Option<u64>,
}

#[derive(Debug, Default)]
struct CmsState {
    uploads: HashMap<String, Vec<u8>>,
    assets: HashMap<String, AssetState>,
    entries: HashMap<String, EntryState>,
    next_id: u64,
    /// FailPoint -> number of successful calls allowed before failing.
    failures: HashMap<FailPoint, u64>,
    deleted_assets: Vec<String>,
    /// get_asset calls remaining before processing completes.
    processing_polls: u64,
}

/// An in-memory CMS with versioned entries, a processed/published
/// asset lifecycle, and injectable failures. Implements both the
/// management and delivery traits so one instance backs the whole
/// stack under test.
#[derive(Debug, Default)]
pub struct InMemoryCms {
    state: Mutex<CmsState>,
}

impl InMemoryCms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `point` fail on its next call and every call after.
    pub fn fail_on(&self, point: FailPoint) {
        self.fail_after(point, 0);
    }

    /// Let `point` succeed `successes` times, then fail every call
    /// after that.
    pub fn fail_after(&self, point: FailPoint, successes: u64) {
        self.lock().failures.insert(point, successes);
    }

    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Require `polls` get_asset calls before an asset reports its
    /// processed URL, to exercise the polling loop.
    pub fn set_processing_polls(&self, polls: u64) {
        self.lock().processing_polls = polls;
    }

    /// Ids passed to delete_asset, in call order.
    pub fn deleted_assets(&self) -> Vec<String> {
        self.lock().deleted_assets.clone()
    }

    pub fn asset_count(&self) -> usize {
        self.lock().assets.len()
    }

    pub fn entry_count(&self) -> usize {
        self.lock().entries.len()
    }

    /// The current management-side view of an entry, if it exists.
    pub fn entry(&self, id: &str) -> Option<EntryRecord> {
        let state = self.lock();
        state.entries.get(id).map(|e| entry_record(id, e))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CmsState> {
        self.state.lock().expect("in-memory CMS poisoned")
    }

    fn check_fail(state: &mut CmsState, point: FailPoint) -> Result<(), CmsError> {
        if let Some(remaining) = state.failures.get_mut(&point) {
            if *remaining == 0 {
                return Err(CmsError::Api {
                    status: 500,
                    message: format!("injected failure at {:?}", point),
                });
            }
            *remaining -= 1;
        }
        Ok(())
    }

    fn next_id(state: &mut CmsState, prefix: &str) -> String {
        state.next_id += 1;
        format!("{}-{}", prefix, state.next_id)
    }
}

fn entry_record(id: &str, entry: &EntryState) -> EntryRecord {
    EntryRecord {
        id: id.to_string(),
        version: entry.version,
        published_version: entry.published_version,
        created_at: None,
        updated_at: None,
        fields: entry.fields.clone(),
    }
}

fn asset_record(id: &str, asset: &AssetState) -> AssetRecord {
    AssetRecord {
        id: id.to_string(),
        version: asset.version,
        title: asset.title.clone(),
        file_name: asset.file_name.clone(),
        content_type: asset.content_type.clone(),
        url: asset.url.clone(),
        published_version: asset.published_version,
    }
}

#[async_trait]
impl ManagementApi for InMemoryCms {
    async fn upload_binary(&self, bytes: Vec<u8>) -> Result<String, CmsError> {
        let mut state = self.lock();
        Self::check_fail(&mut state, FailPoint::UploadBinary)?;
        let id = Self::next_id(&mut state, "upload");
        state.uploads.insert(id.clone(), bytes);
        Ok(id)
    }

    async fn create_asset(&self, draft: NewAsset) -> Result<AssetRecord, CmsError> {
        let mut state = self.lock();
        Self::check_fail(&mut state, FailPoint::CreateAsset)?;

        if !state.uploads.contains_key(&draft.upload_id) {
            return Err(CmsError::NotFound {
                id: draft.upload_id,
            });
        }

        let id = Self::next_id(&mut state, "asset");
        let asset = AssetState {
            version: 1,
            title: draft.title,
            file_name: draft.file_name,
            content_type: draft.content_type,
            url: None,
            published_version: None,
        };
        let record = asset_record(&id, &asset);
        state.assets.insert(id, asset);
        Ok(record)
    }

    async fn process_asset(&self, id: &str, version: u64) -> Result<(), CmsError> {
        let mut state = self.lock();
        Self::check_fail(&mut state, FailPoint::ProcessAsset)?;

        let asset = state
            .assets
            .get(id)
            .ok_or_else(|| CmsError::NotFound { id: id.to_string() })?;
        if asset.version != version {
            return Err(CmsError::VersionConflict { id: id.to_string() });
        }
        Ok(())
    }

    async fn get_asset(&self, id: &str) -> Result<AssetRecord, CmsError> {
        let mut state = self.lock();

        if state.processing_polls > 0 {
            state.processing_polls -= 1;
            let asset = state
                .assets
                .get(id)
                .ok_or_else(|| CmsError::NotFound { id: id.to_string() })?;
            return Ok(asset_record(id, asset));
        }

        let asset = state
            .assets
            .get_mut(id)
            .ok_or_else(|| CmsError::NotFound { id: id.to_string() })?;
        if asset.url.is_none() {
            asset.url = Some(format!("https://assets.test/{}/{}", id, asset.file_name));
            asset.version += 1;
        }
        Ok(asset_record(id, asset))
    }

    async fn publish_asset(&self, id: &str, version: u64) -> Result<AssetRecord, CmsError> {
        let mut state = self.lock();
        Self::check_fail(&mut state, FailPoint::PublishAsset)?;

        let asset = state
            .assets
            .get_mut(id)
            .ok_or_else(|| CmsError::NotFound { id: id.to_string() })?;
        if asset.version != version {
            return Err(CmsError::VersionConflict { id: id.to_string() });
        }
        asset.published_version = Some(asset.version);
        asset.version += 1;
        Ok(asset_record(id, asset))
    }

    async fn delete_asset(&self, id: &str) -> Result<(), CmsError> {
        let mut state = self.lock();
        Self::check_fail(&mut state, FailPoint::DeleteAsset)?;

        state
            .assets
            .remove(id)
            .ok_or_else(|| CmsError::NotFound { id: id.to_string() })?;
        state.deleted_assets.push(id.to_string());
        Ok(())
    }

    async fn get_entry(&self, id: &str) -> Result<EntryRecord, CmsError> {
        let state = self.lock();
        state
            .entries
            .get(id)
            .map(|e| entry_record(id, e))
            .ok_or_else(|| CmsError::NotFound { id: id.to_string() })
    }

    async fn create_entry(&self, fields: ProgramFieldSet) -> Result<EntryRecord, CmsError> {
        let mut state = self.lock();
        Self::check_fail(&mut state, FailPoint::CreateEntry)?;

        let id = Self::next_id(&mut state, "entry");
        let entry = EntryState {
            version: 1,
            fields,
            published_fields: None,
            published_version: None,
        };
        let record = entry_record(&id, &entry);
        state.entries.insert(id, entry);
        Ok(record)
    }

    async fn update_entry(
        &self,
        id: &str,
        version: u64,
        fields: ProgramFieldSet,
    ) -> Result<EntryRecord, CmsError> {
        let mut state = self.lock();
        Self::check_fail(&mut state, FailPoint::UpdateEntry)?;

        let entry = state
            .entries
            .get_mut(id)
            .ok_or_else(|| CmsError::NotFound { id: id.to_string() })?;
        if entry.version != version {
            return Err(CmsError::VersionConflict { id: id.to_string() });
        }
        entry.fields = fields;
        entry.version += 1;
        Ok(entry_record(id, entry))
    }

    async fn publish_entry(&self, id: &str, version: u64) -> Result<EntryRecord, CmsError> {
        let mut state = self.lock();
        Self::check_fail(&mut state, FailPoint::PublishEntry)?;

        let entry = state
            .entries
            .get_mut(id)
            .ok_or_else(|| CmsError::NotFound { id: id.to_string() })?;
        if entry.version != version {
            return Err(CmsError::VersionConflict { id: id.to_string() });
        }
        entry.published_fields = Some(entry.fields.clone());
        entry.published_version = Some(entry.version);
        entry.version += 1;
        Ok(entry_record(id, entry))
    }

    async fn unpublish_entry(&self, id: &str) -> Result<EntryRecord, CmsError> {
        let mut state = self.lock();
        Self::check_fail(&mut state, FailPoint::UnpublishEntry)?;

        let entry = state
            .entries
            .get_mut(id)
            .ok_or_else(|| CmsError::NotFound { id: id.to_string() })?;
        entry.published_fields = None;
        entry.published_version = None;
        Ok(entry_record(id, entry))
    }

    async fn delete_entry(&self, id: &str) -> Result<(), CmsError> {
        let mut state = self.lock();
        Self::check_fail(&mut state, FailPoint::DeleteEntry)?;

        state
            .entries
            .remove(id)
            .ok_or_else(|| CmsError::NotFound { id: id.to_string() })?;
        Ok(())
    }
}

fn empty_document() -> RichTextDocument {
    RichTextDocument {
        node_type: "document".to_string(),
        data: Default::default(),
        content: Vec::new(),
    }
}

/// Resolve a link to its published asset, mirroring the delivery
/// API's behavior of dropping links whose target is gone.
fn resolve_link(state: &CmsState, link: &AssetLink) -> Option<ResolvedAsset> {
    let asset = state.assets.get(link.id())?;
    asset.published_version?;
    let url = asset.url.clone()?;
    Some(ResolvedAsset {
        id: link.id().to_string(),
        title: asset.title.clone(),
        file_name: asset.file_name.clone(),
        content_type: asset.content_type.clone(),
        url,
    })
}

fn resolve_program(state: &CmsState, id: &str, fields: &ProgramFieldSet) -> ResolvedProgram {
    ResolvedProgram {
        id: id.to_string(),
        program_name: fields.program_name.clone(),
        program_information: fields
            .program_information
            .clone()
            .unwrap_or_else(empty_document),
        program_image: fields
            .program_image
            .as_ref()
            .and_then(|link| resolve_link(state, link)),
        program_assets: fields
            .program_assets
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|link| resolve_link(state, link))
            .collect(),
        difficulty: fields.difficulty,
        level: fields.level,
        duration: fields.duration,
    }
}

#[async_trait]
impl DeliveryApi for InMemoryCms {
    async fn list_programs(&self) -> Result<Vec<ResolvedProgram>, CmsError> {
        let state = self.lock();
        Ok(state
            .entries
            .iter()
            .filter_map(|(id, entry)| {
                entry.published_fields.as_ref().map(|fields| {
                    let mut program = resolve_program(&state, id, fields);
                    // The production list query selects only the id,
                    // name, information and asset links; difficulty,
                    // level and duration come back on detail reads.
                    program.difficulty = None;
                    program.level = None;
                    program.duration = None;
                    program
                })
            })
            .collect())
    }

    async fn get_program(&self, id: &str) -> Result<ResolvedProgram, CmsError> {
        let state = self.lock();
        state
            .entries
            .get(id)
            .and_then(|entry| entry.published_fields.as_ref())
            .map(|fields| resolve_program(&state, id, fields))
            .ok_or_else(|| CmsError::NotFound { id: id.to_string() })
    }
}

/// Access guard with a fixed token-to-role table. Unknown tokens are
/// unauthenticated; known tokens without the admin role are forbidden.
#[derive(Debug, Default)]
pub struct StaticAccessGuard {
    roles: HashMap<String, String>,
}

impl StaticAccessGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A guard that accepts `token` as an admin session.
    pub fn with_admin(token: impl Into<String>) -> Self {
        let mut guard = Self::new();
        guard.add_token(token, ADMIN_ROLE);
        guard
    }

    pub fn add_token(&mut self, token: impl Into<String>, role: impl Into<String>) {
        self.roles.insert(token.into(), role.into());
    }
}

#[async_trait]
impl AccessGuard for StaticAccessGuard {
    async fn authorize_admin(&self, token: &str) -> Result<Principal, AccessError> {
        let role = self
            .roles
            .get(token)
            .ok_or(AccessError::Unauthenticated)?;
        if role == ADMIN_ROLE {
            Ok(Principal {
                id: format!("user-{}", token),
                role: role.clone(),
            })
        } else {
            Err(AccessError::Forbidden)
        }
    }
}
