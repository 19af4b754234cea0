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

//! Program CRUD orchestration.
//!
//! [`ProgramService`] is the single entry point the HTTP layer calls
//! for writes. Each operation validates its input before any external
//! call, runs the asset and entry pipelines, invalidates the catalog
//! cache on success, and compensates created assets best-effort on
//! failure. Operations are not idempotent: submitting the same add
//! twice creates two entries.

use std::sync::Arc;
use tracing::{info, warn};

use crate::cms::{AssetLink, CmsError, EntryRecord, ManagementApi, ProgramFieldSet};
use crate::config::UploadsConfig;
use crate::error::ProgramError;
use crate::models::{AssetSource, Difficulty, Level, DURATION_MINUTES};
use crate::reader::ProgramReader;
use crate::richtext::to_rich_text;
use crate::uploader::{AssetLedger, AssetUploader};
use crate::writer::EntryWriter;

/// A reference to an asset that already exists upstream, carried
/// through an edit instead of re-uploading its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRef(pub String);

impl EntryRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Input for [`ProgramService::add`]. Name and information are
/// required; everything else is optional on create.
#[derive(Debug, Clone, Default)]
pub struct NewProgram {
    pub name: String,
    pub information: String,
    pub image: Option<AssetSource>,
    pub attachments: Vec<AssetSource>,
    pub difficulty: Option<Difficulty>,
    pub level: Option<Level>,
    pub duration: Option<u32>,
}

impl NewProgram {
    pub fn new(name: impl Into<String>, information: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            information: information.into(),
            ..Default::default()
        }
    }
}

/// Input for [`ProgramService::edit`]. The attachment list is a full
/// replacement: new uploads first, then retained references, and an
/// empty combination clears the field upstream. The image must be
/// either a new upload or a retained reference.
#[derive(Debug, Clone, Default)]
pub struct ProgramUpdate {
    pub name: String,
    pub information: String,
    pub new_image: Option<AssetSource>,
    pub retained_image: Option<EntryRef>,
    pub new_attachments: Vec<AssetSource>,
    pub retained_attachments: Vec<EntryRef>,
    pub difficulty: Option<Difficulty>,
    pub level: Option<Level>,
    pub duration: Option<u32>,
}

pub struct ProgramService {
    management: Arc<dyn ManagementApi>,
    uploader: AssetUploader,
    writer: EntryWriter,
    reader: Arc<ProgramReader>,
}

impl ProgramService {
    pub fn new(
        management: Arc<dyn ManagementApi>,
        reader: Arc<ProgramReader>,
        uploads: &UploadsConfig,
    ) -> Self {
        Self {
            uploader: AssetUploader::new(management.clone(), uploads),
            writer: EntryWriter::new(management.clone()),
            management,
            reader,
        }
    }

    /// Create and publish a new program.
    ///
    /// Uploads the cover image and attachments, then creates and
    /// publishes the entry. Any failure after assets were created
    /// triggers best-effort compensating deletes of those assets.
    pub async fn add(&self, program: NewProgram) -> Result<EntryRecord, ProgramError> {
        validate_new(&program)?;

        let ledger = AssetLedger::new();
        let result = self.add_inner(program, &ledger).await;
        if result.is_err() {
            self.compensate(&ledger).await;
        }
        result
    }

    async fn add_inner(
        &self,
        program: NewProgram,
        ledger: &AssetLedger,
    ) -> Result<EntryRecord, ProgramError> {
        let image_link = match program.image {
            Some(file) => Some(self.uploader.upload(file, ledger).await?),
            None => None,
        };

        let attachment_links = self
            .uploader
            .upload_all(program.attachments, ledger)
            .await?;

        let fields = ProgramFieldSet {
            program_name: program.name.trim().to_string(),
            program_information: Some(to_rich_text(&program.information)),
            program_image: image_link,
            // On create an empty attachment set omits the field
            // instead of writing an empty list.
            program_assets: if attachment_links.is_empty() {
                None
            } else {
                Some(attachment_links)
            },
            difficulty: program.difficulty,
            level: program.level,
            duration: program.duration,
        };

        let entry = self.writer.create(fields).await?;
        self.reader.invalidate().await;
        info!(entry = %entry.id, "program created");
        Ok(entry)
    }

    /// Replace a program's fields wholesale and republish it.
    ///
    /// The entry is loaded first so the update carries its current
    /// version; a concurrent modification upstream surfaces as
    /// [`ProgramError::Conflict`]. Retained assets are linked by
    /// reference without touching their bytes.
    pub async fn edit(&self, id: &str, update: ProgramUpdate) -> Result<EntryRecord, ProgramError> {
        validate_update(&update)?;

        let current = self.writer.load(id).await.map_err(map_entry_error(id))?;

        let ledger = AssetLedger::new();
        let result = self.edit_inner(&current, update, &ledger).await;
        if result.is_err() {
            self.compensate(&ledger).await;
        }
        result
    }

    async fn edit_inner(
        &self,
        current: &EntryRecord,
        update: ProgramUpdate,
        ledger: &AssetLedger,
    ) -> Result<EntryRecord, ProgramError> {
        let image_link = if let Some(file) = update.new_image {
            self.uploader.upload(file, ledger).await?
        } else if let Some(reference) = update.retained_image {
            AssetLink::new(reference.0)
        } else {
            // validate_update already rejected this shape
            return Err(ProgramError::Validation(
                "a program image is required".to_string(),
            ));
        };

        let mut attachment_links = self
            .uploader
            .upload_all(update.new_attachments, ledger)
            .await?;
        attachment_links.extend(
            update
                .retained_attachments
                .into_iter()
                .map(|reference| AssetLink::new(reference.0)),
        );

        let fields = ProgramFieldSet {
            program_name: update.name.trim().to_string(),
            program_information: Some(to_rich_text(&update.information)),
            program_image: Some(image_link),
            // On edit an empty set is an explicit clear.
            program_assets: Some(attachment_links),
            difficulty: update.difficulty,
            level: update.level,
            duration: update.duration,
        };

        let entry = self
            .writer
            .update(&current.id, current.version, fields)
            .await
            .map_err(map_entry_error(&current.id))?;
        self.reader.invalidate().await;
        info!(entry = %entry.id, "program updated");
        Ok(entry)
    }

    /// Unpublish and delete a program. Fails with
    /// [`ProgramError::NotFound`] if the entry does not exist.
    pub async fn remove(&self, id: &str) -> Result<(), ProgramError> {
        self.writer.delete(id).await.map_err(map_entry_error(id))?;
        self.reader.invalidate().await;
        info!(entry = %id, "program deleted");
        Ok(())
    }

    /// Best-effort delete of every asset the failed orchestration
    /// created. Individual failures are logged and swallowed; the
    /// original error is what the caller sees.
    async fn compensate(&self, ledger: &AssetLedger) {
        for asset_id in ledger.drain() {
            if let Err(e) = self.management.delete_asset(&asset_id).await {
                warn!(asset = %asset_id, error = %e, "compensating asset delete failed");
            } else {
                info!(asset = %asset_id, "compensated orphaned asset");
            }
        }
    }
}

fn map_entry_error(id: &str) -> impl FnOnce(CmsError) -> ProgramError + '_ {
    move |e| match e {
        CmsError::NotFound { .. } => ProgramError::NotFound { id: id.to_string() },
        CmsError::VersionConflict { .. } => ProgramError::Conflict { id: id.to_string() },
        other => ProgramError::Upstream(other),
    }
}

fn validate_duration(duration: Option<u32>) -> Result<(), ProgramError> {
    if let Some(minutes) = duration {
        if !DURATION_MINUTES.contains(&minutes) {
            return Err(ProgramError::Validation(format!(
                "duration must be between {} and {} minutes",
                DURATION_MINUTES.start(),
                DURATION_MINUTES.end()
            )));
        }
    }
    Ok(())
}

fn validate_new(program: &NewProgram) -> Result<(), ProgramError> {
    if program.name.trim().is_empty() {
        return Err(ProgramError::Validation(
            "program name is required".to_string(),
        ));
    }
    if program.information.trim().is_empty() {
        return Err(ProgramError::Validation(
            "program information is required".to_string(),
        ));
    }
    validate_duration(program.duration)
}

fn validate_update(update: &ProgramUpdate) -> Result<(), ProgramError> {
    if update.name.trim().is_empty() {
        return Err(ProgramError::Validation(
            "program name is required".to_string(),
        ));
    }
    if update.information.trim().is_empty() {
        return Err(ProgramError::Validation(
            "program information is required".to_string(),
        ));
    }
    if update.new_image.is_none() && update.retained_image.is_none() {
        return Err(ProgramError::Validation(
            "a program image is required: upload a new one or keep the existing one".to_string(),
        ));
    }
    validate_duration(update.duration)
}
