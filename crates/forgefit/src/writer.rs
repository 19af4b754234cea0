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

//! Entry write path: field assembly, versioned update, publish, and
//! unpublish-then-delete.
//!
//! Publication state after partial failure is deliberate and
//! documented: a publish failure after a successful update leaves the
//! entry modified-but-unpublished (not retried, not rolled back); a
//! delete failure after a successful unpublish leaves the entry
//! unpublished-but-present. A publish failure after a successful
//! create deletes the invisible draft best-effort.

use std::sync::Arc;
use tracing::warn;

use crate::cms::{CmsError, EntryRecord, ManagementApi, ProgramFieldSet};

pub struct EntryWriter {
    management: Arc<dyn ManagementApi>,
}

impl EntryWriter {
    pub fn new(management: Arc<dyn ManagementApi>) -> Self {
        Self { management }
    }

    /// Load an entry with its current version for a later versioned
    /// update. Fails with [`CmsError::NotFound`] if absent.
    pub async fn load(&self, id: &str) -> Result<EntryRecord, CmsError> {
        self.management.get_entry(id).await
    }

    /// Create and publish a new entry.
    ///
    /// If the publish step fails the draft is deleted best-effort so
    /// no half-created record accumulates; the publish error is what
    /// propagates either way.
    pub async fn create(&self, fields: ProgramFieldSet) -> Result<EntryRecord, CmsError> {
        let draft = self.management.create_entry(fields).await?;

        match self.management.publish_entry(&draft.id, draft.version).await {
            Ok(published) => Ok(published),
            Err(publish_err) => {
                if let Err(cleanup_err) = self.management.delete_entry(&draft.id).await {
                    warn!(
                        entry = %draft.id,
                        error = %cleanup_err,
                        "compensating delete of unpublished entry failed"
                    );
                }
                Err(publish_err)
            }
        }
    }

    /// Overwrite an entry's fields at the given version and publish
    /// the result. A concurrent modification surfaces as
    /// [`CmsError::VersionConflict`]; a publish failure leaves the
    /// entry modified-but-unpublished.
    pub async fn update(
        &self,
        id: &str,
        version: u64,
        fields: ProgramFieldSet,
    ) -> Result<EntryRecord, CmsError> {
        let updated = self.management.update_entry(id, version, fields).await?;
        self.management
            .publish_entry(&updated.id, updated.version)
            .await
    }

    /// Unpublish then hard-delete, in that order. If unpublish
    /// succeeds and delete fails, the entry stays unpublished-but-
    /// present; no reconciliation is attempted.
    pub async fn delete(&self, id: &str) -> Result<(), CmsError> {
        self.management.unpublish_entry(id).await?;
        self.management.delete_entry(id).await
    }
}
