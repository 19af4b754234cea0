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

//! Tests for versioned entry writes and their partial-failure states.

use std::sync::Arc;

use forgefit::cms::{CmsError, ProgramFieldSet};
use forgefit::writer::EntryWriter;
use forgefit_testing::{FailPoint, InMemoryCms};

fn fields(name: &str) -> ProgramFieldSet {
    ProgramFieldSet {
        program_name: name.to_string(),
        program_information: Some(forgefit::to_rich_text("plan")),
        ..Default::default()
    }
}

#[tokio::test]
async fn create_publishes_the_entry() {
    let cms = Arc::new(InMemoryCms::new());
    let writer = EntryWriter::new(cms.clone());

    let entry = writer.create(fields("New")).await.unwrap();
    assert!(entry.published_version.is_some());
    assert_eq!(cms.entry_count(), 1);
}

#[tokio::test]
async fn stale_version_update_is_a_conflict() {
    let cms = Arc::new(InMemoryCms::new());
    let writer = EntryWriter::new(cms.clone());

    let entry = writer.create(fields("Original")).await.unwrap();
    let loaded = writer.load(&entry.id).await.unwrap();

    // Another writer gets in first
    writer
        .update(&entry.id, loaded.version, fields("Theirs"))
        .await
        .unwrap();

    // Our update still carries the version we loaded
    let err = writer
        .update(&entry.id, loaded.version, fields("Ours"))
        .await
        .unwrap_err();
    assert!(matches!(err, CmsError::VersionConflict { .. }));

    // The first write won
    let current = cms.entry(&entry.id).unwrap();
    assert_eq!(current.fields.program_name, "Theirs");
}

#[tokio::test]
async fn publish_failure_on_create_removes_the_draft() {
    let cms = Arc::new(InMemoryCms::new());
    let writer = EntryWriter::new(cms.clone());
    cms.fail_on(FailPoint::PublishEntry);

    let result = writer.create(fields("Never Published")).await;
    assert!(result.is_err());
    assert_eq!(cms.entry_count(), 0);
}

#[tokio::test]
async fn publish_failure_on_update_leaves_entry_modified_unpublished() {
    let cms = Arc::new(InMemoryCms::new());
    let writer = EntryWriter::new(cms.clone());

    let entry = writer.create(fields("Published")).await.unwrap();
    let loaded = writer.load(&entry.id).await.unwrap();

    cms.fail_on(FailPoint::PublishEntry);
    let result = writer
        .update(&entry.id, loaded.version, fields("Changed"))
        .await;
    assert!(result.is_err());

    // The management side holds the new fields, but the published
    // snapshot still shows the old ones
    let current = cms.entry(&entry.id).unwrap();
    assert_eq!(current.fields.program_name, "Changed");
    assert!(current.published_version.unwrap() < current.version);
}

#[tokio::test]
async fn delete_failure_leaves_entry_unpublished_but_present() {
    let cms = Arc::new(InMemoryCms::new());
    let writer = EntryWriter::new(cms.clone());

    let entry = writer.create(fields("Sticky")).await.unwrap();
    cms.fail_on(FailPoint::DeleteEntry);

    let result = writer.delete(&entry.id).await;
    assert!(result.is_err());

    let current = cms.entry(&entry.id).unwrap();
    assert!(current.published_version.is_none());
}

#[tokio::test]
async fn delete_of_missing_entry_is_not_found() {
    let cms = Arc::new(InMemoryCms::new());
    let writer = EntryWriter::new(cms.clone());

    let err = writer.delete("missing").await.unwrap_err();
    assert!(matches!(err, CmsError::NotFound { .. }));
}
