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

//! End-to-end tests for the add / edit / remove orchestration against
//! the in-memory CMS.

use crate::fixtures::*;
use forgefit::models::{Difficulty, Level};
use forgefit::programs::{EntryRef, NewProgram, ProgramUpdate};
use forgefit::ProgramError;
use forgefit_testing::FailPoint;

#[tokio::test]
async fn add_publishes_entry_with_uploaded_assets() {
    let (cms, reader, service) = test_stack();

    let entry = service.add(sample_program("5K Starter")).await.unwrap();
    assert!(entry.published_version.is_some());

    let program = reader.get_program(&entry.id).await.unwrap();
    assert_eq!(program.program_name, "5K Starter");
    assert!(program.program_image.is_some());
    assert_eq!(program.program_assets.len(), 2);
    // Attachment order follows submission order
    assert_eq!(program.program_assets[0].file_name, "week1.pdf");
    assert_eq!(program.program_assets[1].file_name, "week2.pdf");

    assert_eq!(cms.entry_count(), 1);
    assert_eq!(cms.asset_count(), 3);
}

#[tokio::test]
async fn add_without_image_or_attachments_is_allowed() {
    let (cms, reader, service) = test_stack();

    let entry = service
        .add(NewProgram::new("Bodyweight Basics", "No equipment needed."))
        .await
        .unwrap();

    let program = reader.get_program(&entry.id).await.unwrap();
    assert!(program.program_image.is_none());
    assert!(program.program_assets.is_empty());
    assert_eq!(cms.asset_count(), 0);
}

#[tokio::test]
async fn add_rejects_missing_fields_before_any_upload() {
    let (cms, _reader, service) = test_stack();

    let mut missing_name = sample_program("");
    missing_name.name = "   ".to_string();
    let err = service.add(missing_name).await.unwrap_err();
    assert!(matches!(err, ProgramError::Validation(_)));

    let missing_info = NewProgram::new("Name", "");
    let err = service.add(missing_info).await.unwrap_err();
    assert!(matches!(err, ProgramError::Validation(_)));

    // Nothing reached the CMS
    assert_eq!(cms.entry_count(), 0);
    assert_eq!(cms.asset_count(), 0);
}

#[tokio::test]
async fn add_is_not_idempotent() {
    let (cms, reader, service) = test_stack();

    service.add(sample_program("Repeat Me")).await.unwrap();
    service.add(sample_program("Repeat Me")).await.unwrap();

    assert_eq!(cms.entry_count(), 2);
    let listed = reader.list_programs().await.unwrap();
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn add_compensates_assets_when_entry_create_fails() {
    let (cms, _reader, service) = test_stack();
    cms.fail_on(FailPoint::CreateEntry);

    let err = service.add(sample_program("Doomed")).await.unwrap_err();
    assert!(matches!(err, ProgramError::Upstream(_)));

    // All three created assets were deleted best-effort
    assert_eq!(cms.deleted_assets().len(), 3);
    assert_eq!(cms.asset_count(), 0);
    assert_eq!(cms.entry_count(), 0);
}

#[tokio::test]
async fn add_compensates_assets_created_before_a_failed_upload() {
    let (cms, _reader, service) = test_stack();
    // Image succeeds, the first attachment's asset creation fails
    cms.fail_after(FailPoint::CreateAsset, 1);

    let err = service.add(sample_program("Partial")).await.unwrap_err();
    assert!(matches!(err, ProgramError::Upstream(_)));

    assert!(!cms.deleted_assets().is_empty());
    assert_eq!(cms.asset_count(), 0);
    assert_eq!(cms.entry_count(), 0);
}

#[tokio::test]
async fn edit_replaces_fields_and_retains_assets_by_reference() {
    let (cms, reader, service) = test_stack();

    let entry = service.add(sample_program("Before")).await.unwrap();
    let before = reader.get_program(&entry.id).await.unwrap();
    let image_id = before.program_image.as_ref().unwrap().id.clone();
    let kept_attachment = before.program_assets[0].id.clone();
    let assets_before_edit = cms.asset_count();

    let update = ProgramUpdate {
        name: "After".to_string(),
        information: "Updated plan.".to_string(),
        retained_image: Some(EntryRef::new(&image_id)),
        new_attachments: vec![pdf("week3.pdf")],
        retained_attachments: vec![EntryRef::new(&kept_attachment)],
        difficulty: Some(Difficulty::Intermediate),
        level: Some(Level::Level2),
        duration: Some(30),
        ..Default::default()
    };
    service.edit(&entry.id, update).await.unwrap();

    let after = reader.get_program(&entry.id).await.unwrap();
    assert_eq!(after.program_name, "After");
    assert_eq!(after.difficulty, Some(Difficulty::Intermediate));
    assert_eq!(after.level, Some(Level::Level2));
    assert_eq!(after.duration, Some(30));
    // Retained image was not re-uploaded
    assert_eq!(after.program_image.as_ref().unwrap().id, image_id);
    // New uploads come first, then retained references
    assert_eq!(after.program_assets.len(), 2);
    assert_eq!(after.program_assets[0].file_name, "week3.pdf");
    assert_eq!(after.program_assets[1].id, kept_attachment);
    // Exactly one new asset was created for the edit
    assert_eq!(cms.asset_count(), assets_before_edit + 1);
}

#[tokio::test]
async fn edit_requires_an_image() {
    let (_cms, _reader, service) = test_stack();

    let update = ProgramUpdate {
        name: "Name".to_string(),
        information: "Info".to_string(),
        ..Default::default()
    };
    let err = service.edit("entry-1", update).await.unwrap_err();
    assert!(matches!(err, ProgramError::Validation(_)));
}

#[tokio::test]
async fn edit_with_no_attachments_clears_the_list() {
    let (_cms, reader, service) = test_stack();

    let entry = service.add(sample_program("Loaded")).await.unwrap();
    let before = reader.get_program(&entry.id).await.unwrap();
    assert_eq!(before.program_assets.len(), 2);

    let update = ProgramUpdate {
        name: "Loaded".to_string(),
        information: "Same plan, no downloads.".to_string(),
        retained_image: Some(EntryRef::new(&before.program_image.unwrap().id)),
        ..Default::default()
    };
    service.edit(&entry.id, update).await.unwrap();

    let after = reader.get_program(&entry.id).await.unwrap();
    assert!(after.program_assets.is_empty());
}

#[tokio::test]
async fn edit_nonexistent_program_is_not_found() {
    let (_cms, _reader, service) = test_stack();

    let update = ProgramUpdate {
        name: "Name".to_string(),
        information: "Info".to_string(),
        retained_image: Some(EntryRef::new("img")),
        ..Default::default()
    };
    let err = service.edit("missing", update).await.unwrap_err();
    assert!(matches!(err, ProgramError::NotFound { .. }));
}

#[tokio::test]
async fn edit_compensates_new_uploads_on_failure() {
    let (cms, reader, service) = test_stack();

    let entry = service.add(sample_program("Stable")).await.unwrap();
    let before = reader.get_program(&entry.id).await.unwrap();
    let image_id = before.program_image.unwrap().id;

    cms.clear_failures();
    cms.fail_on(FailPoint::UpdateEntry);
    let deleted_before = cms.deleted_assets().len();

    let update = ProgramUpdate {
        name: "Stable".to_string(),
        information: "Info".to_string(),
        retained_image: Some(EntryRef::new(&image_id)),
        new_attachments: vec![pdf("week9.pdf")],
        ..Default::default()
    };
    let err = service.edit(&entry.id, update).await.unwrap_err();
    assert!(matches!(err, ProgramError::Upstream(_)));

    // The freshly uploaded attachment was compensated; the retained
    // image was untouched
    assert_eq!(cms.deleted_assets().len(), deleted_before + 1);
    assert!(cms.entry(&entry.id).is_some());
}

#[tokio::test]
#[tracing_test::traced_test]
async fn failed_compensation_is_logged_and_swallowed() {
    let (cms, _reader, service) = test_stack();
    cms.fail_on(FailPoint::CreateEntry);
    cms.fail_on(FailPoint::DeleteAsset);

    // The original entry failure is what surfaces, not the cleanup one
    let err = service.add(sample_program("Unlucky")).await.unwrap_err();
    assert!(matches!(err, ProgramError::Upstream(_)));

    assert!(logs_contain("compensating asset delete failed"));
    // Orphaned assets stay behind when compensation also fails
    assert_eq!(cms.asset_count(), 3);
}

#[tokio::test]
async fn remove_unpublishes_and_deletes() {
    let (cms, reader, service) = test_stack();

    let entry = service.add(sample_program("Short Lived")).await.unwrap();
    service.remove(&entry.id).await.unwrap();

    assert_eq!(cms.entry_count(), 0);
    let err = reader.get_program(&entry.id).await.unwrap_err();
    assert!(matches!(err, ProgramError::NotFound { .. }));
}

#[tokio::test]
async fn remove_nonexistent_program_is_not_found() {
    let (_cms, _reader, service) = test_stack();

    let err = service.remove("missing").await.unwrap_err();
    assert!(matches!(err, ProgramError::NotFound { .. }));
}

#[tokio::test]
async fn successful_writes_invalidate_the_list_cache() {
    let (_cms, reader, service) = test_stack();

    // Prime the cache
    assert!(reader.list_programs().await.unwrap().is_empty());

    let entry = service.add(sample_program("Fresh")).await.unwrap();
    let listed = reader.list_programs().await.unwrap();
    assert_eq!(listed.len(), 1);

    service.remove(&entry.id).await.unwrap();
    assert!(reader.list_programs().await.unwrap().is_empty());
}
