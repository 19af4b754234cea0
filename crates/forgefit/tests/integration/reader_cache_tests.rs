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

//! Tests for the cached catalog read path.

use crate::fixtures::*;
use forgefit::cms::{ManagementApi, ProgramFieldSet};
use forgefit::models::{Difficulty, Level};
use forgefit::ProgramError;

/// Publish an entry directly through the management trait, bypassing
/// the service and therefore the cache invalidation it performs.
async fn publish_directly(cms: &forgefit_testing::InMemoryCms, name: &str) -> String {
    let fields = ProgramFieldSet {
        program_name: name.to_string(),
        program_information: Some(forgefit::to_rich_text("direct")),
        ..Default::default()
    };
    let entry = cms.create_entry(fields).await.unwrap();
    cms.publish_entry(&entry.id, entry.version).await.unwrap();
    entry.id
}

#[tokio::test]
async fn list_serves_cached_results_until_invalidated() {
    let (cms, reader, service) = test_stack();

    service.add(sample_program("First")).await.unwrap();
    assert_eq!(reader.list_programs().await.unwrap().len(), 1);

    // An out-of-band publish is invisible while the cache holds
    publish_directly(&cms, "Second").await;
    assert_eq!(reader.list_programs().await.unwrap().len(), 1);

    reader.invalidate().await;
    assert_eq!(reader.list_programs().await.unwrap().len(), 2);
}

#[tokio::test]
async fn list_is_ordered_by_program_name() {
    let (cms, reader, _service) = test_stack();

    publish_directly(&cms, "Zone Training").await;
    publish_directly(&cms, "Alpine Prep").await;
    publish_directly(&cms, "Marathon Block").await;

    let listed = reader.list_programs().await.unwrap();
    let names: Vec<&str> = listed.iter().map(|p| p.program_name.as_str()).collect();
    assert_eq!(names, vec!["Alpine Prep", "Marathon Block", "Zone Training"]);
}

#[tokio::test]
async fn list_reads_carry_only_the_selected_fields() {
    let (_cms, reader, service) = test_stack();

    let mut program = sample_program("Field Select");
    program.difficulty = Some(Difficulty::Beginner);
    program.level = Some(Level::Level1);
    program.duration = Some(45);
    let entry = service.add(program).await.unwrap();

    // The list query selects name, information and asset links only
    let listed = reader.list_programs().await.unwrap();
    assert_eq!(listed[0].program_name, "Field Select");
    assert!(listed[0].difficulty.is_none());
    assert!(listed[0].level.is_none());
    assert!(listed[0].duration.is_none());

    // The unfiltered detail read returns everything
    let detail = reader.get_program(&entry.id).await.unwrap();
    assert_eq!(detail.difficulty, Some(Difficulty::Beginner));
    assert_eq!(detail.level, Some(Level::Level1));
    assert_eq!(detail.duration, Some(45));
}

#[tokio::test]
async fn detail_reads_are_not_cached() {
    let (cms, reader, _service) = test_stack();

    let id = publish_directly(&cms, "Visible Now").await;
    // No invalidation happened, yet the detail read sees the entry
    let program = reader.get_program(&id).await.unwrap();
    assert_eq!(program.program_name, "Visible Now");
}

#[tokio::test]
async fn unknown_program_is_not_found() {
    let (_cms, reader, _service) = test_stack();

    let err = reader.get_program("missing").await.unwrap_err();
    assert!(matches!(err, ProgramError::NotFound { .. }));
}

#[tokio::test]
async fn unpublished_entries_are_invisible_to_readers() {
    let (cms, reader, _service) = test_stack();

    let fields = ProgramFieldSet {
        program_name: "Draft Only".to_string(),
        ..Default::default()
    };
    let entry = cms.create_entry(fields).await.unwrap();

    assert!(reader.list_programs().await.unwrap().is_empty());
    let err = reader.get_program(&entry.id).await.unwrap_err();
    assert!(matches!(err, ProgramError::NotFound { .. }));
}
