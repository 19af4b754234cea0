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

//! Program catalog endpoints.
//!
//! Reads are public; writes require an admin bearer token and arrive
//! as multipart forms. Form field names follow the CMS entry schema
//! (`programName`, `programInformation`, ...) with `programImage` and
//! repeated `programAssets` file parts, plus `retainedImage` /
//! `retainedAssets` id parts on edit.

use axum::extract::{Multipart, Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use forgefit::models::{AssetSource, Difficulty, Level};
use forgefit::programs::{EntryRef, NewProgram, ProgramUpdate};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct WriteResponse {
    pub message: &'static str,
    #[serde(rename = "entryId", skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteRequest {
    #[serde(rename = "programId")]
    pub program_id: String,
}

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let programs = state.reader.list_programs().await?;
    Ok(Json((*programs).clone()))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let program = state.reader.get_program(&id).await?;
    Ok(Json(program))
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    state.require_admin(&headers).await?;
    let form = ProgramForm::parse(multipart).await?;

    let program = NewProgram {
        name: form.name,
        information: form.information,
        image: form.image,
        attachments: form.attachments,
        difficulty: form.difficulty,
        level: form.level,
        duration: form.duration,
    };

    let entry = state.service.add(program).await?;
    Ok(Json(WriteResponse {
        message: "Program created",
        entry_id: Some(entry.id),
    }))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    state.require_admin(&headers).await?;
    let form = ProgramForm::parse(multipart).await?;

    let update = ProgramUpdate {
        name: form.name,
        information: form.information,
        new_image: form.image,
        retained_image: form.retained_image.map(EntryRef::new),
        new_attachments: form.attachments,
        retained_attachments: form
            .retained_attachments
            .into_iter()
            .map(EntryRef::new)
            .collect(),
        difficulty: form.difficulty,
        level: form.level,
        duration: form.duration,
    };

    let entry = state.service.edit(&id, update).await?;
    Ok(Json(WriteResponse {
        message: "Program updated",
        entry_id: Some(entry.id),
    }))
}

pub async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<DeleteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.require_admin(&headers).await?;
    state.service.remove(&request.program_id).await?;
    Ok(Json(WriteResponse {
        message: "Program deleted",
        entry_id: None,
    }))
}

/// The multipart form shared by create and update.
#[derive(Default)]
struct ProgramForm {
    name: String,
    information: String,
    difficulty: Option<Difficulty>,
    level: Option<Level>,
    duration: Option<u32>,
    image: Option<AssetSource>,
    attachments: Vec<AssetSource>,
    retained_image: Option<String>,
    retained_attachments: Vec<String>,
}

impl ProgramForm {
    async fn parse(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "programName" => form.name = text(field, &name).await?,
                "programInformation" => form.information = text(field, &name).await?,
                "difficulty" => {
                    let value = text(field, &name).await?;
                    if !value.is_empty() {
                        form.difficulty = Some(value.parse::<Difficulty>().map_err(
                            ApiError::BadRequest,
                        )?);
                    }
                }
                "level" => {
                    let value = text(field, &name).await?;
                    if !value.is_empty() {
                        form.level =
                            Some(value.parse::<Level>().map_err(ApiError::BadRequest)?);
                    }
                }
                "duration" => {
                    let value = text(field, &name).await?;
                    if !value.is_empty() {
                        form.duration = Some(value.parse::<u32>().map_err(|_| {
                            ApiError::BadRequest(format!("invalid duration: {}", value))
                        })?);
                    }
                }
                "programImage" => {
                    if let Some(file) = file(field, &name).await? {
                        form.image = Some(file);
                    }
                }
                "programAssets" => {
                    if let Some(file) = file(field, &name).await? {
                        form.attachments.push(file);
                    }
                }
                "retainedImage" => {
                    let value = text(field, &name).await?;
                    if !value.is_empty() {
                        form.retained_image = Some(value);
                    }
                }
                "retainedAssets" => {
                    let value = text(field, &name).await?;
                    if !value.is_empty() {
                        form.retained_attachments.push(value);
                    }
                }
                // Unknown parts are ignored so the form can evolve
                _ => {}
            }
        }

        Ok(form)
    }
}

async fn text(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("unreadable field {}: {}", name, e)))
}

/// Read a file part. Browsers submit empty file inputs as zero-length
/// parts without a filename; those count as absent.
async fn file(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<Option<AssetSource>, ApiError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("unreadable file {}: {}", name, e)))?;

    if file_name.is_empty() || bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(AssetSource::new(file_name, content_type, bytes.to_vec())))
}
