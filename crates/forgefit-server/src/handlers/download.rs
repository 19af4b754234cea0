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

//! Attachment download proxy.
//!
//! The CMS serves asset files from its own CDN with protocol-relative
//! URLs and no attachment disposition. This endpoint fetches the file
//! server-side, streams it through, and forces a download with a
//! `Content-Disposition` header so PDFs open in a save dialog rather
//! than a browser tab.

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub url: String,
    /// Optional override for the downloaded file's name.
    pub name: Option<String>,
}

/// Derive a filename from the trailing path segment of the URL.
fn file_name_from_url(url: &str) -> String {
    url.split('?')
        .next()
        .unwrap_or(url)
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("download")
        .to_string()
}

pub async fn proxy(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    // Delivery responses use protocol-relative asset URLs
    let url = if query.url.starts_with("//") {
        format!("https:{}", query.url)
    } else {
        query.url.clone()
    };

    let upstream = state
        .http
        .get(&url)
        .send()
        .await
        .map_err(|e| ApiError::Gateway(e.to_string()))?;

    if !upstream.status().is_success() {
        return Err(ApiError::Gateway(format!(
            "asset fetch returned {}",
            upstream.status()
        )));
    }

    let file_name = query.name.unwrap_or_else(|| file_name_from_url(&url));
    debug!(file = %file_name, "proxying asset download");

    let content_type = upstream
        .headers()
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));
    let disposition = format!("attachment; filename=\"{}\"", file_name.replace('"', ""));

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_DISPOSITION, disposition)
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| ApiError::Gateway(e.to_string()))
}
