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

//! Error types for CMS client operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmsError {
    /// Missing or invalid credentials/configuration. Raised before any
    /// request is sent; no partial upstream state is created.
    #[error("CMS credentials not configured: {0}")]
    Configuration(String),

    /// Transport-level failure reaching the CMS.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The CMS rejected the request.
    #[error("CMS API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The referenced entry or asset does not exist.
    #[error("Not found in CMS: {id}")]
    NotFound { id: String },

    /// The entry was updated upstream since its version was read.
    #[error("Version conflict for {id}")]
    VersionConflict { id: String },

    /// Asset processing never completed (e.g. a corrupt image).
    #[error("Asset processing did not complete for {id}")]
    AssetUnprocessable { id: String },

    /// The CMS returned a response this client could not parse.
    #[error("Unexpected CMS response: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A configured base URL could not be parsed or joined.
    #[error("Invalid CMS URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl CmsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CmsError::NotFound { .. })
    }
}
