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

//! Top-level error type for program CRUD orchestration.
//!
//! The variants map onto the caller-facing taxonomy: validation
//! failures are reported before any external call, upstream failures
//! carry the CMS error detail, and not-found is distinguished so the
//! HTTP layer can redirect instead of reporting a generic failure.

use thiserror::Error;

use crate::cms::CmsError;

#[derive(Error, Debug)]
pub enum ProgramError {
    /// A required field is missing or out of range. Raised before any
    /// external state is created.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The requested program entry does not exist upstream.
    #[error("Program not found: {id}")]
    NotFound { id: String },

    /// The entry was modified upstream since it was loaded; the update
    /// was rejected rather than silently overwriting it.
    #[error("Program {id} was modified concurrently; reload and retry")]
    Conflict { id: String },

    /// Any failure from the CMS write or read path. Not retried; no
    /// automatic rollback beyond best-effort asset compensation.
    #[error("Upstream CMS call failed: {0}")]
    Upstream(#[from] CmsError),
}

impl ProgramError {
    /// Detail string surfaced to the caller alongside the generic
    /// failure message.
    pub fn detail(&self) -> String {
        self.to_string()
    }
}
