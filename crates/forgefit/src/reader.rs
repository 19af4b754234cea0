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

//! Cached read path for the published program catalog.
//!
//! List results are cached under a single collection tag with a fixed
//! TTL (one hour by default). Every successful write invalidates the
//! tag, so readers only wait out the TTL when the cache is populated
//! by a writer outside this process. Detail reads are uncached.

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::cms::{CmsError, DeliveryApi};
use crate::config::CacheConfig;
use crate::error::ProgramError;
use crate::models::ResolvedProgram;

/// Cache tag for the program collection.
const PROGRAMS_TAG: &str = "workoutProgram";

pub struct ProgramReader {
    delivery: Arc<dyn DeliveryApi>,
    cache: Cache<&'static str, Arc<Vec<ResolvedProgram>>>,
}

impl ProgramReader {
    pub fn new(delivery: Arc<dyn DeliveryApi>, config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(Duration::from_secs(config.list_ttl_secs))
            .build();
        Self { delivery, cache }
    }

    /// All published programs, `programName` ascending.
    pub async fn list_programs(&self) -> Result<Arc<Vec<ResolvedProgram>>, ProgramError> {
        if let Some(cached) = self.cache.get(&PROGRAMS_TAG).await {
            return Ok(cached);
        }

        let mut programs = self.delivery.list_programs().await?;
        programs.sort_by(|a, b| a.program_name.cmp(&b.program_name));

        let programs = Arc::new(programs);
        self.cache.insert(PROGRAMS_TAG, programs.clone()).await;
        debug!(count = programs.len(), "program list cached");
        Ok(programs)
    }

    /// One published program by id.
    pub async fn get_program(&self, id: &str) -> Result<ResolvedProgram, ProgramError> {
        self.delivery.get_program(id).await.map_err(|e| match e {
            CmsError::NotFound { id } => ProgramError::NotFound { id },
            other => ProgramError::Upstream(other),
        })
    }

    /// Drop the cached list immediately. Called by the orchestrator
    /// after every successful write; without it readers would see
    /// stale data for up to the TTL.
    pub async fn invalidate(&self) {
        self.cache.invalidate(&PROGRAMS_TAG).await;
        debug!("program list cache invalidated");
    }
}
