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

//! # ForgeFit
//!
//! Core library for the ForgeFit content platform. ForgeFit manages a
//! catalog of workout programs stored in an external headless CMS: it
//! converts plain text into the CMS rich-text schema, uploads and
//! publishes media assets, writes and publishes program entries, reads
//! the published catalog through a cached delivery client, and gates
//! every write behind an external access guard.
//!
//! ## Architecture
//!
//! The crate is layered leaves-first:
//!
//! - [`richtext`]: pure plain-text ⇄ rich-text document conversion
//! - [`cms`]: typed clients for the CMS management (write) and
//!   delivery (read) APIs, defined as traits so tests can substitute
//!   in-memory backends
//! - [`uploader`]: the create → process → publish asset pipeline
//! - [`writer`]: entry field assembly, versioned updates, publishing
//! - [`reader`]: cached catalog reads with tag invalidation
//! - [`programs`]: the add / edit / delete orchestration consumed by
//!   the HTTP layer
//! - [`access`]: the admin-role precondition gate
//!
//! All clients are constructed explicitly from [`config`] and injected;
//! there is no process-global CMS state.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use forgefit::cms::{HttpDeliveryApi, HttpManagementApi};
//! use forgefit::config::ConfigLoader;
//! use forgefit::programs::{NewProgram, ProgramService};
//! use forgefit::reader::ProgramReader;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new().load_config(None)?;
//! let management = Arc::new(HttpManagementApi::new(&config.cms)?);
//! let delivery = Arc::new(HttpDeliveryApi::new(&config.cms)?);
//! let reader = Arc::new(ProgramReader::new(delivery, &config.cache));
//! let service = ProgramService::new(management, reader.clone(), &config.uploads);
//!
//! let entry = service
//!     .add(NewProgram::new("5K Starter", "Run 3x/week"))
//!     .await?;
//! println!("created {}", entry.id);
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod cms;
pub mod config;
pub mod error;
pub mod models;
pub mod programs;
pub mod reader;
pub mod richtext;
pub mod uploader;
pub mod writer;

// Re-export commonly used types
pub use access::{AccessError, AccessGuard, Principal};
pub use cms::{AssetLink, CmsError, DeliveryApi, ManagementApi};
pub use error::ProgramError;
pub use models::{Difficulty, Level, ResolvedAsset, ResolvedProgram};
pub use programs::{EntryRef, NewProgram, ProgramService, ProgramUpdate};
pub use reader::ProgramReader;
pub use richtext::{plain_text, to_rich_text, RichTextDocument};
