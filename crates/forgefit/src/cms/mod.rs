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

//! # CMS Boundary
//!
//! Typed clients for the external headless CMS. The write path talks
//! to the management API (draft/process/publish for assets, versioned
//! field mutation for entries); the read path talks to the delivery
//! API (published content with link resolution).
//!
//! Both surfaces are defined as traits so orchestration code never
//! depends on the HTTP implementations directly. Tests substitute
//! in-memory backends, and clients are constructed explicitly from
//! configuration rather than held in module-level globals.
//!
//! CMS responses are parsed into typed records at this boundary;
//! nothing above this module handles raw JSON.

pub mod delivery;
pub mod error;
pub mod management;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use delivery::HttpDeliveryApi;
pub use error::CmsError;
pub use management::HttpManagementApi;
pub use traits::{DeliveryApi, ManagementApi};
pub use types::{AssetLink, AssetRecord, EntryRecord, NewAsset, ProgramFieldSet, LOCALE};
