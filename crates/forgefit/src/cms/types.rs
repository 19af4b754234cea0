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

//! Wire and record types for the CMS boundary.
//!
//! The management API keys every field by locale; this system writes a
//! single locale ([`LOCALE`]). The delivery API returns plain values
//! with links left as `{sys: {type: "Link", ...}}` stubs resolved
//! against the response's `includes` block.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Difficulty, Level};
use crate::richtext::RichTextDocument;

/// The single locale this system reads and writes.
pub const LOCALE: &str = "en-US";

/// Content type identifier of a workout program entry.
pub const PROGRAM_CONTENT_TYPE: &str = "workoutProgram";

// ============================================================================
// Links
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSys {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "linkType")]
    pub link_type: String,
    pub id: String,
}

/// A typed pointer from an entry field to an asset:
/// `{sys: {type: "Link", linkType: "Asset", id}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLink {
    pub sys: LinkSys,
}

impl AssetLink {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            sys: LinkSys {
                kind: "Link".to_string(),
                link_type: "Asset".to_string(),
                id: id.into(),
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.sys.id
    }
}

// ============================================================================
// Locale-keyed wrappers (management API)
// ============================================================================

/// A field value keyed by the single supported locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Localized<T> {
    #[serde(rename = "en-US")]
    pub value: T,
}

impl<T> Localized<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

// ============================================================================
// Program entry fields
// ============================================================================

/// The domain-level field set of a workout program entry, as written
/// through the management API.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgramFieldSet {
    pub program_name: String,
    pub program_information: Option<RichTextDocument>,
    pub program_image: Option<AssetLink>,
    /// `None` omits the field entirely (create with no attachments);
    /// `Some(vec![])` writes an explicit empty list (edit that clears
    /// all attachments).
    pub program_assets: Option<Vec<AssetLink>>,
    pub difficulty: Option<Difficulty>,
    pub level: Option<Level>,
    pub duration: Option<u32>,
}

/// Locale-keyed wire form of [`ProgramFieldSet`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireProgramFields {
    #[serde(rename = "programName", skip_serializing_if = "Option::is_none")]
    pub program_name: Option<Localized<String>>,

    #[serde(
        rename = "programInformation",
        skip_serializing_if = "Option::is_none"
    )]
    pub program_information: Option<Localized<RichTextDocument>>,

    #[serde(rename = "programImage", skip_serializing_if = "Option::is_none")]
    pub program_image: Option<Localized<AssetLink>>,

    #[serde(rename = "programAssets", skip_serializing_if = "Option::is_none")]
    pub program_assets: Option<Localized<Vec<AssetLink>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Localized<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Localized<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Localized<u32>>,
}

impl From<ProgramFieldSet> for WireProgramFields {
    fn from(fields: ProgramFieldSet) -> Self {
        Self {
            program_name: Some(Localized::new(fields.program_name)),
            program_information: fields.program_information.map(Localized::new),
            program_image: fields.program_image.map(Localized::new),
            program_assets: fields.program_assets.map(Localized::new),
            difficulty: fields
                .difficulty
                .map(|d| Localized::new(d.as_str().to_string())),
            level: fields.level.map(|l| Localized::new(l.as_str().to_string())),
            duration: fields.duration.map(Localized::new),
        }
    }
}

impl WireProgramFields {
    /// Convert back to the domain field set. Enumerated symbols this
    /// client does not recognize are dropped rather than failing the
    /// whole read.
    pub fn into_domain(self) -> ProgramFieldSet {
        ProgramFieldSet {
            program_name: self.program_name.map(|l| l.value).unwrap_or_default(),
            program_information: self.program_information.map(|l| l.value),
            program_image: self.program_image.map(|l| l.value),
            program_assets: self.program_assets.map(|l| l.value),
            difficulty: self
                .difficulty
                .and_then(|l| l.value.parse::<Difficulty>().ok()),
            level: self.level.and_then(|l| l.value.parse::<Level>().ok()),
            duration: self.duration.map(|l| l.value),
        }
    }
}

// ============================================================================
// Management records
// ============================================================================

/// `sys` block of management API resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireSys {
    pub id: String,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(rename = "publishedVersion", default)]
    pub published_version: Option<u64>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Management API entry envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireEntry {
    pub sys: WireSys,
    #[serde(default)]
    pub fields: WireProgramFields,
}

/// A program entry as read through the management API, carrying the
/// version needed for optimistic-concurrency updates.
#[derive(Debug, Clone)]
pub struct EntryRecord {
    pub id: String,
    pub version: u64,
    pub published_version: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub fields: ProgramFieldSet,
}

impl From<WireEntry> for EntryRecord {
    fn from(wire: WireEntry) -> Self {
        Self {
            id: wire.sys.id,
            version: wire.sys.version.unwrap_or(1),
            published_version: wire.sys.published_version,
            created_at: wire.sys.created_at,
            updated_at: wire.sys.updated_at,
            fields: wire.fields.into_domain(),
        }
    }
}

// ============================================================================
// Assets
// ============================================================================

/// Draft asset payload: title = file name, empty description, and a
/// file block pointing at a previously uploaded binary.
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub title: String,
    pub file_name: String,
    pub content_type: String,
    pub upload_id: String,
}

/// `file` block of a management API asset. Carries `uploadFrom` on a
/// draft and `url` once processing has completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireAssetFile {
    #[serde(rename = "contentType")]
    pub content_type: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "uploadFrom", skip_serializing_if = "Option::is_none")]
    pub upload_from: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireAssetFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Localized<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Localized<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<Localized<WireAssetFile>>,
}

/// Management API asset envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireAsset {
    pub sys: WireSys,
    #[serde(default)]
    pub fields: WireAssetFields,
}

/// An asset as tracked through the create/process/publish pipeline.
#[derive(Debug, Clone)]
pub struct AssetRecord {
    pub id: String,
    pub version: u64,
    pub title: String,
    pub file_name: String,
    pub content_type: String,
    /// Present once the CMS has processed the file.
    pub url: Option<String>,
    pub published_version: Option<u64>,
}

impl AssetRecord {
    pub fn is_processed(&self) -> bool {
        self.url.is_some()
    }
}

impl From<WireAsset> for AssetRecord {
    fn from(wire: WireAsset) -> Self {
        let file = wire.fields.file.map(|l| l.value);
        Self {
            id: wire.sys.id,
            version: wire.sys.version.unwrap_or(1),
            title: wire
                .fields
                .title
                .map(|l| l.value)
                .unwrap_or_default(),
            file_name: file
                .as_ref()
                .map(|f| f.file_name.clone())
                .unwrap_or_default(),
            content_type: file
                .as_ref()
                .map(|f| f.content_type.clone())
                .unwrap_or_default(),
            url: file.and_then(|f| f.url),
            published_version: wire.sys.published_version,
        }
    }
}

// ============================================================================
// Delivery wire types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct DeliverySys {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeliveryEntryFields {
    #[serde(rename = "programName")]
    pub program_name: Option<String>,
    #[serde(rename = "programInformation")]
    pub program_information: Option<RichTextDocument>,
    #[serde(rename = "programImage")]
    pub program_image: Option<AssetLink>,
    #[serde(rename = "programAssets", default)]
    pub program_assets: Vec<AssetLink>,
    pub difficulty: Option<String>,
    pub level: Option<String>,
    pub duration: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryEntry {
    pub sys: DeliverySys,
    #[serde(default)]
    pub fields: DeliveryEntryFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryAssetFile {
    pub url: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryAssetFields {
    pub title: Option<String>,
    pub file: Option<DeliveryAssetFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryAsset {
    pub sys: DeliverySys,
    #[serde(default)]
    pub fields: Option<DeliveryAssetFields>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeliveryIncludes {
    #[serde(rename = "Asset", default)]
    pub assets: Vec<DeliveryAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryCollection {
    #[serde(default)]
    pub items: Vec<DeliveryEntry>,
    #[serde(default)]
    pub includes: DeliveryIncludes,
}
