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

//! Domain models for the workout program catalog.
//!
//! These are API-level types; the wire-level locale-keyed
//! representations live in [`crate::cms::types`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::richtext::RichTextDocument;

/// Program difficulty rating. Stored in the CMS as its display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// All values, in form-select order.
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Beginner" => Ok(Difficulty::Beginner),
            "Intermediate" => Ok(Difficulty::Intermediate),
            "Advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty: {}", other)),
        }
    }
}

/// Program level. Stored in the CMS as "Level 1" .. "Level 5".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "Level 1")]
    Level1,
    #[serde(rename = "Level 2")]
    Level2,
    #[serde(rename = "Level 3")]
    Level3,
    #[serde(rename = "Level 4")]
    Level4,
    #[serde(rename = "Level 5")]
    Level5,
}

impl Level {
    /// All values, in form-select order.
    pub const ALL: [Level; 5] = [
        Level::Level1,
        Level::Level2,
        Level::Level3,
        Level::Level4,
        Level::Level5,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Level1 => "Level 1",
            Level::Level2 => "Level 2",
            Level::Level3 => "Level 3",
            Level::Level4 => "Level 4",
            Level::Level5 => "Level 5",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Level 1" => Ok(Level::Level1),
            "Level 2" => Ok(Level::Level2),
            "Level 3" => Ok(Level::Level3),
            "Level 4" => Ok(Level::Level4),
            "Level 5" => Ok(Level::Level5),
            other => Err(format!("unknown level: {}", other)),
        }
    }
}

/// Inclusive bounds for the `duration` field, in minutes.
pub const DURATION_MINUTES: std::ops::RangeInclusive<u32> = 1..=180;

/// An asset reference resolved to its published file details by the
/// delivery client. Unresolvable links (deleted assets) never reach
/// this type; they are dropped during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAsset {
    pub id: String,
    pub title: String,
    pub file_name: String,
    pub content_type: String,
    /// Public URL of the published file.
    pub url: String,
}

/// A published program entry with all links resolved, as served to
/// list and detail views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedProgram {
    pub id: String,
    pub program_name: String,
    pub program_information: RichTextDocument,
    pub program_image: Option<ResolvedAsset>,
    pub program_assets: Vec<ResolvedAsset>,
    pub difficulty: Option<Difficulty>,
    pub level: Option<Level>,
    pub duration: Option<u32>,
}

/// A raw file received from the admin form, destined for upload.
#[derive(Debug, Clone)]
pub struct AssetSource {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AssetSource {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_round_trips_through_display() {
        for d in Difficulty::ALL {
            assert_eq!(d.as_str().parse::<Difficulty>().unwrap(), d);
        }
    }

    #[test]
    fn level_serializes_with_space() {
        let json = serde_json::to_value(Level::Level2).unwrap();
        assert_eq!(json, "Level 2");
        let back: Level = serde_json::from_value(json).unwrap();
        assert_eq!(back, Level::Level2);
    }

    #[test]
    fn unknown_symbols_are_rejected() {
        assert!("Expert".parse::<Difficulty>().is_err());
        assert!("Level 6".parse::<Level>().is_err());
    }

    #[test]
    fn duration_bounds() {
        assert!(DURATION_MINUTES.contains(&1));
        assert!(DURATION_MINUTES.contains(&180));
        assert!(!DURATION_MINUTES.contains(&0));
        assert!(!DURATION_MINUTES.contains(&181));
    }
}
