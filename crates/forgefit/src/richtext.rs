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

//! Plain-text conversion to the CMS rich-text document schema.
//!
//! The admin form submits plain text; the CMS stores a structured
//! tree. [`to_rich_text`] produces the minimal valid tree: one
//! `document` node containing one `paragraph` containing one `text`
//! node whose value equals the input, with no marks.
//!
//! [`plain_text`] is the inverse used by the edit flow. It is lossy by
//! design: only text node values are extracted, paragraph by
//! paragraph, so headings, lists, and inline marks present in
//! previously stored documents do not survive an edit round-trip.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A node in the CMS rich-text tree, wire-compatible with the CMS
/// schema (`nodeType` / `content` / `value` / `marks` / `data`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextNode {
    #[serde(rename = "nodeType")]
    pub node_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<Value>>,

    #[serde(default)]
    pub data: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<RichTextNode>,
}

/// The document root. Serializes as `nodeType: "document"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextDocument {
    #[serde(rename = "nodeType")]
    pub node_type: String,

    #[serde(default)]
    pub data: BTreeMap<String, Value>,

    #[serde(default)]
    pub content: Vec<RichTextNode>,
}

/// Convert user-supplied plain text into the minimal rich-text tree.
///
/// The output is always a single document → single paragraph → single
/// text node with `value` equal to the input and no marks. Empty input
/// is allowed and produces an empty text node.
pub fn to_rich_text(text: &str) -> RichTextDocument {
    RichTextDocument {
        node_type: "document".to_string(),
        data: BTreeMap::new(),
        content: vec![RichTextNode {
            node_type: "paragraph".to_string(),
            value: None,
            marks: None,
            data: BTreeMap::new(),
            content: vec![RichTextNode {
                node_type: "text".to_string(),
                value: Some(text.to_string()),
                marks: Some(Vec::new()),
                data: BTreeMap::new(),
                content: Vec::new(),
            }],
        }],
    }
}

/// Extract concatenated plain text from a stored rich-text document.
///
/// Text node values within each paragraph are joined without a
/// separator; paragraphs are joined with `\n`. Non-paragraph blocks
/// contribute an empty line. This drops all structure and marks.
pub fn plain_text(document: &RichTextDocument) -> String {
    document
        .content
        .iter()
        .map(|node| {
            if node.node_type == "paragraph" {
                node.content
                    .iter()
                    .filter(|child| child.node_type == "text")
                    .filter_map(|child| child.value.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            } else {
                String::new()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_paragraph_single_text_node() {
        let doc = to_rich_text("Run 3x/week");

        assert_eq!(doc.node_type, "document");
        assert_eq!(doc.content.len(), 1);

        let paragraph = &doc.content[0];
        assert_eq!(paragraph.node_type, "paragraph");
        assert_eq!(paragraph.content.len(), 1);

        let text = &paragraph.content[0];
        assert_eq!(text.node_type, "text");
        assert_eq!(text.value.as_deref(), Some("Run 3x/week"));
        assert_eq!(text.marks.as_deref(), Some(&[][..]));
    }

    #[test]
    fn empty_input_is_allowed() {
        let doc = to_rich_text("");
        let text = &doc.content[0].content[0];
        assert_eq!(text.value.as_deref(), Some(""));
    }

    #[test]
    fn round_trip_through_plain_text() {
        let doc = to_rich_text("Week 1: easy runs");
        assert_eq!(plain_text(&doc), "Week 1: easy runs");
    }

    #[test]
    fn multiple_paragraphs_join_with_newline() {
        let mut doc = to_rich_text("first");
        doc.content.push(to_rich_text("second").content.remove(0));
        assert_eq!(plain_text(&doc), "first\nsecond");
    }

    #[test]
    fn non_paragraph_blocks_are_dropped() {
        let mut doc = to_rich_text("kept");
        doc.content.push(RichTextNode {
            node_type: "heading-1".to_string(),
            value: None,
            marks: None,
            data: BTreeMap::new(),
            content: vec![RichTextNode {
                node_type: "text".to_string(),
                value: Some("lost heading".to_string()),
                marks: Some(Vec::new()),
                data: BTreeMap::new(),
                content: Vec::new(),
            }],
        });
        assert_eq!(plain_text(&doc), "kept\n");
    }

    #[test]
    fn serializes_with_cms_field_names() {
        let doc = to_rich_text("x");
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["nodeType"], "document");
        assert_eq!(json["content"][0]["nodeType"], "paragraph");
        assert_eq!(json["content"][0]["content"][0]["value"], "x");
    }
}
