// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Engine descriptor pass
//!
//! Unity `.prefab` files store per-object transforms under the keys
//! `m_LocalRotation`, `m_LocalScale` and `m_LocalEulerAnglesHint`, either
//! in flow style on one line or in block style with one indented line per
//! component. After the matching model has been baked, those values must
//! go to identity or the engine would apply the old transform twice. The
//! rewrite preserves the document's line count and every unrelated byte.

use crate::core::document::Document;

/// The descriptor keys whose values get rested
const KEYS: [DescriptorKey; 3] = [
    DescriptorKey {
        name: "m_LocalRotation",
        flow: "{x: 0, y: 0, z: 0, w: 1}",
    },
    DescriptorKey {
        name: "m_LocalScale",
        flow: "{x: 1, y: 1, z: 1}",
    },
    DescriptorKey {
        name: "m_LocalEulerAnglesHint",
        flow: "{x: 0, y: 0, z: 0}",
    },
];

struct DescriptorKey {
    name: &'static str,
    /// Canonical flow-style identity value
    flow: &'static str,
}

impl DescriptorKey {
    /// Identity value of one component in block style
    fn component(&self, name: char) -> &'static str {
        match (self.name, name) {
            ("m_LocalScale", _) => "1",
            (_, 'w') => "1",
            _ => "0",
        }
    }
}

/// Rest every transform value in the descriptor to identity
///
/// Returns the number of keys rewritten. Flow values are replaced on their
/// own line; block values are rewritten one component line at a time, so
/// the line count never changes.
pub fn rest_descriptor(doc: &mut Document) -> usize {
    let mut rewritten = 0;
    let mut i = 0;
    while i < doc.len() {
        let Some((key, colon)) = match_key(doc.line(i)) else {
            i += 1;
            continue;
        };
        let tail = doc.line(i)[colon + 1..].trim();
        if tail.starts_with('{') {
            rewrite_flow(doc, i, key);
            rewritten += 1;
        } else if tail.is_empty() {
            i = rewrite_block(doc, i, key);
            rewritten += 1;
        }
        i += 1;
    }
    rewritten
}

/// Match a line against the known keys; returns the key and colon offset
fn match_key(line: &str) -> Option<(&'static DescriptorKey, usize)> {
    let trimmed = line.trim_start();
    let indent = line.len() - trimmed.len();
    for key in &KEYS {
        if let Some(rest) = trimmed.strip_prefix(key.name) {
            if rest.starts_with(':') {
                return Some((key, indent + key.name.len()));
            }
        }
    }
    None
}

fn rewrite_flow(doc: &mut Document, line_idx: usize, key: &DescriptorKey) {
    let line = doc.line(line_idx);
    if let Some(brace) = line.find('{') {
        let rewritten = format!("{}{}", &line[..brace], key.flow);
        doc.set_line(line_idx, rewritten);
    }
}

/// Rewrite the indented component lines following a block-style key
///
/// Returns the index of the last component line handled.
fn rewrite_block(doc: &mut Document, key_idx: usize, key: &DescriptorKey) -> usize {
    let key_indent = indent_width(doc.line(key_idx));
    let mut last = key_idx;
    for i in key_idx + 1..doc.len() {
        let line = doc.line(i);
        if indent_width(line) <= key_indent {
            break;
        }
        let trimmed = line.trim_start();
        let component = match trimmed.chars().next() {
            Some(c @ ('x' | 'y' | 'z' | 'w')) if trimmed[1..].starts_with(':') => c,
            _ => break,
        };
        let colon = line.len() - trimmed.len() + 1;
        let rewritten = format!("{} {}", &line[..colon + 1], key.component(component));
        doc.set_line(i, rewritten);
        last = i;
    }
    last
}

fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start().len()
}
